//! `toolUseResult` decoding.
//!
//! MCP-style results are sequences of typed content items and go through
//! the content item decoder. Every other shape is matched structurally.

use crate::model::{
    CommandResult, EditResult, FileReadResult, TodoDiff, TodoItem, ToolUseResult,
};
use crate::parser::decode_content_item;
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

type Shape = fn(&Value) -> Result<ToolUseResult, serde_json::Error>;

/// Object shapes in match order. `EditResult` is all-optional, so it goes last.
const OBJECT_SHAPES: &[Shape] = &[file_read, command, todo_diff, edit];

/// Decode a non-null `toolUseResult` value.
///
/// # Errors
///
/// Fails when the value matches none of the known shapes. The surrounding
/// user entry is then malformed.
pub fn decode_tool_use_result(raw: Value) -> Result<ToolUseResult, serde_json::Error> {
    match raw {
        Value::String(text) => Ok(ToolUseResult::Text(text)),
        Value::Array(items) if is_content_item_sequence(&items) => Ok(ToolUseResult::Items(
            items
                .iter()
                .filter(|item| item.is_object())
                .map(decode_content_item)
                .collect(),
        )),
        Value::Array(_) => Vec::<TodoItem>::deserialize(&raw).map(ToolUseResult::Todos),
        Value::Object(_) => match_object(&raw),
        other => Err(serde_json::Error::custom(format!(
            "toolUseResult must be a string, array or object, got {}",
            other
        ))),
    }
}

/// A sequence whose first element is an object carrying a `type` key.
fn is_content_item_sequence(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("type"))
}

fn match_object(raw: &Value) -> Result<ToolUseResult, serde_json::Error> {
    let mut last_error = None;
    for shape in OBJECT_SHAPES {
        match shape(raw) {
            Ok(result) => return Ok(result),
            Err(error) => last_error = Some(error),
        }
    }
    Err(serde_json::Error::custom(format!(
        "toolUseResult matches no known shape: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn file_read(raw: &Value) -> Result<ToolUseResult, serde_json::Error> {
    FileReadResult::deserialize(raw).map(ToolUseResult::FileRead)
}

fn command(raw: &Value) -> Result<ToolUseResult, serde_json::Error> {
    CommandResult::deserialize(raw).map(ToolUseResult::Command)
}

fn todo_diff(raw: &Value) -> Result<ToolUseResult, serde_json::Error> {
    TodoDiff::deserialize(raw).map(ToolUseResult::TodoDiff)
}

fn edit(raw: &Value) -> Result<ToolUseResult, serde_json::Error> {
    EditResult::deserialize(raw).map(ToolUseResult::Edit)
}
