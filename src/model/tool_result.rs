//! Structured tool results attached to user entries (`toolUseResult`).

use crate::model::ContentItem;
use crate::parser::decode_tool_use_result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Tool output recorded next to the tool_result item of a user turn.
///
/// Shapes are matched structurally in declaration order; `Edit` has only
/// optional fields and therefore accepts any remaining object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolUseResult {
    Text(String),
    Todos(Vec<TodoItem>),
    FileRead(FileReadResult),
    Command(CommandResult),
    TodoDiff(TodoDiff),
    Edit(EditResult),
    /// MCP-style results: a sequence of typed content items.
    Items(Vec<ContentItem>),
}

impl<'de> Deserialize<'de> for ToolUseResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        decode_tool_use_result(raw).map_err(D::Error::custom)
    }
}

// ===== Todos =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDiff {
    pub old_todos: Vec<TodoItem>,
    pub new_todos: Vec<TodoItem>,
}

// ===== File read =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReadResult {
    #[serde(rename = "type")]
    pub kind: FileReadKind,
    pub file: FileInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileReadKind {
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_path: String,
    pub content: String,
    pub num_lines: u64,
    pub start_line: u64,
    pub total_lines: u64,
}

// ===== Command =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub interrupted: bool,
    pub is_image: bool,
}

// ===== Edit =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file: Option<String>,
    /// Diff hunks, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_patch: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified: Option<bool>,
}
