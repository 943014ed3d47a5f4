//! Content item decoding.
//!
//! Each content kind has an ordered list of candidate shapes. The
//! provider-native block shape comes first where one exists; the local log
//! shape follows. The first shape that validates wins, and an input no shape
//! accepts becomes a text item holding the input's JSON rendering.

use crate::model::{
    ContentItem, ImageContent, MessageContent, TextContent, ThinkingContent, ToolName,
    ToolResultContent, ToolUseContent, ToolUseId,
};
use crate::provider;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

type Shape = fn(&Value) -> Result<ContentItem, serde_json::Error>;

const TEXT_SHAPES: &[(&str, Shape)] = &[("provider", provider_text), ("local", local_text)];
const TOOL_USE_SHAPES: &[(&str, Shape)] =
    &[("provider", provider_tool_use), ("local", local_tool_use)];
const THINKING_SHAPES: &[(&str, Shape)] =
    &[("provider", provider_thinking), ("local", local_thinking)];
const TOOL_RESULT_SHAPES: &[(&str, Shape)] = &[("local", local_tool_result)];
const IMAGE_SHAPES: &[(&str, Shape)] = &[("local", local_image)];

fn shapes_for(kind: &str) -> &'static [(&'static str, Shape)] {
    match kind {
        "text" => TEXT_SHAPES,
        "tool_use" => TOOL_USE_SHAPES,
        "thinking" => THINKING_SHAPES,
        "tool_result" => TOOL_RESULT_SHAPES,
        "image" => IMAGE_SHAPES,
        _ => &[],
    }
}

/// Decode one content item.
///
/// Never fails. Inputs that are not objects, carry an unknown `type`, or
/// match none of the candidate shapes for their `type` decode to a text
/// item whose text is the rendered input.
pub fn decode_content_item(raw: &Value) -> ContentItem {
    let kind = raw.get("type").and_then(Value::as_str).unwrap_or_default();

    for (origin, shape) in shapes_for(kind) {
        match shape(raw) {
            Ok(item) => return item,
            Err(error) => trace!(kind, origin, %error, "content item shape mismatch"),
        }
    }

    trace!(kind, "content item decoded as fallback text");
    ContentItem::text(render(raw))
}

/// Decode a message body.
///
/// Strings pass through verbatim and sequences are decoded item by item in
/// order. Any other JSON value is kept as its rendered text.
pub fn decode_message_content(raw: Value) -> MessageContent {
    match raw {
        Value::String(text) => MessageContent::Text(text),
        Value::Array(items) => {
            MessageContent::Items(items.iter().map(decode_content_item).collect())
        }
        other => MessageContent::Text(render(&other)),
    }
}

/// Strings render without JSON quoting; everything else as compact JSON.
fn render(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ===== Provider shapes =====

fn provider_text(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    provider::TextBlock::deserialize(raw).map(|block| ContentItem::Text(block.into()))
}

fn provider_tool_use(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    provider::ToolUseBlock::deserialize(raw).map(|block| ContentItem::ToolUse(block.into()))
}

fn provider_thinking(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    provider::ThinkingBlock::deserialize(raw).map(|block| ContentItem::Thinking(block.into()))
}

// ===== Local shapes =====

#[derive(Deserialize)]
struct LocalText {
    text: String,
}

#[derive(Deserialize)]
struct LocalToolUse {
    id: ToolUseId,
    name: String,
    input: Map<String, Value>,
}

#[derive(Deserialize)]
struct LocalThinking {
    thinking: String,
    #[serde(default)]
    signature: Option<String>,
}

fn local_text(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    LocalText::deserialize(raw).map(|local| {
        ContentItem::Text(TextContent {
            text: local.text,
            citations: None,
        })
    })
}

fn local_tool_use(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    LocalToolUse::deserialize(raw).map(|local| {
        ContentItem::ToolUse(ToolUseContent::new(
            local.id,
            ToolName::parse(&local.name),
            local.input,
        ))
    })
}

fn local_thinking(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    LocalThinking::deserialize(raw).map(|local| {
        ContentItem::Thinking(ThinkingContent {
            thinking: local.thinking,
            signature: local.signature,
        })
    })
}

fn local_tool_result(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    ToolResultContent::deserialize(raw).map(ContentItem::ToolResult)
}

fn local_image(raw: &Value) -> Result<ContentItem, serde_json::Error> {
    ImageContent::deserialize(raw).map(ContentItem::Image)
}
