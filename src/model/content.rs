//! Message content types for transcript entries.
//!
//! A message body is either plain text or an ordered sequence of
//! [`ContentItem`]s. Items are decoded through
//! [`decode_content_item`](crate::parser::decode_content_item), so
//! deserializing a `ContentItem` never fails.

use crate::model::ToolUseId;
use crate::parser::{decode_content_item, decode_message_content};
use crate::provider::{self, Citation};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ===== MessageContent =====

/// Content of a user message.
///
/// Sum type ensures exactly one representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content (typically typed user prompts)
    Text(String),
    /// Structured content items (tool results, pasted images)
    Items(Vec<ContentItem>),
}

impl MessageContent {
    /// Get text content, joining all text items.
    ///
    /// Returns empty string if no text items are present.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Items(items) => join_text(items),
        }
    }

    /// Content items in order; empty for plain text.
    pub fn items(&self) -> &[ContentItem] {
        match self {
            MessageContent::Text(_) => &[],
            MessageContent::Items(items) => items,
        }
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(decode_message_content)
    }
}

pub(crate) fn join_text(items: &[ContentItem]) -> String {
    items
        .iter()
        .filter_map(ContentItem::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}

// ===== ContentItem =====

/// One atomic unit of message content.
///
/// Text, tool-use and thinking items may have been decoded from either
/// the provider-native block shape or the local log shape; both land in
/// the same variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text(TextContent),
    ToolUse(ToolUseContent),
    ToolResult(ToolResultContent),
    Thinking(ThinkingContent),
    Image(ImageContent),
}

impl ContentItem {
    /// Plain text item without citations.
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text(TextContent {
            text: text.into(),
            citations: None,
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentItem::Text(content) => Some(&content.text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUseContent> {
        match self {
            ContentItem::ToolUse(tool_use) => Some(tool_use),
            _ => None,
        }
    }

    /// Convert to the provider block shape.
    ///
    /// Tool results, images and unsigned thinking have no provider block.
    pub fn to_provider_block(&self) -> Option<provider::ContentBlock> {
        match self {
            ContentItem::Text(content) => Some(provider::ContentBlock::Text(provider::TextBlock {
                text: content.text.clone(),
                citations: content.citations.clone(),
            })),
            ContentItem::ToolUse(tool_use) => {
                Some(provider::ContentBlock::ToolUse(provider::ToolUseBlock {
                    id: tool_use.id.clone(),
                    name: tool_use.name.as_str().to_string(),
                    input: tool_use.input.clone(),
                }))
            }
            ContentItem::Thinking(thinking) => {
                let signature = thinking.signature.clone()?;
                Some(provider::ContentBlock::Thinking(provider::ThinkingBlock {
                    thinking: thinking.thinking.clone(),
                    signature,
                }))
            }
            ContentItem::ToolResult(_) | ContentItem::Image(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(decode_content_item(&raw))
    }
}

impl From<provider::ContentBlock> for ContentItem {
    fn from(block: provider::ContentBlock) -> Self {
        match block {
            provider::ContentBlock::Text(text) => ContentItem::Text(text.into()),
            provider::ContentBlock::ToolUse(tool_use) => ContentItem::ToolUse(tool_use.into()),
            provider::ContentBlock::Thinking(thinking) => ContentItem::Thinking(thinking.into()),
        }
    }
}

// ===== Text =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub text: String,
    /// Present only when the provider text block shape matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

impl From<provider::TextBlock> for TextContent {
    fn from(block: provider::TextBlock) -> Self {
        Self {
            text: block.text,
            citations: block.citations,
        }
    }
}

// ===== ToolUse =====

/// Tool invocation recorded in a transcript.
///
/// The id links to a corresponding tool result item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolUseContent {
    id: ToolUseId,
    name: ToolName,
    input: Map<String, Value>,
}

impl ToolUseContent {
    pub fn new(id: ToolUseId, name: ToolName, input: Map<String, Value>) -> Self {
        Self { id, name, input }
    }

    pub fn id(&self) -> &ToolUseId {
        &self.id
    }

    pub fn name(&self) -> &ToolName {
        &self.name
    }

    /// Tool-specific input parameters
    pub fn input(&self) -> &Map<String, Value> {
        &self.input
    }
}

impl From<provider::ToolUseBlock> for ToolUseContent {
    fn from(block: provider::ToolUseBlock) -> Self {
        Self::new(block.id, ToolName::parse(&block.name), block.input)
    }
}

// ===== ToolName =====

/// Tool names recognized in transcripts.
///
/// Known tools get their own variant; anything else is kept verbatim in
/// `Other`, so every name round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolName {
    Read,
    Write,
    Edit,
    MultiEdit,
    Bash,
    Grep,
    Glob,
    Task,
    WebSearch,
    WebFetch,
    Other(String),
}

impl ToolName {
    pub fn parse(name: &str) -> Self {
        match name {
            "Read" => Self::Read,
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "MultiEdit" => Self::MultiEdit,
            "Bash" => Self::Bash,
            "Grep" => Self::Grep,
            "Glob" => Self::Glob,
            "Task" => Self::Task,
            "WebSearch" => Self::WebSearch,
            "WebFetch" => Self::WebFetch,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Edit => "Edit",
            Self::MultiEdit => "MultiEdit",
            Self::Bash => "Bash",
            Self::Grep => "Grep",
            Self::Glob => "Glob",
            Self::Task => "Task",
            Self::WebSearch => "WebSearch",
            Self::WebFetch => "WebFetch",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ToolName {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ToolName> for String {
    fn from(value: ToolName) -> Self {
        value.as_str().to_string()
    }
}

// ===== ToolResult =====

/// Result returned from a tool execution. Always the local log shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultContent {
    pub tool_use_id: ToolUseId,
    pub content: ToolResultBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResultBody {
    Text(String),
    /// Loosely-typed blocks, typically `{"type": "text", ...}` objects.
    Blocks(Vec<Map<String, Value>>),
}

// ===== Thinking =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThinkingContent {
    pub thinking: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl From<provider::ThinkingBlock> for ThinkingContent {
    fn from(block: provider::ThinkingBlock) -> Self {
        Self {
            thinking: block.thinking,
            signature: Some(block.signature),
        }
    }
}

// ===== Image =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub source: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: ImageSourceKind,
    pub media_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceKind {
    Base64,
}

// ===== Tests =====
