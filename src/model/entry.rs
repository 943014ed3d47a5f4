//! Transcript entry types.
//!
//! [`TranscriptEntry`] is the decoded form of one JSONL record. Its
//! `Deserialize` impl delegates to [`decode_entry`], and `Serialize` writes
//! the same JSON shape back out, so an encoded entry decodes to itself.

use crate::model::{join_text, ContentItem, MessageContent, ToolUseContent, ToolUseResult, UsageInfo};
use crate::model::{EntryUuid, SessionId};
use crate::parser::{decode_entry, normalize_usage};
use crate::provider::{self, AssistantRole, MessageType, StopReason};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

// ===== EntryKind =====

/// Value of the `type` discriminator - exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// `"user"`: a prompt or tool results sent back to the model.
    User,
    /// `"assistant"`: one model response.
    Assistant,
    /// `"summary"`: conversation title attached to a leaf entry.
    Summary,
    /// `"system"`: notices such as hook output and warnings.
    System,
    /// `"queue-operation"`: prompt queue bookkeeping.
    QueueOperation,
}

impl EntryKind {
    /// Every kind, in discriminator order.
    pub const ALL: [EntryKind; 5] = [
        EntryKind::User,
        EntryKind::Assistant,
        EntryKind::Summary,
        EntryKind::System,
        EntryKind::QueueOperation,
    ];

    /// Look up a `type` discriminator; `None` for anything unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "summary" => Some(Self::Summary),
            "system" => Some(Self::System),
            "queue-operation" => Some(Self::QueueOperation),
            _ => None,
        }
    }

    /// The discriminator as written in the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Summary => "summary",
            Self::System => "system",
            Self::QueueOperation => "queue-operation",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== SessionMetadata =====

/// Metadata shared by user, assistant and system entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Required key; `null` for the first entry of a conversation.
    #[serde(deserialize_with = "required_nullable")]
    pub parent_uuid: Option<EntryUuid>,
    pub is_sidechain: bool,
    pub user_type: String,
    pub cwd: PathBuf,
    pub session_id: SessionId,
    pub version: String,
    pub uuid: EntryUuid,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_meta: Option<bool>,
}

impl SessionMetadata {
    /// Timestamp as UTC, if it is valid RFC 3339.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

// ===== User =====

/// Literal `"user"` role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "user")]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub role: UserRole,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    #[serde(flatten)]
    pub meta: SessionMetadata,
    pub message: UserMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_result: Option<ToolUseResult>,
}

// ===== Assistant =====

/// Assistant message, shaped like the provider's message object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub role: AssistantRole,
    pub model: String,
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(
        default,
        deserialize_with = "normalized_usage",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage: Option<UsageInfo>,
}

impl AssistantMessage {
    pub fn from_provider_message(message: provider::Message) -> Self {
        Self {
            id: message.id,
            kind: message.kind,
            role: message.role,
            model: message.model,
            content: message.content.into_iter().map(ContentItem::from).collect(),
            stop_reason: message.stop_reason,
            stop_sequence: message.stop_sequence,
            usage: Some(UsageInfo::from(message.usage)),
        }
    }

    /// Text items joined by newlines.
    pub fn text(&self) -> String {
        join_text(&self.content)
    }

    pub fn tool_uses(&self) -> Vec<&ToolUseContent> {
        self.content
            .iter()
            .filter_map(ContentItem::as_tool_use)
            .collect()
    }
}

fn normalized_usage<'de, D>(deserializer: D) -> Result<Option<UsageInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize_usage(&raw))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantEntry {
    #[serde(flatten)]
    pub meta: SessionMetadata,
    pub message: AssistantMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

// ===== Summary =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub summary: String,
    pub leaf_uuid: EntryUuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

// ===== System =====

/// System notices such as warnings and hook output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemEntry {
    #[serde(flatten)]
    pub meta: SessionMetadata,
    pub content: String,
    /// Severity, e.g. "info", "warning", "error".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

// ===== Queue operation =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueOperation {
    Enqueue,
    Dequeue,
}

/// Prompt queueing bookkeeping. Content duplicates a later user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOperationEntry {
    pub operation: QueueOperation,
    pub timestamp: String,
    pub session_id: SessionId,
    /// Only sequences are decoded; any other `content` counts as absent.
    #[serde(
        default,
        deserialize_with = "queued_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<ContentItem>>,
}

fn queued_content<'de, D>(deserializer: D) -> Result<Option<Vec<ContentItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .iter()
                .map(crate::parser::decode_content_item)
                .collect(),
        )),
        _ => Ok(None),
    }
}

// ===== TranscriptEntry =====

/// One decoded transcript record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TranscriptEntry {
    #[serde(rename = "user")]
    User(UserEntry),
    #[serde(rename = "assistant")]
    Assistant(AssistantEntry),
    #[serde(rename = "summary")]
    Summary(SummaryEntry),
    #[serde(rename = "system")]
    System(SystemEntry),
    #[serde(rename = "queue-operation")]
    QueueOperation(QueueOperationEntry),
}

impl TranscriptEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            TranscriptEntry::User(_) => EntryKind::User,
            TranscriptEntry::Assistant(_) => EntryKind::Assistant,
            TranscriptEntry::Summary(_) => EntryKind::Summary,
            TranscriptEntry::System(_) => EntryKind::System,
            TranscriptEntry::QueueOperation(_) => EntryKind::QueueOperation,
        }
    }

    /// Shared session metadata; summary and queue entries carry none.
    pub fn meta(&self) -> Option<&SessionMetadata> {
        match self {
            TranscriptEntry::User(entry) => Some(&entry.meta),
            TranscriptEntry::Assistant(entry) => Some(&entry.meta),
            TranscriptEntry::System(entry) => Some(&entry.meta),
            TranscriptEntry::Summary(_) | TranscriptEntry::QueueOperation(_) => None,
        }
    }

    pub fn uuid(&self) -> Option<&EntryUuid> {
        self.meta().map(|meta| &meta.uuid)
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            TranscriptEntry::QueueOperation(entry) => Some(&entry.session_id),
            other => other.meta().map(|meta| &meta.session_id),
        }
    }

    /// Raw timestamp string; summaries are not timestamped.
    pub fn timestamp(&self) -> Option<&str> {
        match self {
            TranscriptEntry::QueueOperation(entry) => Some(&entry.timestamp),
            other => other.meta().map(|meta| meta.timestamp.as_str()),
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp().and_then(parse_timestamp)
    }

    pub fn usage(&self) -> Option<&UsageInfo> {
        match self {
            TranscriptEntry::Assistant(entry) => entry.message.usage.as_ref(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for TranscriptEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        decode_entry(raw).map_err(D::Error::custom)
    }
}

// ===== Tests =====
