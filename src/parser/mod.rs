//! Decoders for Claude Code transcript records.
//!
//! This module provides pure decoding functions for converting JSON records
//! (or JSONL lines) into validated [`TranscriptEntry`] values.

mod content;
mod tool_result;
mod usage;

pub use content::{decode_content_item, decode_message_content};
pub use tool_result::decode_tool_use_result;
pub use usage::{normalize_usage, UsageData};

use crate::model::{
    AssistantEntry, DecodeError, EntryKind, MalformedRecord, ParseError, QueueOperationEntry,
    SessionId, SummaryEntry, SystemEntry, TranscriptEntry, UserEntry,
};
use crate::provider;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, enabled, trace, Level};

/// Result of parsing a JSONL line with graceful error handling.
///
/// Lets a caller keep going past lines that cannot be decoded.
#[derive(Debug, Clone)]
pub enum ParseResult {
    /// Successfully decoded entry.
    Valid(Box<TranscriptEntry>),
    /// The line could not be decoded.
    Malformed(MalformedRecord),
}

/// Decode one JSON record into a [`TranscriptEntry`].
///
/// The `type` discriminator selects the variant, which is then validated
/// structurally. Nested content items and usage blocks never fail; they
/// degrade as described in [`decode_content_item`] and [`normalize_usage`].
///
/// # Errors
///
/// - [`DecodeError::UnknownEntryKind`] when `type` is missing or not one of
///   the known kinds.
/// - [`DecodeError::MalformedEntry`] when a known kind fails validation.
pub fn decode_entry(raw: Value) -> Result<TranscriptEntry, DecodeError> {
    let discriminator = raw.get("type").cloned().unwrap_or(Value::Null);
    let kind = discriminator
        .as_str()
        .and_then(EntryKind::parse)
        .ok_or(DecodeError::UnknownEntryKind(discriminator))?;

    match kind {
        EntryKind::User => validate::<UserEntry>(kind, raw).map(TranscriptEntry::User),
        EntryKind::Assistant => {
            if enabled!(Level::TRACE) {
                log_provider_compat(&raw);
            }
            validate::<AssistantEntry>(kind, raw).map(TranscriptEntry::Assistant)
        }
        EntryKind::Summary => validate::<SummaryEntry>(kind, raw).map(TranscriptEntry::Summary),
        EntryKind::System => validate::<SystemEntry>(kind, raw).map(TranscriptEntry::System),
        EntryKind::QueueOperation => {
            validate::<QueueOperationEntry>(kind, raw).map(TranscriptEntry::QueueOperation)
        }
    }
}

fn validate<T: DeserializeOwned>(kind: EntryKind, raw: Value) -> Result<T, DecodeError> {
    serde_json::from_value(raw).map_err(|source| DecodeError::MalformedEntry { kind, source })
}

/// Report whether an assistant message would also pass as a provider message.
///
/// Purely diagnostic: the result is logged and discarded.
fn log_provider_compat(raw: &Value) {
    let Some(message) = raw.get("message") else {
        return;
    };
    match provider::check_message_compat(message) {
        Ok(_) => trace!("assistant message is provider compatible"),
        Err(error) => trace!(%error, "assistant message is not provider compatible"),
    }
}

/// Parse a single JSONL line into a [`TranscriptEntry`].
///
/// # Errors
///
/// - [`ParseError::InvalidJson`] if the line is not valid JSON.
/// - [`ParseError::Decode`] if the JSON is not a valid record.
pub fn parse_line(raw: &str, line_number: usize) -> Result<TranscriptEntry, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;

    decode_entry(value).map_err(|source| ParseError::Decode {
        line: line_number,
        source,
    })
}

/// Parse a single JSONL line gracefully.
///
/// Unlike [`parse_line`], this never returns an error. Failures become a
/// [`MalformedRecord`] keeping the raw line and, when it can be recovered,
/// the session id.
///
/// # Arguments
///
/// * `raw` - The raw JSONL line to parse
/// * `line_number` - The line number (1-indexed) for error reporting
pub fn parse_line_graceful(raw: &str, line_number: usize) -> ParseResult {
    match parse_line(raw, line_number) {
        Ok(entry) => ParseResult::Valid(Box::new(entry)),
        Err(parse_error) => {
            debug!(line = line_number, error = %parse_error, "malformed transcript line");
            let session_id = extract_session_id_best_effort(raw);

            ParseResult::Malformed(MalformedRecord::new(
                line_number,
                raw,
                parse_error.to_string(),
                session_id,
            ))
        }
    }
}

/// Pull `sessionId` out of a line that failed to decode.
///
/// Returns None if the line is not JSON or the id is missing or empty.
fn extract_session_id_best_effort(raw: &str) -> Option<SessionId> {
    #[derive(Deserialize)]
    struct PartialEntry {
        #[serde(rename = "sessionId")]
        session_id: Option<String>,
    }

    serde_json::from_str::<PartialEntry>(raw)
        .ok()
        .and_then(|partial| partial.session_id)
        .and_then(|id| SessionId::new(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ContentItem, MessageContent, QueueOperation, ToolName, ToolUseResult,
    };
    use crate::provider::StopReason;
    use serde_json::json;

    fn with_meta(kind: &str, extra: Value) -> Value {
        let mut raw = json!({
            "type": kind,
            "parentUuid": null,
            "isSidechain": false,
            "userType": "external",
            "cwd": "/home/user/project",
            "sessionId": "session-123",
            "version": "1.0.98",
            "uuid": "uuid-001",
            "timestamp": "2025-12-25T10:00:00.123Z"
        });
        let fields = raw.as_object_mut().unwrap();
        for (key, value) in extra.as_object().unwrap() {
            fields.insert(key.clone(), value.clone());
        }
        raw
    }

    fn assistant_message(content: Value, usage: Value) -> Value {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-opus-4-5-20251101",
            "content": content,
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": usage
        })
    }

    // ===== Successful Decoding Tests =====

    #[test]
    fn decode_entry_minimal_user_message() {
        let raw = with_meta("user", json!({"message": {"role": "user", "content": "Hello"}}));
        let entry = decode_entry(raw).expect("valid user entry");

        assert_eq!(entry.kind(), EntryKind::User);
        assert_eq!(entry.uuid().unwrap().as_str(), "uuid-001");
        assert_eq!(entry.session_id().unwrap().as_str(), "session-123");
        match entry {
            TranscriptEntry::User(user) => {
                assert_eq!(user.message.content, MessageContent::Text("Hello".to_string()));
                assert!(user.tool_use_result.is_none());
            }
            other => panic!("Expected User, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_user_with_parent_uuid() {
        let raw = with_meta(
            "user",
            json!({"parentUuid": "uuid-000", "message": {"role": "user", "content": "Hi"}}),
        );
        let entry = decode_entry(raw).unwrap();
        assert_eq!(
            entry.meta().unwrap().parent_uuid.as_ref().unwrap().as_str(),
            "uuid-000"
        );
    }

    #[test]
    fn decode_entry_user_with_mcp_tool_result() {
        let raw = with_meta(
            "user",
            json!({
                "message": {
                    "role": "user",
                    "content": [{"type": "tool_result", "tool_use_id": "toolu_01", "content": "ok"}]
                },
                "toolUseResult": [{"type": "text", "text": "ok"}]
            }),
        );

        match decode_entry(raw).unwrap() {
            TranscriptEntry::User(user) => {
                assert_eq!(
                    user.tool_use_result,
                    Some(ToolUseResult::Items(vec![ContentItem::text("ok")]))
                );
                assert!(matches!(user.message.content.items()[0], ContentItem::ToolResult(_)));
            }
            other => panic!("Expected User, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_user_with_null_tool_result() {
        let raw = with_meta(
            "user",
            json!({"message": {"role": "user", "content": "x"}, "toolUseResult": null}),
        );
        match decode_entry(raw).unwrap() {
            TranscriptEntry::User(user) => assert!(user.tool_use_result.is_none()),
            other => panic!("Expected User, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_assistant_with_usage() {
        let raw = with_meta(
            "assistant",
            json!({
                "message": assistant_message(
                    json!([{"type": "text", "text": "Hi there"}]),
                    json!({
                        "input_tokens": 100,
                        "output_tokens": 50,
                        "cache_creation_input_tokens": 20,
                        "cache_read_input_tokens": 10
                    })
                ),
                "requestId": "req_01"
            }),
        );

        let entry = decode_entry(raw).expect("valid assistant entry");
        let usage = entry.usage().expect("Should have usage");
        assert_eq!(usage.input_tokens, Some(100));
        assert_eq!(usage.output_tokens, Some(50));
        assert_eq!(usage.cache_creation_input_tokens, Some(20));
        assert_eq!(usage.cache_read_input_tokens, Some(10));

        match entry {
            TranscriptEntry::Assistant(assistant) => {
                assert_eq!(assistant.request_id.as_deref(), Some("req_01"));
                assert_eq!(assistant.message.stop_reason, Some(StopReason::EndTurn));
                assert_eq!(assistant.message.text(), "Hi there");
            }
            other => panic!("Expected Assistant, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_assistant_with_null_usage() {
        let raw = with_meta(
            "assistant",
            json!({"message": assistant_message(json!([]), Value::Null)}),
        );
        let entry = decode_entry(raw).unwrap();
        assert!(entry.usage().is_none());
    }

    #[test]
    fn decode_entry_assistant_with_mixed_content_blocks() {
        let raw = with_meta(
            "assistant",
            json!({"message": assistant_message(
                json!([
                    {"type": "text", "text": "I'll read the file"},
                    {"type": "thinking", "thinking": "Using Read tool"},
                    {"type": "tool_use", "id": "t1", "name": "Read", "input": {"file": "a.txt"}},
                    {"type": "text", "text": "Done"}
                ]),
                json!({"input_tokens": 1, "output_tokens": 1})
            )}),
        );

        match decode_entry(raw).unwrap() {
            TranscriptEntry::Assistant(assistant) => {
                let content = &assistant.message.content;
                assert_eq!(content.len(), 4);
                assert!(matches!(content[0], ContentItem::Text(_)));
                assert!(matches!(content[1], ContentItem::Thinking(_)));
                assert_eq!(content[2].as_tool_use().unwrap().name(), &ToolName::Read);
                assert!(matches!(content[3], ContentItem::Text(_)));
            }
            other => panic!("Expected Assistant, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_assistant_with_string_content_is_malformed() {
        let raw = with_meta(
            "assistant",
            json!({"message": assistant_message(json!("plain"), Value::Null)}),
        );
        let err = decode_entry(raw).expect_err("assistant content must be a list");
        assert_eq!(err.entry_kind(), Some(EntryKind::Assistant));
    }

    #[test]
    fn decode_entry_summary() {
        let raw = json!({"type": "summary", "summary": "Refactor parser", "leafUuid": "uuid-9"});
        match decode_entry(raw).unwrap() {
            TranscriptEntry::Summary(summary) => {
                assert_eq!(summary.summary, "Refactor parser");
                assert_eq!(summary.leaf_uuid.as_str(), "uuid-9");
                assert!(summary.cwd.is_none());
            }
            other => panic!("Expected Summary, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_system_with_level() {
        let raw = with_meta(
            "system",
            json!({"content": "Running PostToolUse hooks", "level": "info"}),
        );
        match decode_entry(raw).unwrap() {
            TranscriptEntry::System(system) => {
                assert_eq!(system.content, "Running PostToolUse hooks");
                assert_eq!(system.level.as_deref(), Some("info"));
            }
            other => panic!("Expected System, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_queue_operation_with_content() {
        let raw = json!({
            "type": "queue-operation",
            "operation": "enqueue",
            "timestamp": "2025-12-25T10:00:00Z",
            "sessionId": "session-123",
            "content": [{"type": "text", "text": "next task"}]
        });

        let entry = decode_entry(raw).unwrap();
        assert_eq!(entry.kind(), EntryKind::QueueOperation);
        assert!(entry.uuid().is_none());
        match entry {
            TranscriptEntry::QueueOperation(queue) => {
                assert_eq!(queue.operation, QueueOperation::Enqueue);
                assert_eq!(queue.content, Some(vec![ContentItem::text("next task")]));
            }
            other => panic!("Expected QueueOperation, got {:?}", other),
        }
    }

    // ===== Error Handling Tests =====

    #[test]
    fn decode_entry_unknown_type_carries_discriminator() {
        let err = decode_entry(json!({"type": "progress", "uuid": "u1"})).unwrap_err();
        match err {
            DecodeError::UnknownEntryKind(value) => assert_eq!(value, json!("progress")),
            other => panic!("Expected UnknownEntryKind, got {:?}", other),
        }
    }

    #[test]
    fn decode_entry_missing_type_carries_null() {
        let err = decode_entry(json!({"uuid": "u1"})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEntryKind(Value::Null)));
    }

    #[test]
    fn decode_entry_non_string_type_is_unknown() {
        let err = decode_entry(json!({"type": 3})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEntryKind(ref v) if v == &json!(3)));
    }

    #[test]
    fn decode_entry_type_is_case_sensitive() {
        let err = decode_entry(json!({"type": "User"})).unwrap_err();
        assert_eq!(err.discriminator(), Some("User"));
    }

    #[test]
    fn decode_entry_non_object_record_is_unknown() {
        let err = decode_entry(json!(["user"])).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEntryKind(Value::Null)));
    }

    #[test]
    fn decode_entry_missing_uuid_is_malformed() {
        let mut raw = with_meta("user", json!({"message": {"role": "user", "content": "x"}}));
        raw.as_object_mut().unwrap().remove("uuid");

        let err = decode_entry(raw).unwrap_err();
        assert_eq!(err.entry_kind(), Some(EntryKind::User));
        assert!(err.to_string().contains("uuid"), "got: {}", err);
    }

    #[test]
    fn decode_entry_empty_uuid_is_malformed() {
        let raw = with_meta(
            "user",
            json!({"uuid": "", "message": {"role": "user", "content": "x"}}),
        );
        let err = decode_entry(raw).unwrap_err();
        assert_eq!(err.entry_kind(), Some(EntryKind::User));
    }

    #[test]
    fn decode_entry_unmatched_tool_result_is_malformed() {
        let raw = with_meta(
            "user",
            json!({"message": {"role": "user", "content": "x"}, "toolUseResult": 17}),
        );
        let err = decode_entry(raw).unwrap_err();
        assert_eq!(err.entry_kind(), Some(EntryKind::User));
    }

    #[test]
    fn decode_entry_summary_without_leaf_uuid_is_malformed() {
        let err = decode_entry(json!({"type": "summary", "summary": "s"})).unwrap_err();
        assert_eq!(err.entry_kind(), Some(EntryKind::Summary));
        assert!(err.to_string().contains("leafUuid"), "got: {}", err);
    }

    #[test]
    fn decode_entry_bad_queue_operation_is_malformed() {
        let err = decode_entry(json!({
            "type": "queue-operation",
            "operation": "popAll",
            "timestamp": "t",
            "sessionId": "s"
        }))
        .unwrap_err();
        assert_eq!(err.entry_kind(), Some(EntryKind::QueueOperation));
    }

    // ===== Line Parsing Tests =====

    #[test]
    fn parse_line_decodes_valid_record() {
        let raw = r#"{"type":"summary","summary":"Done","leafUuid":"u-7"}"#;
        let entry = parse_line(raw, 1).expect("valid line");
        assert_eq!(entry.kind(), EntryKind::Summary);
    }

    #[test]
    fn parse_line_malformed_json() {
        let raw = r#"{"type":"user","message":{"role":"user""#;
        match parse_line(raw, 42).unwrap_err() {
            ParseError::InvalidJson { line, message } => {
                assert_eq!(line, 42, "Should preserve line number");
                assert!(!message.is_empty(), "Should have error message");
            }
            other => panic!("Expected InvalidJson error, got {:?}", other),
        }
    }

    #[test]
    fn parse_line_decode_error_keeps_line() {
        let raw = r#"{"type":"file-history-snapshot","messageId":"m1"}"#;
        match parse_line(raw, 9).unwrap_err() {
            ParseError::Decode { line, source } => {
                assert_eq!(line, 9);
                assert_eq!(source.discriminator(), Some("file-history-snapshot"));
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    // ===== Graceful Parsing Tests =====

    #[test]
    fn parse_line_graceful_returns_valid_for_correct_json() {
        let raw = with_meta("user", json!({"message": {"role": "user", "content": "Hello"}}))
            .to_string();

        match parse_line_graceful(&raw, 1) {
            ParseResult::Valid(entry) => {
                assert_eq!(entry.uuid().unwrap().as_str(), "uuid-001");
            }
            ParseResult::Malformed(m) => panic!("Expected Valid, got {:?}", m),
        }
    }

    #[test]
    fn parse_line_graceful_returns_malformed_for_invalid_json() {
        let raw = r#"{"type":"user","message":{"role":"user""#;

        match parse_line_graceful(raw, 42) {
            ParseResult::Malformed(malformed) => {
                assert_eq!(malformed.line_number(), 42, "Should preserve line number");
                assert_eq!(malformed.raw_line(), raw, "Should preserve raw line content");
                assert!(!malformed.error_message().is_empty());
                assert!(malformed.session_id().is_none());
            }
            ParseResult::Valid(_) => panic!("Expected Malformed, got Valid"),
        }
    }

    #[test]
    fn parse_line_graceful_extracts_session_id_when_possible() {
        let raw = r#"{"type":"user","sessionId":"extractable-session","uuid":"u1"}"#;

        match parse_line_graceful(raw, 10) {
            ParseResult::Malformed(malformed) => {
                assert_eq!(
                    malformed.session_id().map(SessionId::as_str),
                    Some("extractable-session")
                );
                assert!(malformed.error_message().contains("Malformed user entry"));
            }
            ParseResult::Valid(_) => panic!("Expected Malformed for incomplete user entry"),
        }
    }

    #[test]
    fn parse_line_graceful_ignores_empty_session_id() {
        let raw = r#"{"type":"progress","sessionId":""}"#;
        match parse_line_graceful(raw, 3) {
            ParseResult::Malformed(malformed) => assert!(malformed.session_id().is_none()),
            ParseResult::Valid(_) => panic!("Expected Malformed"),
        }
    }

    #[test]
    fn parse_line_graceful_handles_empty_line() {
        match parse_line_graceful("", 1) {
            ParseResult::Malformed(malformed) => {
                assert_eq!(malformed.line_number(), 1);
                assert_eq!(malformed.raw_line(), "");
            }
            ParseResult::Valid(_) => panic!("Expected Malformed for empty line"),
        }
    }

    #[test]
    fn parse_line_graceful_handles_non_json_text() {
        let raw = "This is just plain text, not JSON at all";

        match parse_line_graceful(raw, 23) {
            ParseResult::Malformed(malformed) => {
                assert_eq!(malformed.line_number(), 23);
                assert_eq!(malformed.raw_line(), raw);
                assert!(malformed.error_message().contains("line 23"));
            }
            ParseResult::Valid(_) => panic!("Expected Malformed for non-JSON text"),
        }
    }

    // ===== Deserialize delegation =====

    #[test]
    fn transcript_entry_deserialize_delegates_to_decoder() {
        let raw = json!({"type": "summary", "summary": "s", "leafUuid": "u"});
        let via_serde: TranscriptEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(via_serde, decode_entry(raw).unwrap());
    }

    #[test]
    fn transcript_entry_deserialize_reports_unknown_kind() {
        let err = serde_json::from_str::<TranscriptEntry>(r#"{"type":"progress"}"#).unwrap_err();
        assert!(err.to_string().contains("Unknown transcript entry type"));
    }
}
