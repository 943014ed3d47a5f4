//! Malformed record type for unparseable JSONL lines.
//!
//! When a line cannot be decoded into a TranscriptEntry, a MalformedRecord
//! keeps enough context to report it and move on to the next line.

use crate::model::SessionId;

/// A JSONL line that could not be decoded.
#[derive(Debug, Clone)]
pub struct MalformedRecord {
    line_number: usize,
    raw_line: String,
    error_message: String,
    session_id: Option<SessionId>,
}

impl MalformedRecord {
    /// Create a new malformed record.
    ///
    /// # Arguments
    ///
    /// * `line_number` - The line number in the JSONL file (1-indexed)
    /// * `raw_line` - The raw line content that failed to decode
    /// * `error_message` - Human-readable error message
    /// * `session_id` - Session ID if extractable from a partial parse
    pub fn new(
        line_number: usize,
        raw_line: impl Into<String>,
        error_message: impl Into<String>,
        session_id: Option<SessionId>,
    ) -> Self {
        Self {
            line_number,
            raw_line: raw_line.into(),
            error_message: error_message.into(),
            session_id,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }
}
