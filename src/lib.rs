//! Claude Code transcript decoder (cc-transcript)
//!
//! Typed decoding of the JSONL session logs Claude Code writes: user and
//! assistant turns, summaries, system notices and queue operations.
//!
//! Top-level records are strict: an unknown `type` or a structurally invalid
//! record is an error. Nested content is lenient: content items and usage
//! blocks that match no known shape degrade to a safe representation.
//!
//! ```
//! use cc_transcript::{parse_line, TranscriptEntry};
//!
//! let line = r#"{"type":"summary","summary":"Fix flaky test","leafUuid":"a1"}"#;
//! let entry = parse_line(line, 1).unwrap();
//! assert!(matches!(entry, TranscriptEntry::Summary(_)));
//! ```

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod provider;
pub mod transcript;

pub use model::{
    ContentItem, DecodeError, EntryKind, MessageContent, ParseError, TranscriptEntry,
    TranscriptError, UsageInfo,
};
pub use parser::{
    decode_content_item, decode_entry, normalize_usage, parse_line, parse_line_graceful,
    ParseResult,
};
pub use transcript::{DecodedTranscript, ErrorPolicy, TranscriptDecoder};

#[cfg(test)]
mod tests;
