//! Error types for transcript decoding.
//!
//! Errors follow a small hierarchy built with `thiserror`, composing via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`DecodeError`] - one JSON record could not become a [`TranscriptEntry`]
//! - [`ParseError`] - one JSONL line failed, either as JSON text or as a record
//! - [`TranscriptError`] - a sequence of records was aborted at a given index
//!
//! # Recovery Strategy
//!
//! Only top-level failures are errors. Content items and usage blocks that
//! match no known shape degrade to a safe representation instead, since they
//! are numerous and individually low-stakes. A malformed or unknown record
//! is fatal for that record; the caller decides whether to skip it or abort
//! the whole transcript (see [`ErrorPolicy`](crate::transcript::ErrorPolicy)).
//!
//! [`TranscriptEntry`]: crate::model::TranscriptEntry

use crate::model::EntryKind;
use serde_json::Value;
use thiserror::Error;

/// Failure to decode one transcript record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The `type` discriminator is not one of the five known entry kinds.
    ///
    /// Carries the discriminator exactly as found, `Value::Null` when the
    /// key is missing. Silently dropping a whole record would corrupt
    /// session replay, so this is never degraded.
    #[error("Unknown transcript entry type: {0}")]
    UnknownEntryKind(Value),

    /// A known entry kind failed structural validation.
    ///
    /// The serde error names the offending field.
    #[error("Malformed {kind} entry: {source}")]
    MalformedEntry {
        kind: EntryKind,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// The unknown discriminator as a string, when it was one.
    pub fn discriminator(&self) -> Option<&str> {
        match self {
            DecodeError::UnknownEntryKind(value) => value.as_str(),
            DecodeError::MalformedEntry { .. } => None,
        }
    }

    /// Entry kind that failed validation, if the discriminator was known.
    pub fn entry_kind(&self) -> Option<EntryKind> {
        match self {
            DecodeError::UnknownEntryKind(_) => None,
            DecodeError::MalformedEntry { kind, .. } => Some(*kind),
        }
    }
}

/// Errors encountered when parsing JSONL lines.
///
/// All variants carry the 1-based line number so callers can point users at
/// the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not syntactically valid JSON.
    ///
    /// `message` is the `serde_json` error text; the error value itself is
    /// not kept.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson { line: usize, message: String },

    /// The line is valid JSON but not a valid transcript record.
    #[error("Invalid record at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. } | ParseError::Decode { line, .. } => *line,
        }
    }
}

/// A transcript decode aborted on a failing record.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// `index` is the 0-based position in the input sequence.
    #[error("Record {index} failed to decode: {source}")]
    Record {
        index: usize,
        #[source]
        source: DecodeError,
    },
}
