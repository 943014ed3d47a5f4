//! Domain model types (pure).
//!
//! All types in this module are immutable value records produced by the
//! decoders in [`crate::parser`].

pub mod content;
pub mod entry;
pub mod error;
pub mod identifiers;
pub mod malformed_record;
pub mod tool_result;
pub mod usage;

// Re-export for convenience
pub use content::{
    ContentItem, ImageContent, ImageSource, ImageSourceKind, MessageContent, TextContent,
    ThinkingContent, ToolName, ToolResultBody, ToolResultContent, ToolUseContent,
};
pub(crate) use content::join_text;
pub use entry::{
    AssistantEntry, AssistantMessage, EntryKind, QueueOperation, QueueOperationEntry,
    SessionMetadata, SummaryEntry, SystemEntry, TranscriptEntry, UserEntry, UserMessage, UserRole,
};
pub use error::{DecodeError, ParseError, TranscriptError};
pub use identifiers::{
    EntryUuid, InvalidSessionId, InvalidToolUseId, InvalidUuid, SessionId, ToolUseId,
};
pub use malformed_record::MalformedRecord;
pub use tool_result::{
    CommandResult, EditResult, FileInfo, FileReadKind, FileReadResult, TodoDiff, TodoItem,
    TodoPriority, TodoStatus, ToolUseResult,
};
pub use usage::UsageInfo;
