//! Token usage normalization.
//!
//! Usage blocks show up in two dialects (the logger's own output and raw
//! provider responses) plus partially conforming variants from different
//! SDK versions. Every dialect is converted into [`UsageInfo`] by inspecting
//! the shape of the input. A mismatch never fails the surrounding entry.

use crate::model::UsageInfo;
use crate::provider;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

/// Usage data from any source, prior to normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageData {
    /// Already canonical; returned unchanged.
    Canonical(UsageInfo),
    /// Typed provider usage.
    Provider(provider::Usage),
    /// Untyped JSON as found in a log record.
    Json(Value),
}

impl UsageData {
    pub fn normalize(self) -> Option<UsageInfo> {
        match self {
            UsageData::Canonical(usage) => Some(usage),
            UsageData::Provider(usage) => Some(usage.into()),
            UsageData::Json(raw) => normalize_usage(&raw),
        }
    }
}

impl From<UsageInfo> for UsageData {
    fn from(usage: UsageInfo) -> Self {
        UsageData::Canonical(usage)
    }
}

impl From<provider::Usage> for UsageData {
    fn from(usage: provider::Usage) -> Self {
        UsageData::Provider(usage)
    }
}

impl From<Value> for UsageData {
    fn from(raw: Value) -> Self {
        UsageData::Json(raw)
    }
}

/// Normalize a JSON usage block.
///
/// - `null` yields `None`.
/// - Objects carrying both `input_tokens` and `output_tokens` are validated
///   against the provider shape first.
/// - Other objects are validated against the canonical shape.
/// - Objects that fail validation fall back to per-field extraction.
/// - Any other JSON value yields `None`.
pub fn normalize_usage(raw: &Value) -> Option<UsageInfo> {
    let fields = match raw {
        Value::Null => return None,
        Value::Object(fields) => fields,
        other => {
            trace!(usage = %other, "ignoring non-object usage");
            return None;
        }
    };

    if has_provider_counts(fields) {
        match provider::Usage::deserialize(raw) {
            Ok(usage) => return Some(usage.into()),
            Err(error) => trace!(%error, "usage is not provider-shaped, extracting fields"),
        }
        return Some(extract_fields(fields));
    }

    match UsageInfo::deserialize(raw) {
        Ok(usage) => Some(usage),
        Err(error) => {
            trace!(%error, "usage is not canonical, extracting fields");
            Some(extract_fields(fields))
        }
    }
}

fn has_provider_counts(fields: &Map<String, Value>) -> bool {
    fields.contains_key("input_tokens") && fields.contains_key("output_tokens")
}

/// Take each field only when present with the expected JSON type.
fn extract_fields(fields: &Map<String, Value>) -> UsageInfo {
    let count = |key: &str| fields.get(key).and_then(Value::as_u64);

    UsageInfo {
        input_tokens: count("input_tokens"),
        cache_creation_input_tokens: count("cache_creation_input_tokens"),
        cache_read_input_tokens: count("cache_read_input_tokens"),
        output_tokens: count("output_tokens"),
        service_tier: fields
            .get("service_tier")
            .and_then(Value::as_str)
            .map(str::to_string),
        server_tool_use: fields
            .get("server_tool_use")
            .and_then(Value::as_object)
            .cloned(),
    }
}
