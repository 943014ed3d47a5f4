//! Canonical token usage record.

use crate::provider::{self, ServiceTier};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token usage for one assistant turn, in canonical form.
///
/// Every field is optional: a missing count means the log did not report
/// it, which is different from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    /// Opaque server-side tool counters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_tool_use: Option<Map<String, Value>>,
}

impl UsageInfo {
    /// Input tokens including both cache buckets. Unreported counts add zero.
    ///
    /// Saturates at `u64::MAX`.
    pub fn total_input(&self) -> u64 {
        self.input_tokens
            .unwrap_or(0)
            .saturating_add(self.cache_creation_input_tokens.unwrap_or(0))
            .saturating_add(self.cache_read_input_tokens.unwrap_or(0))
    }

    /// Input plus output tokens, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.total_input()
            .saturating_add(self.output_tokens.unwrap_or(0))
    }

    /// Convert to the provider shape.
    ///
    /// Returns `None` unless both input and output counts are present. A
    /// service tier the provider does not know is dropped, as are server
    /// tool counters that lack `web_search_requests`.
    pub fn to_provider_usage(&self) -> Option<provider::Usage> {
        let (input_tokens, output_tokens) = (self.input_tokens?, self.output_tokens?);

        Some(provider::Usage {
            input_tokens,
            output_tokens,
            cache_creation_input_tokens: self.cache_creation_input_tokens,
            cache_read_input_tokens: self.cache_read_input_tokens,
            service_tier: self.service_tier.as_deref().and_then(ServiceTier::parse),
            server_tool_use: self
                .server_tool_use
                .clone()
                .and_then(|map| serde_json::from_value(Value::Object(map)).ok()),
        })
    }
}

impl From<provider::Usage> for UsageInfo {
    fn from(usage: provider::Usage) -> Self {
        Self {
            input_tokens: Some(usage.input_tokens),
            cache_creation_input_tokens: usage.cache_creation_input_tokens,
            cache_read_input_tokens: usage.cache_read_input_tokens,
            output_tokens: Some(usage.output_tokens),
            service_tier: usage.service_tier.map(|tier| tier.as_str().to_string()),
            server_tool_use: usage.server_tool_use.map(Map::from),
        }
    }
}
