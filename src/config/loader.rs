//! Configuration file loading with precedence handling.

use super::{CONFIG_PATH_ENV, ON_ERROR_ENV};
use crate::transcript::{
    DecoderOptions, ErrorPolicy, TranscriptDecoder, DEFAULT_PARALLEL_THRESHOLD,
};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An override variable holds a value outside its domain.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/cc-transcript/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `"skip"` or `"abort"`.
    #[serde(default)]
    pub on_error: Option<ErrorPolicy>,

    /// Record count at which decoding goes parallel.
    #[serde(default)]
    pub parallel_threshold: Option<usize>,

    /// Worker threads for parallel decoding, 0 for available parallelism.
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub on_error: ErrorPolicy,
    pub parallel_threshold: usize,
    pub worker_threads: usize,
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Skip,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            worker_threads: 0,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Build a decoder with these settings.
    pub fn decoder(&self) -> TranscriptDecoder {
        TranscriptDecoder::new(DecoderOptions {
            on_error: self.on_error,
            parallel_threshold: self.parallel_threshold,
            worker_threads: self.worker_threads,
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/cc-transcript/cc-transcript.log` on Linux, or the
/// platform state directory elsewhere. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("cc-transcript").join("cc-transcript.log")
    } else {
        PathBuf::from("cc-transcript.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cc-transcript").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument
/// 2. `CC_TRANSCRIPT_CONFIG` environment variable
/// 3. Default path `~/.config/cc-transcript/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CC_TRANSCRIPT_ON_ERROR`: `skip` or `abort`
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for any other value.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(ON_ERROR_ENV) {
        config.on_error = parse_error_policy(&raw).ok_or(ConfigError::InvalidValue {
            key: ON_ERROR_ENV,
            value: raw,
        })?;
    }

    Ok(config)
}

fn parse_error_policy(raw: &str) -> Option<ErrorPolicy> {
    match raw.trim() {
        "skip" => Some(ErrorPolicy::Skip),
        "abort" => Some(ErrorPolicy::Abort),
        _ => None,
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        on_error: config.on_error.unwrap_or(defaults.on_error),
        parallel_threshold: config
            .parallel_threshold
            .unwrap_or(defaults.parallel_threshold),
        worker_threads: config.worker_threads.unwrap_or(defaults.worker_threads),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
