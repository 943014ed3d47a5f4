//! Configuration module.

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, default_log_path, load_config_file,
    load_config_with_precedence, merge_config, ConfigError, ConfigFile, ResolvedConfig,
};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CC_TRANSCRIPT_CONFIG";

/// Environment variable overriding `on_error`.
pub const ON_ERROR_ENV: &str = "CC_TRANSCRIPT_ON_ERROR";

/// Load, merge and apply env overrides in one step.
///
/// Precedence (lowest to highest): defaults, config file, environment.
///
/// # Errors
///
/// Returns error if a config file exists but is unreadable or invalid, or
/// if an override variable holds an unknown value.
pub fn load(config_path: Option<std::path::PathBuf>) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    apply_env_overrides(merge_config(file))
}
