//! Configuration for the OAuth2 stack synthesizer.
//!
//! Sources are layered in priority order (lowest to highest):
//! 1. Defaults - the fixed deployment baked into `StackSettings::default()`
//! 2. File config - `oauth2-stack.toml` or an explicit path
//! 3. Environment variables - `OAUTH2_STACK__*` pattern
//! 4. Ambient region - `CDK_DEFAULT_REGION`, `AWS_REGION`, `AWS_DEFAULT_REGION`,
//!    consulted only when no region was configured above

pub mod loader;
pub mod region;

use oauth2_stack_core::StackSettings;
use serde::{Deserialize, Serialize};

pub use loader::{DEFAULT_CONFIG_FILE, ENV_PREFIX, LoadedConfig, load_config, load_config_with_env};
pub use region::{REGION_ENV_VARS, RegionSource, resolve_region};

const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Upper bounds that keep durations far from overflow; the stack validation
/// applies the platform's tighter limits.
const MAX_VALIDITY_MINUTES: i64 = 100 * 366 * 24 * 60;
const MAX_VALIDITY_DAYS: i64 = 100 * 366;

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config build error: {0}")]
    Build(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub stack: StackSettings,
    pub logging: LoggingConfig,
}

impl StackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.stack.stack_name.trim().is_empty() {
            return Err(ConfigError::validation("stack.stack_name must not be empty"));
        }

        let minutes = self.stack.access_token_validity_minutes;
        if !(1..=MAX_VALIDITY_MINUTES).contains(&minutes) {
            return Err(ConfigError::validation(format!(
                "stack.access_token_validity_minutes must be in 1..={MAX_VALIDITY_MINUTES}, got {minutes}"
            )));
        }
        let days = self.stack.refresh_token_validity_days;
        if !(1..=MAX_VALIDITY_DAYS).contains(&days) {
            return Err(ConfigError::validation(format!(
                "stack.refresh_token_validity_days must be in 1..={MAX_VALIDITY_DAYS}, got {days}"
            )));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {VALID_LOG_LEVELS:?}"
            )));
        }
        Ok(())
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::parse(format!("TOML render error: {e}")))
    }
}
