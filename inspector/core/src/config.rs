//! TOML Configuration File Support
//!
//! Centralized configuration loading for the inspector, supporting a TOML
//! file at `~/.config/rule-inspector/inspector.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [completion]
//! endpoint = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! timeout_secs = 60
//!
//! [conversation]
//! default_style = "bullet"
//! forward_greeting = true
//!
//! [scroll]
//! speed = "fast"
//! easing = "quart"
//! frame_interval_ms = 16
//! ```
//!
//! The sampling temperature is fixed and cannot be configured.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{EasingFunction, ScrollSpeed};
use crate::style::ResponseStyle;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where configuration values last came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[completion]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionToml {
    /// Service base URL
    pub endpoint: Option<String>,
    /// Model identifier
    pub model: Option<String>,
    /// Bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[conversation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationToml {
    /// Style a fresh conversation starts in
    pub default_style: Option<String>,
    /// Whether the greeting is forwarded as history
    pub forward_greeting: Option<bool>,
}

/// `[scroll]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollToml {
    /// Speed profile name
    pub speed: Option<String>,
    /// Easing curve name (`linear`, `cubic`, `quart`)
    pub easing: Option<String>,
    /// Frame interval for the async scroll driver, in milliseconds
    pub frame_interval_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorToml {
    /// Completion service section
    pub completion: CompletionToml,
    /// Conversation section
    pub conversation: ConversationToml,
    /// Scroll animation section
    pub scroll: ScrollToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved inspector configuration
#[derive(Clone, Debug)]
pub struct InspectorConfig {
    /// Completion service base URL
    pub endpoint: String,
    /// Bearer token for the completion service
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Style a fresh conversation starts in
    pub default_style: ResponseStyle,
    /// Whether the synthetic greeting is forwarded as history
    pub forward_greeting: bool,
    /// Default scroll speed profile
    pub scroll_speed: ScrollSpeed,
    /// Easing curve of scroll runs
    pub scroll_easing: EasingFunction,
    /// Frame interval for the async scroll driver
    pub frame_interval: Duration,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    pub(crate) source: ConfigSource,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(60),
            default_style: ResponseStyle::Concise,
            forward_greeting: true,
            scroll_speed: ScrollSpeed::Normal,
            scroll_easing: EasingFunction::EaseOutQuart,
            frame_interval: Duration::from_millis(16),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl InspectorConfig {
    /// Get the source that last supplied values
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/rule-inspector/inspector.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rule-inspector").join("inspector.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<InspectorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// A missing file is not an error; defaults are used.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds an
/// invalid value.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<InspectorConfig, ConfigError> {
    let mut config = InspectorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: InspectorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut InspectorConfig, toml: &InspectorToml) -> Result<(), ConfigError> {
    if let Some(ref endpoint) = toml.completion.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if let Some(ref model) = toml.completion.model {
        config.model.clone_from(model);
    }
    if toml.completion.api_key.is_some() {
        config.api_key.clone_from(&toml.completion.api_key);
    }
    if let Some(secs) = toml.completion.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    if let Some(ref style) = toml.conversation.default_style {
        config.default_style = parse_value(style)?;
    }
    if let Some(forward) = toml.conversation.forward_greeting {
        config.forward_greeting = forward;
    }

    if let Some(ref speed) = toml.scroll.speed {
        config.scroll_speed = parse_value(speed)?;
    }
    if let Some(ref easing) = toml.scroll.easing {
        config.scroll_easing = parse_value(easing)?;
    }
    if let Some(ms) = toml.scroll.frame_interval_ms {
        config.frame_interval = Duration::from_millis(ms);
    }

    validate(config)
}

/// Apply environment overrides, reading variables through `lookup`
fn apply_env_config<F>(config: &mut InspectorConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup("RULE_INSPECTOR_ENDPOINT") {
        config.endpoint = endpoint;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = lookup("RULE_INSPECTOR_MODEL") {
        config.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(key) = lookup("RULE_INSPECTOR_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
        config.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = lookup("RULE_INSPECTOR_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(style) = lookup("RULE_INSPECTOR_STYLE") {
        config.default_style = parse_value(&style)?;
        config.source = ConfigSource::Env;
    }
    if let Some(speed) = lookup("RULE_INSPECTOR_SCROLL_SPEED") {
        config.scroll_speed = parse_value(&speed)?;
        config.source = ConfigSource::Env;
    }
    if let Some(easing) = lookup("RULE_INSPECTOR_SCROLL_EASING") {
        config.scroll_easing = parse_value(&easing)?;
        config.source = ConfigSource::Env;
    }

    validate(config)
}

fn parse_value<T>(value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::ValidationError(e.to_string()))
}

fn validate(config: &InspectorConfig) -> Result<(), ConfigError> {
    if config.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "completion endpoint must not be empty".to_string(),
        ));
    }
    if config.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "model identifier must not be empty".to_string(),
        ));
    }
    if config.frame_interval.is_zero() {
        return Err(ConfigError::ValidationError(
            "scroll frame interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
