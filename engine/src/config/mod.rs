//! Configuration management
//!
//! This module handles loading, validation, and management of the Atelier
//! configuration. Configuration is stored in TOML format at
//! ~/.atelier/config.toml and is created with defaults on first run.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **llm**: Model provider settings and per-request timeout
//! - **chat**: Conversational router settings
//!
//! API keys are NOT part of the config file; they are read from the
//! environment (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`), optionally via a
//! `.env` file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Model provider configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Conversational router configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider to try first (ollama, openai, anthropic)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Timeout applied to each provider attempt, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub openai: OpenAIConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            request_timeout_secs: default_request_timeout(),
            ollama: OllamaConfig::default(),
            openai: OpenAIConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

/// Ollama provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            model: default_openai_model(),
        }
    }
}

/// Anthropic provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,

    #[serde(default = "default_anthropic_model")]
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_url(),
            model: default_anthropic_model(),
        }
    }
}

/// Conversational router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many history turns the classifier sees
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

fn default_history_window() -> usize {
    10
}

const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const KNOWN_PROVIDERS: &[&str] = &["ollama", "openai", "anthropic"];

impl Config {
    /// Default configuration file path: `~/.atelier/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Invalid("cannot determine home directory".to_string()))?;
        Ok(home.join(".atelier").join("config.toml"))
    }

    /// Load the configuration from the default location, creating it with
    /// defaults on first run.
    pub fn load_or_create() -> Result<Config, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            return Self::load_from_path(&path);
        }

        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(&config)?)?;
        tracing::info!("Created default configuration at {}", path.display());
        Ok(config)
    }

    /// Load the configuration from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.core.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "invalid log level '{}', expected one of {:?}",
                self.core.log_level, VALID_LOG_LEVELS
            )));
        }

        if !KNOWN_PROVIDERS.contains(&self.llm.default_provider.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown default provider '{}', expected one of {:?}",
                self.llm.default_provider, KNOWN_PROVIDERS
            )));
        }

        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.chat.history_window == 0 {
            return Err(ConfigError::Invalid(
                "history_window must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.default_provider, "ollama");
        assert_eq!(config.chat.history_window, 10);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.llm.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.llm.request_timeout_secs, 120);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let raw = r#"
[llm]
default_provider = "anthropic"

[llm.anthropic]
model = "claude-3-5-haiku-latest"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.llm.default_provider, "anthropic");
        assert_eq!(config.llm.anthropic.model, "claude-3-5-haiku-latest");
        // Untouched sections keep defaults
        assert_eq!(config.core.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = Config::default();
        config.core.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.default_provider = "skynet".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.default_provider = "openai".to_string();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.llm.default_provider, "openai");
    }
}
