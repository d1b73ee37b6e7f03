//! Completion client configuration.
//!
//! Settings come from defaults, optionally overlaid by a TOML file and then
//! by `FLOORPLAN_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`CompletionConfig::base_url`].
pub const ENV_BASE_URL: &str = "FLOORPLAN_BASE_URL";
/// Environment variable overriding [`CompletionConfig::api_key`].
pub const ENV_API_KEY: &str = "FLOORPLAN_API_KEY";
/// Environment variable overriding [`CompletionConfig::model`].
pub const ENV_MODEL: &str = "FLOORPLAN_MODEL";
/// Environment variable overriding [`CompletionConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "FLOORPLAN_TIMEOUT_SECS";

/// Connection settings for an OpenAI-compatible completion endpoint.
///
/// The defaults target a local Ollama server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL including the API version, e.g. `http://localhost:11434/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Connect and read timeout for a single request.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: "not-needed".to_string(),
            model: "llama3:instruct".to_string(),
            timeout_secs: 300,
        }
    }
}

impl CompletionConfig {
    /// Parses a TOML document, falling back to defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use floorplan::config::CompletionConfig;
    ///
    /// let config = CompletionConfig::from_toml_str(r#"model = "mistral""#).unwrap();
    /// assert_eq!(config.model, "mistral");
    /// assert_eq!(config.timeout_secs, 300);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Applies `FLOORPLAN_*` environment variables on top of this config.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an invalid value.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed by the `ENV_*` names.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                ConfigError::invalid_value("timeout_secs", format!("not a number: {timeout}"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty base URL or model,
    /// or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid_value("base_url", "must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid_value("model", "must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
