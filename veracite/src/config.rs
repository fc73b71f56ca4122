//! Application configuration.
//!
//! Credentials and model selection are explicit values passed into
//! constructors. Nothing reads the environment implicitly: callers opt in
//! through [`AppConfig::from_env`], which loads a `.env` file when present
//! and fails with a typed error when the API key is missing.

use miette::Diagnostic;
use thiserror::Error;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Default Anthropic API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Errors raised while assembling configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// No usable API key was provided.
    #[error("ANTHROPIC_API_KEY is not set")]
    #[diagnostic(
        code(veracite::config::missing_api_key),
        help("Set ANTHROPIC_API_KEY in the environment or in a .env file.")
    )]
    MissingApiKey,
}

/// Settings for talking to the language model API.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AppConfig {
    /// Creates a config with the default endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Overrides the API endpoint (used by tests against a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model id.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file when one exists, then `ANTHROPIC_API_KEY`
    /// (required), `ANTHROPIC_BASE_URL` and `VERACITE_MODEL` (optional
    /// overrides).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when the key is absent or
    /// blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let mut config = Self::new(api_key)?;

        if let Ok(base_url) = std::env::var("ANTHROPIC_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        if let Ok(model) = std::env::var("VERACITE_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }

        Ok(config)
    }
}
