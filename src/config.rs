use config::{Config, ConfigError, Environment, File};
use log::debug;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::AnalysisError;

/// Environment variable consulted when no key is present in the config sources
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

static CONFIG: OnceLock<AnalystConfig> = OnceLock::new();

/// Settings for talking to the Gemini API and rendering results
#[derive(Debug, Deserialize, Clone)]
pub struct AnalystConfig {
    /// API key, sent in the query string
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-1.5-flash-latest")
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL for the generative language endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Delay between revealed characters of the dish name
    #[serde(default = "default_typewriter_interval_ms")]
    pub typewriter_interval_ms: u64,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            typewriter_interval_ms: default_typewriter_interval_ms(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_typewriter_interval_ms() -> u64 {
    50
}

impl AnalystConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with NUTRITION__ prefix
    /// 2. nutrition.toml file in current directory
    /// 3. Default values
    ///
    /// If neither source provides `api_key`, `GEMINI_API_KEY` is used. A
    /// missing key is an error: nothing can be analysed without one.
    pub fn load() -> Result<Self, AnalysisError> {
        let mut config = load_config()?;
        if config.api_key.is_none() {
            config.api_key = std::env::var(API_KEY_ENV).ok();
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations without a usable API key
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(AnalysisError::MissingApiKey),
        }
    }

    /// The validated API key
    pub fn api_key(&self) -> Result<&str, AnalysisError> {
        self.validate()?;
        Ok(self.api_key.as_deref().unwrap_or_default())
    }

    pub fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_interval_ms)
    }
}

/// Load raw configuration without the API key check
///
/// Environment variable format: NUTRITION__API_KEY, NUTRITION__MODEL
pub fn load_config() -> Result<AnalystConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("nutrition").required(false))
        .add_source(
            Environment::with_prefix("NUTRITION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Initialise the process-wide configuration.
///
/// The first successful call wins; later calls return the stored value. Call
/// this at startup and stop if it fails.
pub fn init() -> Result<&'static AnalystConfig, AnalysisError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let loaded = AnalystConfig::load()?;
    debug!(
        "Loaded configuration: model={}, base_url={}",
        loaded.model, loaded.base_url
    );
    Ok(CONFIG.get_or_init(|| loaded))
}
