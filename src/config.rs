use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const GENAI_KEY_ENV: &str = "GENAI_API_KEY";
pub const RAPIDAPI_KEY_ENV: &str = "RAPIDAPI_KEY";

/// Process-wide settings, loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub genai_api_key: String,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub rapidapi_base_url: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub http_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            genai_api_key: String::new(),
            rapidapi_key: String::new(),
            rapidapi_host: "indian-stock-exchange-api2.p.rapidapi.com".to_string(),
            rapidapi_base_url: "https://indian-stock-exchange-api2.p.rapidapi.com".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            http_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Overrides the keys from the given lookup (the process environment in `load_config`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(GENAI_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.genai_api_key = key;
        }
        if let Some(key) = lookup(RAPIDAPI_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.rapidapi_key = key;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.genai_api_key.trim().is_empty() {
            missing.push(GENAI_KEY_ENV);
        }
        if self.rapidapi_key.trim().is_empty() {
            missing.push(RAPIDAPI_KEY_ENV);
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing.join(", ")));
        }
        if self.http_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "http_timeout_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.gemini_model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "gemini_model",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

pub fn parse_config(content: &str, path: &str) -> Result<AppConfig, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Reads `path` if it exists (defaults otherwise), applies environment overrides and validates.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

pub fn load_config_with<F>(path: &str, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if Path::new(path).exists() {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        parse_config(&content, path)?
    } else {
        tracing::warn!("Config file not found, using defaults: {}", path);
        AppConfig::default()
    };
    config.apply_env_overrides(lookup);
    config.validate()?;
    Ok(config)
}
