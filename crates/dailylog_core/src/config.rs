//! Explicit configuration for generation backends and the app boundary.
//!
//! # Responsibility
//! - Describe which generation backend to call and how.
//! - Describe where records and logs live.
//! - Load settings from environment-style key lookups.
//!
//! # Invariants
//! - Configuration is passed explicitly; core holds no global settings.
//! - `api_key` is never rendered by `Debug`.
//! - A loaded `GenerationConfig` always has a non-empty key, endpoint and model.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub const ENV_PROVIDER: &str = "DAILYLOG_PROVIDER";
pub const ENV_API_KEY: &str = "DAILYLOG_API_KEY";
pub const ENV_ENDPOINT: &str = "DAILYLOG_ENDPOINT";
pub const ENV_MODEL: &str = "DAILYLOG_MODEL";
pub const ENV_TEMPERATURE: &str = "DAILYLOG_TEMPERATURE";
pub const ENV_TIMEOUT_SECS: &str = "DAILYLOG_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "DAILYLOG_DB";
pub const ENV_LOG_LEVEL: &str = "DAILYLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAILYLOG_LOG_DIR";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DB_PATH: &str = "daily_report.db";

const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
const DEEPSEEK_MODEL: &str = "deepseek-chat";
const DOUBAO_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";
const DOUBAO_MODEL: &str = "doubao-lite-32k-240828";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading/validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required key is absent or blank.
    Missing(&'static str),
    /// Key is present but its value cannot be used.
    Invalid { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {}

/// Generation backend family.
///
/// All supported backends speak the OpenAI-compatible chat-completions
/// protocol; they differ in default endpoint and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    DeepSeek,
    Doubao,
    /// Any other compatible endpoint; endpoint and model must be set.
    OpenAiCompatible,
}

impl Provider {
    /// Stable string id used in settings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Doubao => "doubao",
            Self::OpenAiCompatible => "openai_compatible",
        }
    }

    /// Parses a provider id, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Some(Self::DeepSeek),
            "doubao" => Some(Self::Doubao),
            "openai_compatible" | "openai-compatible" | "openai" => Some(Self::OpenAiCompatible),
            _ => None,
        }
    }

    fn default_endpoint(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some(DEEPSEEK_ENDPOINT),
            Self::Doubao => Some(DOUBAO_ENDPOINT),
            Self::OpenAiCompatible => None,
        }
    }

    fn default_model(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some(DEEPSEEK_MODEL),
            Self::Doubao => Some(DOUBAO_MODEL),
            Self::OpenAiCompatible => None,
        }
    }
}

/// Settings for one generation backend.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub provider: Provider,
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Debug for GenerationConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Builds a config with the provider's default endpoint and model.
    ///
    /// # Errors
    /// - `Missing` when `api_key` is blank.
    /// - `Missing` for endpoint/model when the provider has no defaults.
    pub fn for_provider(provider: Provider, api_key: impl Into<String>) -> ConfigResult<Self> {
        let config = Self {
            provider,
            api_key: api_key.into(),
            endpoint: provider.default_endpoint().unwrap_or_default().to_string(),
            model: provider.default_model().unwrap_or_default().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// Unset provider defaults to `doubao`. Endpoint and model fall back to
    /// provider defaults when not overridden.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match get(ENV_PROVIDER) {
            Some(value) => Provider::parse(&value).ok_or(ConfigError::Invalid {
                key: ENV_PROVIDER,
                value,
            })?,
            None => Provider::Doubao,
        };

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let endpoint = get(ENV_ENDPOINT)
            .or_else(|| provider.default_endpoint().map(str::to_string))
            .ok_or(ConfigError::Missing(ENV_ENDPOINT))?;
        let model = get(ENV_MODEL)
            .or_else(|| provider.default_model().map(str::to_string))
            .ok_or(ConfigError::Missing(ENV_MODEL))?;

        let temperature = match get(ENV_TEMPERATURE) {
            Some(value) => value.trim().parse::<f32>().map_err(|_| ConfigError::Invalid {
                key: ENV_TEMPERATURE,
                value,
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            provider,
            api_key: api_key.trim().to_string(),
            endpoint: endpoint.trim().to_string(),
            model: model.trim().to_string(),
            temperature,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks field ranges and required values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_ENDPOINT));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_MODEL));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                key: ENV_TEMPERATURE,
                value: self.temperature.to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Application-boundary settings for storage and logging.
///
/// Generation settings load separately so read-only commands work without
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_level: get(ENV_LOG_LEVEL)
                .unwrap_or_else(|| crate::logging::default_log_level().to_string()),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_doubao_with_provider_endpoint_and_model() {
        let config = GenerationConfig::from_lookup(lookup(&[(ENV_API_KEY, "k-1")])).unwrap();
        assert_eq!(config.provider, Provider::Doubao);
        assert_eq!(config.endpoint, DOUBAO_ENDPOINT);
        assert_eq!(config.model, DOUBAO_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn overrides_are_applied() {
        let config = GenerationConfig::from_lookup(lookup(&[
            (ENV_PROVIDER, "DeepSeek"),
            (ENV_API_KEY, "k-2"),
            (ENV_MODEL, "deepseek-reasoner"),
            (ENV_TEMPERATURE, "0.2"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();
        assert_eq!(config.provider, Provider::DeepSeek);
        assert_eq!(config.endpoint, DEEPSEEK_ENDPOINT);
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = GenerationConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_API_KEY));
    }

    #[test]
    fn openai_compatible_requires_endpoint() {
        let err = GenerationConfig::from_lookup(lookup(&[
            (ENV_PROVIDER, "openai_compatible"),
            (ENV_API_KEY, "k"),
            (ENV_MODEL, "m"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_ENDPOINT));
    }

    #[test]
    fn unknown_provider_and_bad_temperature_are_invalid() {
        let err = GenerationConfig::from_lookup(lookup(&[
            (ENV_PROVIDER, "mystery"),
            (ENV_API_KEY, "k"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_PROVIDER));

        let err = GenerationConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "k"),
            (ENV_TEMPERATURE, "3.5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == ENV_TEMPERATURE));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = GenerationConfig::for_provider(Provider::DeepSeek, "sk-secret").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn app_config_uses_defaults_for_storage_and_logging() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(config.log_dir.is_none());
        assert_eq!(config.log_level, crate::logging::default_log_level());
    }
}
