//! Environment-driven configuration.
//!
//! Every setting has a default so an empty environment yields a working
//! development configuration. Values that are present but malformed are
//! rejected rather than silently replaced.

use super::settings::Paths;
use crate::error::{ConfigError, ConfigResult};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const FERTHE_ENV: &str = "FERTHE_ENV";
pub const API_ENDPOINT: &str = "API_ENDPOINT";
pub const API_TIMEOUT: &str = "API_TIMEOUT";
pub const STORE_TYPE: &str = "STORE_TYPE";
pub const JSON_STORE_BASE_DIRECTORY: &str = "JSON_STORE_BASE_DIRECTORY";
pub const ENABLE_ANALYTICS: &str = "ENABLE_ANALYTICS";
pub const ENABLE_DEBUG_LOGS: &str = "ENABLE_DEBUG_LOGS";
pub const API_SECRET: &str = "API_SECRET";
pub const ANALYTICS_KEY: &str = "ANALYTICS_KEY";

const DEFAULT_API_ENDPOINT: &str = "http://localhost:3000";
const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Backing store for local scan history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Json,
    Memory,
}

impl FromStr for StoreType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// A secret value that never appears in logs or dumps.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[redacted]")
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FertheConfig {
    pub environment: Environment,
    pub api_endpoint: String,
    #[serde(serialize_with = "serialize_millis")]
    pub api_timeout: Duration,
    pub store_type: StoreType,
    pub json_store_base_directory: Option<PathBuf>,
    pub enable_analytics: bool,
    pub enable_debug_logs: bool,
    pub api_secret: Option<Secret>,
    pub analytics_key: Option<Secret>,
}

fn serialize_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(d.as_millis() as u64)
}

impl Default for FertheConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            store_type: StoreType::Json,
            json_store_base_directory: None,
            enable_analytics: false,
            enable_debug_logs: true,
            api_secret: None,
            analytics_key: None,
        }
    }
}

impl FertheConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let environment = match get(FERTHE_ENV) {
            Some(v) => parse_enum(FERTHE_ENV, v)?,
            None => Environment::default(),
        };

        let api_endpoint = match get(API_ENDPOINT) {
            Some(v) if v.starts_with("http://") || v.starts_with("https://") => {
                v.trim_end_matches('/').to_string()
            }
            Some(v) => return Err(invalid(API_ENDPOINT, v)),
            None => DEFAULT_API_ENDPOINT.to_string(),
        };

        let api_timeout = match get(API_TIMEOUT) {
            Some(v) => match v.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(invalid(API_TIMEOUT, v)),
            },
            None => Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
        };

        let store_type = match get(STORE_TYPE) {
            Some(v) => parse_enum(STORE_TYPE, v)?,
            None => StoreType::default(),
        };

        let enable_analytics = match get(ENABLE_ANALYTICS) {
            Some(v) => parse_bool(ENABLE_ANALYTICS, v)?,
            None => false,
        };

        let enable_debug_logs = match get(ENABLE_DEBUG_LOGS) {
            Some(v) => parse_bool(ENABLE_DEBUG_LOGS, v)?,
            None => environment == Environment::Development,
        };

        let config = Self {
            environment,
            api_endpoint,
            api_timeout,
            store_type,
            json_store_base_directory: get(JSON_STORE_BASE_DIRECTORY).map(PathBuf::from),
            enable_analytics,
            enable_debug_logs,
            api_secret: get(API_SECRET).map(|v| Secret(v.to_string())),
            analytics_key: get(ANALYTICS_KEY).map(|v| Secret(v.to_string())),
        };
        config.validate()?;

        debug!(
            environment = %config.environment,
            endpoint = %config.api_endpoint,
            store = ?config.store_type,
            "configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.enable_analytics
            && self.environment == Environment::Production
            && self.analytics_key.is_none()
        {
            return Err(ConfigError::MissingValue {
                key: ANALYTICS_KEY,
                reason: "analytics are enabled in production".to_string(),
            });
        }
        Ok(())
    }

    /// Directory of the local JSON store, defaulting under the XDG data dir.
    pub fn store_base_directory(&self) -> ConfigResult<PathBuf> {
        match &self.json_store_base_directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Paths::resolve()?.store_dir()),
        }
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

fn parse_enum<T: FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &'static str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = FertheConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, FertheConfig::default());
        assert!(config.enable_debug_logs);
    }

    #[test]
    fn test_full_environment() {
        let config = FertheConfig::from_vars([
            ("FERTHE_ENV", "production"),
            ("API_ENDPOINT", "https://api.ferthe.example/"),
            ("API_TIMEOUT", "2500"),
            ("STORE_TYPE", "memory"),
            ("JSON_STORE_BASE_DIRECTORY", "/var/lib/ferthe"),
            ("ENABLE_ANALYTICS", "yes"),
            ("ANALYTICS_KEY", "ak-123"),
            ("API_SECRET", "s3cr3t"),
            ("UNRELATED", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_endpoint, "https://api.ferthe.example");
        assert_eq!(config.api_timeout, Duration::from_millis(2500));
        assert_eq!(config.store_type, StoreType::Memory);
        assert_eq!(
            config.json_store_base_directory,
            Some(PathBuf::from("/var/lib/ferthe"))
        );
        assert!(config.enable_analytics);
        assert!(!config.enable_debug_logs);
        assert_eq!(config.api_secret.as_ref().unwrap().expose(), "s3cr3t");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            ("FERTHE_ENV", "moon"),
            ("API_ENDPOINT", "ftp://nope"),
            ("API_TIMEOUT", "0"),
            ("API_TIMEOUT", "soon"),
            ("STORE_TYPE", "sqlite"),
            ("ENABLE_DEBUG_LOGS", "maybe"),
        ] {
            let err = FertheConfig::from_vars([(key, value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { key: k, .. } if k == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn test_production_analytics_requires_key() {
        let err = FertheConfig::from_vars([
            ("FERTHE_ENV", "production"),
            ("ENABLE_ANALYTICS", "true"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { key: ANALYTICS_KEY, .. }));
    }

    #[test]
    fn test_secrets_are_redacted() {
        let config = FertheConfig::from_vars([("API_SECRET", "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"apiTimeout\":10000"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = FertheConfig::from_vars([("API_TIMEOUT", "  "), ("STORE_TYPE", "")]).unwrap();
        assert_eq!(config.api_timeout, Duration::from_millis(DEFAULT_API_TIMEOUT_MS));
        assert_eq!(config.store_type, StoreType::Json);
    }

    #[test]
    fn test_explicit_store_directory() {
        let config =
            FertheConfig::from_vars([("JSON_STORE_BASE_DIRECTORY", "/tmp/ferthe-store")]).unwrap();
        assert_eq!(
            config.store_base_directory().unwrap(),
            PathBuf::from("/tmp/ferthe-store")
        );
    }
}
