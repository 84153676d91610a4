//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files (`~/.config/apiport/config.toml` by default)
//! - Environment variables (`APIPORT_*`)
//! - CLI arguments (for the `apiport` binary)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec::Compression;
use crate::error::{ApiPortError, Result};
use crate::progress::messages::DEFAULT_LOCALE;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apiport").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ApiPortError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content)
            .map_err(|e| ApiPortError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("APIPORT_ENDPOINT") {
            config.client.endpoint = Some(endpoint);
        }
        if let Some(val) = lookup("APIPORT_TIMEOUT_SECS") {
            if let Ok(val) = val.parse() {
                config.client.timeout_secs = val;
            }
        }
        if let Some(val) = lookup("APIPORT_RETRY_SECS") {
            if let Ok(val) = val.parse() {
                config.client.default_retry_secs = val;
            }
        }
        if let Some(val) = lookup("APIPORT_COMPRESSION") {
            if let Ok(val) = val.parse() {
                config.client.compression = val;
            }
        }
        if let Some(locale) = lookup("APIPORT_LOCALE") {
            config.client.locale = locale;
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs from defaults)
    pub fn merge(self, other: Self) -> Self {
        let defaults = ClientConfig::default();
        let base = self.client;
        let over = other.client;

        Self {
            client: ClientConfig {
                endpoint: over.endpoint.or(base.endpoint),
                timeout_secs: if over.timeout_secs != defaults.timeout_secs {
                    over.timeout_secs
                } else {
                    base.timeout_secs
                },
                default_retry_secs: if over.default_retry_secs != defaults.default_retry_secs {
                    over.default_retry_secs
                } else {
                    base.default_retry_secs
                },
                compression: if over.compression != defaults.compression {
                    over.compression
                } else {
                    base.compression
                },
                locale: if over.locale != defaults.locale {
                    over.locale
                } else {
                    base.locale
                },
            },
        }
    }
}

/// Analysis client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service base address (e.g., https://portability.example.com)
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Poll delay when the service gives no usable Retry-After, in seconds
    pub default_retry_secs: f64,

    /// Compression applied to analysis requests
    pub compression: Compression,

    /// Language for user-facing messages
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 300,
            default_retry_secs: 1.0,
            compression: Compression::Gzip,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fallback poll delay; non-positive or invalid values yield one second
    pub fn default_retry(&self) -> Duration {
        if self.default_retry_secs.is_finite() && self.default_retry_secs > 0.0 {
            Duration::try_from_secs_f64(self.default_retry_secs)
                .unwrap_or(Duration::from_secs(1))
        } else {
            Duration::from_secs(1)
        }
    }

    /// Configured endpoint, or a config error when missing
    pub fn require_endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| ApiPortError::Config("No service endpoint configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.endpoint, None);
        assert_eq!(config.client.timeout(), Duration::from_secs(300));
        assert_eq!(config.client.default_retry(), Duration::from_secs(1));
        assert_eq!(config.client.compression, Compression::Gzip);
        assert_eq!(config.client.locale, "en");
    }

    #[test]
    fn test_require_endpoint() {
        let config = ClientConfig::default();
        assert!(matches!(config.require_endpoint(), Err(ApiPortError::Config(_))));
    }

    #[test]
    fn test_invalid_retry_falls_back() {
        for secs in [0.0, -1.0, f64::NAN] {
            let config = ClientConfig {
                default_retry_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.default_retry(), Duration::from_secs(1));
        }
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [client]
            endpoint = "https://portability.example.com"
            timeout_secs = 60
            default_retry_secs = 2.5
            compression = "brotli"
            locale = "de"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.client.endpoint.as_deref(),
            Some("https://portability.example.com")
        );
        assert_eq!(config.client.timeout_secs, 60);
        assert_eq!(config.client.default_retry(), Duration::from_millis(2500));
        assert_eq!(config.client.compression, Compression::Brotli);
        assert_eq!(config.client.locale, "de");
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nendpoint = \"http://localhost:5000\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.client.endpoint.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.client.timeout_secs, 300);
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ApiPortError::Config(_)));
    }

    #[test]
    fn test_from_lookup_and_merge() {
        let env: HashMap<&str, &str> = [
            ("APIPORT_ENDPOINT", "http://env:1"),
            ("APIPORT_COMPRESSION", "deflate"),
            ("APIPORT_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let from_env = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        let from_file: Config = toml::from_str(
            "[client]\nendpoint = \"http://file:1\"\ntimeout_secs = 30\nlocale = \"fr\"",
        )
        .unwrap();

        let merged = from_file.merge(from_env);
        assert_eq!(merged.client.endpoint.as_deref(), Some("http://env:1"));
        assert_eq!(merged.client.compression, Compression::Deflate);
        assert_eq!(merged.client.timeout_secs, 30);
        assert_eq!(merged.client.locale, "fr");
    }
}
