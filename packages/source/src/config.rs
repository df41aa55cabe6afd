//! Client configuration loaded from TOML.
//!
//! Defaults are embedded at compile time from `config/default.toml`. A
//! user-supplied file replaces them wholesale; individual fields can then
//! be overridden from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors from loading or validating a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ClientConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `base_url` is not an absolute `http(s)` URL.
    #[error("Invalid base URL '{url}': expected http:// or https://")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// `timeout_secs` is zero.
    #[error("Request timeout must be at least one second")]
    InvalidTimeout,

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the analytics backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API root that endpoint paths are appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("ride_insights/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Returns the compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded file fails validation.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document does not parse or fails
    /// validation.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::embedded();
        };

        log::debug!("Loading client config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `url` is not `http(s)`.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = url.into();
        self.validate()?;
        Ok(self)
    }

    /// Replaces the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `secs` is zero.
    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        self.timeout_secs = secs;
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_are_valid() {
        let config = ClientConfig::embedded().unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let config = ClientConfig::from_toml(r#"base_url = "https://rides.example.com""#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("ride_insights/"));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ClientConfig::from_toml(r#"base_url = "ftp://rides.example.com""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = ClientConfig::from_toml(
            r#"
            base_url = "http://localhost"
            retries = 3
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn overrides_are_validated() {
        let config = ClientConfig::embedded().unwrap();
        assert!(config.clone().with_timeout_secs(0).is_err());
        let config = config.with_base_url("https://example.org/api/").unwrap();
        assert_eq!(config.base_url, "https://example.org/api/");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ClientConfig::load(Some(Path::new("/nonexistent/ride_insights.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
        assert!(
            err.to_string()
                .starts_with("Failed to read config /nonexistent/ride_insights.toml: "),
            "{err}"
        );
    }
}
