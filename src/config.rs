//! Review configuration
//!
//! Loaded from a JSON file. Every field has a default, so an empty object
//! is a valid configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentReference;
use crate::observability::LogFormat;
use crate::resolver::ResolveGuard;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Trash container; its children are never draft-resolved (default: 2)
    #[serde(default = "default_waste_basket")]
    pub waste_basket: ContentReference,

    /// Locale used when the host supplies none (default: "en")
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Per-call resolution budget in milliseconds (default: unbounded)
    #[serde(default)]
    pub resolve_timeout_ms: Option<u64>,

    /// Log output format (default: plain)
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_waste_basket() -> ContentReference {
    ContentReference::new(2)
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            waste_basket: default_waste_basket(),
            default_locale: default_locale(),
            resolve_timeout_ms: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ReviewConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: ReviewConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.waste_basket.is_empty() {
            return Err(ConfigError::Invalid(
                "waste_basket must reference a content node".to_string(),
            ));
        }

        if self.waste_basket.is_versioned() {
            return Err(ConfigError::Invalid(format!(
                "waste_basket must not carry a version: {}",
                self.waste_basket
            )));
        }

        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_locale must not be empty".to_string(),
            ));
        }

        if self.resolve_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "resolve_timeout_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Guard bounding one resolution call by the configured timeout.
    pub fn guard(&self) -> ResolveGuard {
        match self.resolve_timeout_ms {
            Some(ms) => ResolveGuard::unbounded().with_timeout(Duration::from_millis(ms)),
            None => ResolveGuard::unbounded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ReviewConfig::from_json("{}").unwrap();
        assert_eq!(config, ReviewConfig::default());
        assert_eq!(config.waste_basket, ContentReference::new(2));
        assert_eq!(config.default_locale, "en");
    }

    #[test]
    fn test_full_config() {
        let config = ReviewConfig::from_json(
            r#"{
                "waste_basket": {"id": 9},
                "default_locale": "sv",
                "resolve_timeout_ms": 250,
                "log_format": "json"
            }"#,
        )
        .unwrap();

        assert_eq!(config.waste_basket, ContentReference::new(9));
        assert_eq!(config.default_locale, "sv");
        assert_eq!(config.resolve_timeout_ms, Some(250));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_empty_waste_basket() {
        let err = ReviewConfig::from_json(r#"{"waste_basket": {"id": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_versioned_waste_basket() {
        let err =
            ReviewConfig::from_json(r#"{"waste_basket": {"id": 2, "work_id": 4}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ReviewConfig::from_json(r#"{"resolve_timeout_ms": 0}"#).unwrap_err();
        assert!(err.to_string().contains("resolve_timeout_ms"));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = ReviewConfig::from_json(r#"{"log_format": "xml"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_locale": "de"}}"#).unwrap();

        let config = ReviewConfig::load(file.path()).unwrap();
        assert_eq!(config.default_locale, "de");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReviewConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_guard_from_timeout() {
        let config = ReviewConfig::from_json(r#"{"resolve_timeout_ms": 60000}"#).unwrap();
        assert!(config.guard().checkpoint("children").is_ok());
    }
}
