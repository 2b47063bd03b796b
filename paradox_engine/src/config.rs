//! Engine configuration, loadable from TOML.

use paradox_rules::MAX_TURNS;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

/// Configuration for a session and its default subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Turns available before the timeline runs out.
    pub max_turns: u32,

    pub analytics: AnalyticsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_turns: MAX_TURNS,
            analytics: AnalyticsConfig::default(),
        }
    }
}

/// Settings for the analytics sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,

    /// Measurement id of the downstream analytics property. Without one the sink stays silent.
    pub measurement_id: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            measurement_id: None,
        }
    }
}

impl AnalyticsConfig {
    /// Whether events should be recorded at all.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self
                .measurement_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty())
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_turns == 0 {
            return Err(EngineError::Config("max_turns must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_turns, 10);
        assert!(config.analytics.enabled);
        assert!(!config.analytics.is_active());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_full_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            max_turns = 7

            [analytics]
            enabled = true
            measurement_id = "G-TEST"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_turns, 7);
        assert_eq!(config.analytics.measurement_id.as_deref(), Some("G-TEST"));
        assert!(config.analytics.is_active());
    }

    #[test]
    fn test_disabled_analytics_inactive() {
        let config = AnalyticsConfig {
            enabled: false,
            measurement_id: Some("G-TEST".into()),
        };
        assert!(!config.is_active());

        let blank = AnalyticsConfig {
            enabled: true,
            measurement_id: Some("  ".into()),
        };
        assert!(!blank.is_active());
    }

    #[test]
    fn test_zero_turns_rejected() {
        let err = EngineConfig::from_toml_str("max_turns = 0").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_malformed_document_rejected() {
        let err = EngineConfig::from_toml_str("max_turns = \"ten\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/paradox.toml").unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
