//! Moderation configuration.
//!
//! A configuration carries the custom rule set, the per-detector toggles and
//! the sensitivity threshold. Every field has a default, so partial JSON
//! documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detector::DetectorKind;
use crate::error::ConfigError;
use crate::rule_engine::Rule;

/// Default sensitivity threshold.
pub const DEFAULT_SENSITIVITY_THRESHOLD: f32 = 0.7;

/// Configuration for the moderation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Custom rules, in evaluation order.
    pub rules: Vec<Rule>,
    /// Sensitivity threshold (0.0 to 1.0). Stored and reported; no stage of
    /// the pipeline reads it.
    pub sensitivity_threshold: f32,
    pub enable_profanity_filter: bool,
    pub enable_sentiment_analysis: bool,
    pub enable_toxicity_detection: bool,
    pub enable_spam_detection: bool,
    pub enable_personal_info_detection: bool,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            sensitivity_threshold: DEFAULT_SENSITIVITY_THRESHOLD,
            enable_profanity_filter: true,
            enable_sentiment_analysis: true,
            enable_toxicity_detection: true,
            enable_spam_detection: true,
            enable_personal_info_detection: true,
        }
    }
}

impl ModerationConfig {
    /// Creates a configuration with every detector disabled and no rules.
    pub fn disabled() -> Self {
        Self {
            enable_profanity_filter: false,
            enable_sentiment_analysis: false,
            enable_toxicity_detection: false,
            enable_spam_detection: false,
            enable_personal_info_detection: false,
            ..Self::default()
        }
    }

    /// Sets the custom rules.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Returns true if the detector is enabled.
    pub fn is_enabled(&self, kind: DetectorKind) -> bool {
        match kind {
            DetectorKind::Profanity => self.enable_profanity_filter,
            DetectorKind::Sentiment => self.enable_sentiment_analysis,
            DetectorKind::Toxicity => self.enable_toxicity_detection,
            DetectorKind::Spam => self.enable_spam_detection,
            DetectorKind::PersonalInfo => self.enable_personal_info_detection,
        }
    }

    /// Enables or disables a detector.
    pub fn set_enabled(&mut self, kind: DetectorKind, enabled: bool) {
        let toggle = match kind {
            DetectorKind::Profanity => &mut self.enable_profanity_filter,
            DetectorKind::Sentiment => &mut self.enable_sentiment_analysis,
            DetectorKind::Toxicity => &mut self.enable_toxicity_detection,
            DetectorKind::Spam => &mut self.enable_spam_detection,
            DetectorKind::PersonalInfo => &mut self.enable_personal_info_detection,
        };
        *toggle = enabled;
    }

    /// Checks that the sensitivity threshold lies in `[0, 1]`. The value is
    /// never rewritten; out-of-range documents are rejected instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.sensitivity_threshold) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold(self.sensitivity_threshold))
        }
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            rules = config.rules.len(),
            "Loaded moderation config"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ModerationConfig::default();
        assert!(config.rules.is_empty());
        assert_eq!(config.sensitivity_threshold, 0.7);
        for kind in DetectorKind::all() {
            assert!(config.is_enabled(*kind));
        }
    }

    #[test]
    fn disabled_turns_off_every_detector() {
        let config = ModerationConfig::disabled();
        for kind in DetectorKind::all() {
            assert!(!config.is_enabled(*kind));
        }
    }

    #[test]
    fn set_enabled_toggles_single_detector() {
        let mut config = ModerationConfig::default();
        config.set_enabled(DetectorKind::Spam, false);
        assert!(!config.is_enabled(DetectorKind::Spam));
        assert!(config.is_enabled(DetectorKind::Toxicity));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = ModerationConfig::from_json(r#"{"enable_spam_detection": false}"#).unwrap();
        assert!(!config.enable_spam_detection);
        assert!(config.enable_profanity_filter);
        assert_eq!(config.sensitivity_threshold, 0.7);
    }

    #[test]
    fn threshold_is_stored_unchanged() {
        let config = ModerationConfig::from_json(r#"{"sensitivity_threshold": 0.35}"#).unwrap();
        assert_eq!(config.sensitivity_threshold, 0.35);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        for json in [
            r#"{"sensitivity_threshold": 3.5}"#,
            r#"{"sensitivity_threshold": -1}"#,
        ] {
            let err = ModerationConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidThreshold(_)), "{}", json);
        }
        let config = ModerationConfig {
            sensitivity_threshold: f32::NAN,
            ..ModerationConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ModerationConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = ModerationConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "rules": [{{
                    "id": "brand",
                    "name": "Brand safety",
                    "patterns": ["acme", "/compet(itor|ition)/"],
                    "severity": "high",
                    "platforms": ["twitter", "linkedin"]
                }}],
                "enable_sentiment_analysis": false
            }}"#
        )
        .unwrap();

        let config = ModerationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].severity, Severity::High);
        assert_eq!(config.rules[0].platforms.len(), 2);
        assert!(!config.enable_sentiment_analysis);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModerationConfig::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn round_trips_through_json() {
        let config = ModerationConfig::disabled();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ModerationConfig::from_json(&json).unwrap(), config);
    }
}
