//! # Key Detector Configuration
//!
//! Every weight and tie-break constant of the key detector lives in
//! [`DetectorConfig`]. The defaults are tuned against real chord sheets and are
//! what [`detect_key`](crate::detect_key) uses; a YAML document can override any
//! subset of them:
//!
//! ```yaml
//! preferred-key-margin: 0.05
//! preferred-keys: [G, C, D]
//! ```

use crate::error::ChordError;
use crate::keys::find_key;
use serde::{Deserialize, Serialize};

/// Scoring and tie-break policy of the key detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DetectorConfig {
    /// Extra weight per occurrence of a key's tonic chord
    pub tonic_weight: f64,
    /// Maximum score difference for the relative-key correction
    pub relative_key_threshold: f64,
    /// How far below the best score a preferred key may be and still win
    pub preferred_key_margin: f64,
    /// Upper bound of a key score; confidence is reported relative to it
    pub max_score: f64,
    /// Common keys, most preferred first
    pub preferred_keys: Vec<String>,
}

pub const DEFAULT_PREFERRED_KEYS: [&str; 12] =
    ["G", "C", "D", "A", "E", "Am", "Em", "Dm", "F", "Bm", "Bb", "Eb"];

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tonic_weight: 0.5,
            relative_key_threshold: 0.1,
            preferred_key_margin: 0.03,
            max_score: 1.5,
            preferred_keys: DEFAULT_PREFERRED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl DetectorConfig {
    /// Load a configuration from YAML, keeping defaults for missing fields.
    ///
    /// ```
    /// use chordkey::DetectorConfig;
    ///
    /// let config = DetectorConfig::from_yaml_str("relative-key-threshold: 0.2").unwrap();
    /// assert_eq!(config.relative_key_threshold, 0.2);
    /// assert_eq!(config.tonic_weight, 0.5);
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self, ChordError> {
        let config: DetectorConfig = if content.trim().is_empty() {
            DetectorConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ChordError::ConfigError(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChordError> {
        let fields = [
            ("tonic-weight", self.tonic_weight),
            ("relative-key-threshold", self.relative_key_threshold),
            ("preferred-key-margin", self.preferred_key_margin),
            ("max-score", self.max_score),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ChordError::ConfigError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.max_score == 0.0 {
            return Err(ChordError::ConfigError("max-score must be greater than 0".to_string()));
        }
        if let Some(unknown) = self.preferred_keys.iter().find(|k| find_key(k).is_none()) {
            return Err(ChordError::ConfigError(format!(
                "preferred key {} is not in the key catalog",
                unknown
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.tonic_weight, 0.5);
        assert_eq!(config.relative_key_threshold, 0.1);
        assert_eq!(config.preferred_key_margin, 0.03);
        assert_eq!(config.max_score, 1.5);
        assert_eq!(config.preferred_keys.len(), 12);
        assert_eq!(config.preferred_keys[0], "G");
        assert_eq!(config.preferred_keys[11], "Eb");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config = DetectorConfig::from_yaml_str("preferred-keys: [E, A]\n").unwrap();
        assert_eq!(config.preferred_keys, vec!["E".to_string(), "A".to_string()]);
        assert_eq!(config.preferred_key_margin, 0.03);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DetectorConfig::from_yaml_str("").unwrap(), DetectorConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            DetectorConfig::from_yaml_str("tonic-weight: -1"),
            Err(ChordError::ConfigError(_))
        ));
        assert!(matches!(
            DetectorConfig::from_yaml_str("max-score: 0"),
            Err(ChordError::ConfigError(_))
        ));
        assert!(matches!(
            DetectorConfig::from_yaml_str("preferred-keys: [H]"),
            Err(ChordError::ConfigError(_))
        ));
        assert!(matches!(
            DetectorConfig::from_yaml_str("tonic-weight: [1, 2]"),
            Err(ChordError::ConfigError(_))
        ));
    }
}
