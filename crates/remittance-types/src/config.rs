//! Configuration for a Remittance engine instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Amount, Identity, RemittanceError, Result, constants};

/// Initial policy of an engine instance.
///
/// Only `owner` is required; the rest fall back to [`constants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The identity allowed to change policy and toggle deposits.
    pub owner: Identity,
    /// Fee charged on every deposit, credited to the owner.
    #[serde(default = "default_fee")]
    pub fee: Amount,
    /// Shortest accepted lock duration, in blocks (inclusive).
    #[serde(default = "default_min_duration")]
    pub min_duration: u64,
    /// Longest accepted lock duration, in blocks (inclusive).
    #[serde(default = "default_max_duration")]
    pub max_duration: u64,
    /// Whether deposits are accepted at start.
    #[serde(default = "default_running")]
    pub running: bool,
}

fn default_fee() -> Amount {
    constants::DEFAULT_OWNER_FEE
}

fn default_min_duration() -> u64 {
    constants::DEFAULT_MIN_DURATION
}

fn default_max_duration() -> u64 {
    constants::DEFAULT_MAX_DURATION
}

fn default_running() -> bool {
    constants::DEFAULT_RUNNING
}

impl EngineConfig {
    /// Default policy owned by `owner`.
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            fee: default_fee(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            running: default_running(),
        }
    }

    #[must_use]
    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    #[must_use]
    pub fn with_durations(mut self, min: u64, max: u64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    #[must_use]
    pub fn with_running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    /// # Errors
    /// Returns `InvalidDurationBounds` if `min_duration > max_duration`.
    pub fn validate(&self) -> Result<()> {
        if self.min_duration > self.max_duration {
            return Err(RemittanceError::InvalidDurationBounds {
                min: self.min_duration,
                max: self.max_duration,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| RemittanceError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = EngineConfig::new(Identity::ZERO);
        assert_eq!(cfg.fee, 500_000_000_000);
        assert_eq!(cfg.min_duration, 1);
        assert_eq!(cfg.max_duration, 200);
        assert!(cfg.running);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let cfg = EngineConfig::new(Identity::ZERO).with_durations(10, 5);
        assert_eq!(
            cfg.validate(),
            Err(RemittanceError::InvalidDurationBounds { min: 10, max: 5 })
        );
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let json = format!(r#"{{"owner":"{}","fee":500}}"#, "11".repeat(32));
        let cfg = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.owner, Identity([0x11; 32]));
        assert_eq!(cfg.fee, 500);
        assert_eq!(cfg.max_duration, 200);
    }

    #[test]
    fn json_missing_owner_is_configuration_error() {
        let err = EngineConfig::from_json_str(r#"{"fee":1}"#).unwrap_err();
        assert!(matches!(err, RemittanceError::Configuration(_)));
    }

    #[test]
    fn json_inverted_bounds_rejected() {
        let json = format!(
            r#"{{"owner":"{}","min_duration":20,"max_duration":18}}"#,
            "11".repeat(32)
        );
        let err = EngineConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(err, RemittanceError::InvalidDurationBounds { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RemittanceError::Io(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = EngineConfig::new(Identity([3u8; 32]))
            .with_fee(500)
            .with_durations(1, 18)
            .with_running(false);
        let json = serde_json::to_string(&cfg).unwrap();
        let back = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
