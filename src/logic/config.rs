//! Mission Configuration
//!
//! Everything a session needs, loadable from a JSON file. Missing fields
//! fall back to defaults; environment overrides are applied on top.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use super::diagnosis::DiagnosticThresholds;
use super::error::MissionResult;
use super::harness::HarnessConfig;
use super::model::threshold::DEFAULT_CONTAMINATION;
use super::model::{ScorerConfig, ThresholdConfig};
use super::telemetry::GeneratorConfig;

// ============================================================================
// MISSION CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Stream the comparison runs on
    pub mission: GeneratorConfig,
    /// Fault-free stream the scorer is fitted on
    pub training: GeneratorConfig,
    pub scorer: ScorerConfig,
    pub diagnosis: DiagnosticThresholds,
    pub harness: HarnessConfig,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            mission: GeneratorConfig::default(),
            training: GeneratorConfig::nominal(),
            scorer: ScorerConfig {
                threshold: ThresholdConfig::calibrated(DEFAULT_CONTAMINATION),
                ..Default::default()
            },
            diagnosis: DiagnosticThresholds::default(),
            harness: HarnessConfig::default(),
        }
    }
}

impl MissionConfig {
    /// Earlier diagnosis with a lower fixed threshold
    pub fn high_sensitivity() -> Self {
        Self {
            scorer: ScorerConfig {
                threshold: ThresholdConfig::high_sensitivity(),
                ..Default::default()
            },
            diagnosis: DiagnosticThresholds::high_sensitivity(),
            ..Default::default()
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> MissionResult<Self> {
        let data = fs::read(path)?;
        let config: MissionConfig = serde_json::from_slice(&data)?;
        config.validate()?;

        log::info!("Mission config loaded from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> MissionResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// `ASTRAGUARD_CONFIG` file if set, defaults otherwise, then env overrides
    pub fn from_env() -> MissionResult<Self> {
        let config = match constants::get_config_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(delay) = constants::get_human_delay() {
            log::info!("Human delay overridden from env: {} steps", delay);
            self.harness.human_delay_steps = delay;
        }
        if let Some(seed) = constants::get_mission_seed() {
            log::info!("Mission seed overridden from env: {}", seed);
            self.mission.seed = seed;
        }
        self
    }

    pub fn validate(&self) -> MissionResult<()> {
        self.mission.validate()?;
        self.training.validate()?;
        self.scorer.validate()?;
        self.diagnosis.validate()?;
        self.harness.validate()?;

        if !self.training.injections.is_empty() {
            log::warn!(
                "Training stream has {} failure injections; the scorer will learn them as nominal",
                self.training.injections.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::error::MissionError;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = MissionConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.training.injections.is_empty());
        assert_eq!(config.scorer.threshold.anomaly_threshold, None);
        assert!(MissionConfig::high_sensitivity().validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mission.json");
        fs::write(
            &path,
            r#"{ "harness": { "human_delay_steps": 3, "survival": { "battery": 0.8, "stability": 0.2 } } }"#,
        )
        .unwrap();

        let config = MissionConfig::load(&path).unwrap();
        assert_eq!(config.harness.human_delay_steps, 3);
        assert_eq!(config.harness.survival.battery, 0.8);
        assert_eq!(config.harness.nominal, MissionConfig::default().harness.nominal);
        assert_eq!(config.mission, GeneratorConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("mission.json");

        let config = MissionConfig::high_sensitivity();
        config.save(&path).unwrap();
        let loaded = MissionConfig::load(&path).unwrap();
        assert_eq!(loaded.diagnosis, config.diagnosis);
        assert_eq!(loaded.scorer.threshold, config.scorer.threshold);
    }

    #[test]
    fn test_invalid_weights_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mission.json");
        fs::write(
            &path,
            r#"{ "harness": { "survival": { "battery": 0.0, "stability": 0.0 } } }"#,
        )
        .unwrap();

        assert!(matches!(MissionConfig::load(&path), Err(MissionError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mission.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(MissionConfig::load(&path), Err(MissionError::Serialization(_))));
    }
}
