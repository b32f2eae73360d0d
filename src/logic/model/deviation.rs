//! Baseline Deviation - z-score outlier model
//!
//! Score = `z / (z + softness)` with `z` the largest absolute z-score over
//! all channels. A reading at the training mean scores 0; the score tends to
//! 1 as any channel moves away from its baseline.

use serde::{Deserialize, Serialize};

use crate::logic::telemetry::Reading;
use super::inference::{AnomalyModel, ScorerError};
use super::scaler::StandardScaler;
use super::storage::SnapshotModel;

pub const DEFAULT_SOFTNESS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineDeviation {
    softness: f64,
    scaler: Option<StandardScaler>,
}

impl BaselineDeviation {
    pub fn new(softness: f64) -> Self {
        Self {
            softness,
            scaler: None,
        }
    }

    pub fn softness(&self) -> f64 {
        self.softness
    }

    /// Largest absolute z-score across channels
    pub fn max_z(&self, reading: &Reading) -> Result<f64, ScorerError> {
        let scaler = self.scaler.as_ref().ok_or(ScorerError::NotReady)?;
        Ok(scaler
            .transform(reading)
            .iter()
            .fold(0.0f64, |acc, z| acc.max(z.abs())))
    }
}

impl Default for BaselineDeviation {
    fn default() -> Self {
        Self::new(DEFAULT_SOFTNESS)
    }
}

impl AnomalyModel for BaselineDeviation {
    fn method(&self) -> &'static str {
        "baseline_deviation"
    }

    fn fit(&mut self, samples: &[Reading]) -> Result<(), ScorerError> {
        self.scaler = Some(StandardScaler::fit(samples)?);
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_some()
    }

    fn score(&self, reading: &Reading) -> Result<f64, ScorerError> {
        let z = self.max_z(reading)?;
        Ok(z / (z + self.softness))
    }

    fn snapshot(&self) -> Option<SnapshotModel> {
        self.is_fitted().then(|| SnapshotModel::BaselineDeviation(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::{Channel, CHANNEL_COUNT};
    use chrono::Utc;

    fn samples() -> Vec<Reading> {
        let rows: [[f64; CHANNEL_COUNT]; 2] = [[90.0, 30.0, 80.0, 30.0], [100.0, 40.0, 90.0, 40.0]];
        rows.iter()
            .enumerate()
            .map(|(i, v)| Reading::from_values(i, Utc::now(), *v))
            .collect()
    }

    #[test]
    fn test_score_at_mean_is_zero() {
        let mut model = BaselineDeviation::default();
        model.fit(&samples()).unwrap();

        let mean = Reading::from_values(0, Utc::now(), [95.0, 35.0, 85.0, 35.0]);
        assert_eq!(model.score(&mean).unwrap(), 0.0);
    }

    #[test]
    fn test_score_uses_worst_channel() {
        let mut model = BaselineDeviation::default();
        model.fit(&samples()).unwrap();

        // std = 5 on every channel; temperature 50 -> z = 3 -> 3 / (3 + 3)
        let hot = Reading::from_values(0, Utc::now(), [95.0, 35.0, 85.0, 35.0])
            .with_channel(Channel::Temperature, 50.0);
        assert!((model.max_z(&hot).unwrap() - 3.0).abs() < 1e-12);
        assert!((model.score(&hot).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unfitted_is_not_ready() {
        let model = BaselineDeviation::default();
        let reading = samples()[0];
        assert_eq!(model.score(&reading), Err(ScorerError::NotReady));
        assert!(model.snapshot().is_none());
    }
}
