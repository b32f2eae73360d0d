//! Threshold Configuration
//!
//! The anomaly threshold is fixed for the lifetime of a scorer. It is
//! either configured directly or calibrated once, right after fitting, as
//! the `(1 - contamination)` quantile of the training scores.

use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};

/// Default fixed threshold for isolation-forest scores
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.6;

/// Expected share of outliers when calibrating
pub const DEFAULT_CONTAMINATION: f64 = 0.04;

/// Threshold Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Fixed threshold; `None` = calibrate from training scores
    pub anomaly_threshold: Option<f64>,

    /// Share of training samples allowed above a calibrated threshold
    pub contamination: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold: Some(DEFAULT_ANOMALY_THRESHOLD),
            contamination: DEFAULT_CONTAMINATION,
        }
    }
}

impl ThresholdConfig {
    pub fn fixed(threshold: f64) -> Self {
        Self {
            anomaly_threshold: Some(threshold),
            ..Default::default()
        }
    }

    /// Calibrate from training scores
    pub fn calibrated(contamination: f64) -> Self {
        Self {
            anomaly_threshold: None,
            contamination,
        }
    }

    /// High sensitivity (lower threshold)
    pub fn high_sensitivity() -> Self {
        Self::fixed(0.55)
    }

    /// Low sensitivity (higher threshold)
    pub fn low_sensitivity() -> Self {
        Self::fixed(0.7)
    }

    pub fn validate(&self) -> MissionResult<()> {
        if let Some(threshold) = self.anomaly_threshold {
            if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
                return Err(MissionError::invalid_config(format!(
                    "anomaly_threshold must be in (0, 1), got {}",
                    threshold
                )));
            }
        }
        if !self.contamination.is_finite() || self.contamination <= 0.0 || self.contamination > 0.5 {
            return Err(MissionError::invalid_config(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        Ok(())
    }
}

/// Linear-interpolated quantile, `q` in [0, 1]
pub fn quantile(scores: &[f64], q: f64) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Threshold statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStats {
    pub threshold: f64,
    pub calibrated: bool,
    pub mean_training_score: f64,
    pub max_training_score: f64,
    pub sample_count: usize,
}

impl ThresholdStats {
    pub fn from_scores(threshold: f64, calibrated: bool, scores: &[f64]) -> Self {
        let n = scores.len();
        let mean = if n > 0 {
            scores.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let max = scores.iter().cloned().fold(0.0, f64::max);

        Self {
            threshold,
            calibrated,
            mean_training_score: mean,
            max_training_score: max,
            sample_count: n,
        }
    }
}
