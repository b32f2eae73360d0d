//! Anomaly Scorer
//!
//! Drives an `AnomalyModel` and turns its raw score into a binary flag
//! against a threshold that is fixed once the scorer is ready.

use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};
use crate::logic::telemetry::Reading;
use super::deviation::{BaselineDeviation, DEFAULT_SOFTNESS};
use super::forest::{ForestConfig, IsolationForest};
use super::inference::{AnomalyModel, AnomalyScore};
use super::storage::SnapshotModel;
use super::threshold::{quantile, ThresholdConfig, ThresholdStats, DEFAULT_ANOMALY_THRESHOLD};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    IsolationForest,
    BaselineDeviation,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::IsolationForest => "isolation_forest",
            ModelKind::BaselineDeviation => "baseline_deviation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub model: ModelKind,
    pub forest: ForestConfig,
    /// `k` in `z / (z + k)` for the deviation model
    pub deviation_softness: f64,
    pub threshold: ThresholdConfig,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::IsolationForest,
            forest: ForestConfig::default(),
            deviation_softness: DEFAULT_SOFTNESS,
            threshold: ThresholdConfig::default(),
        }
    }
}

impl ScorerConfig {
    pub fn deviation() -> Self {
        Self {
            model: ModelKind::BaselineDeviation,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> MissionResult<()> {
        self.threshold.validate()?;
        match self.model {
            ModelKind::IsolationForest => self.forest.validate(),
            ModelKind::BaselineDeviation => {
                if !self.deviation_softness.is_finite() || self.deviation_softness <= 0.0 {
                    return Err(MissionError::invalid_config(format!(
                        "deviation_softness must be > 0, got {}",
                        self.deviation_softness
                    )));
                }
                Ok(())
            }
        }
    }

    /// Unfitted model for this configuration
    pub fn build_model(&self) -> Box<dyn AnomalyModel> {
        match self.model {
            ModelKind::IsolationForest => Box::new(IsolationForest::new(self.forest.clone())),
            ModelKind::BaselineDeviation => Box::new(BaselineDeviation::new(self.deviation_softness)),
        }
    }

    /// Validate, build and fit in one go
    pub fn train(&self, samples: &[Reading]) -> MissionResult<AnomalyScorer> {
        self.validate()?;
        AnomalyScorer::train(self.build_model(), samples, &self.threshold)
    }
}

// ============================================================================
// SCORER
// ============================================================================

pub struct AnomalyScorer {
    model: Box<dyn AnomalyModel>,
    threshold: f64,
    stats: Option<ThresholdStats>,
}

impl std::fmt::Debug for AnomalyScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnomalyScorer")
            .field("method", &self.model.method())
            .field("fitted", &self.model.is_fitted())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl AnomalyScorer {
    /// Wrap a model as-is. Scoring fails with `ScorerNotReady` until the
    /// model is fitted.
    pub fn new(model: Box<dyn AnomalyModel>, threshold: f64) -> Self {
        Self {
            model,
            threshold,
            stats: None,
        }
    }

    pub(crate) fn restore(
        model: Box<dyn AnomalyModel>,
        threshold: f64,
        stats: Option<ThresholdStats>,
    ) -> Self {
        Self {
            model,
            threshold,
            stats,
        }
    }

    /// Fit `model` on nominal samples and fix the threshold
    pub fn train(
        mut model: Box<dyn AnomalyModel>,
        samples: &[Reading],
        config: &ThresholdConfig,
    ) -> MissionResult<Self> {
        config.validate()?;
        model.fit(samples)?;

        let scores = samples
            .iter()
            .map(|r| model.score(r))
            .collect::<Result<Vec<f64>, _>>()?;

        let (threshold, calibrated) = match config.anomaly_threshold {
            Some(t) => (t, false),
            None => {
                let t = quantile(&scores, 1.0 - config.contamination)
                    .unwrap_or(DEFAULT_ANOMALY_THRESHOLD);
                (t, true)
            }
        };

        let stats = ThresholdStats::from_scores(threshold, calibrated, &scores);
        log::info!(
            "Scorer trained: method={} samples={} threshold={:.4}{} mean_score={:.4}",
            model.method(),
            stats.sample_count,
            threshold,
            if calibrated { " (calibrated)" } else { "" },
            stats.mean_training_score
        );

        Ok(Self {
            model,
            threshold,
            stats: Some(stats),
        })
    }

    pub fn score(&self, reading: &Reading) -> MissionResult<AnomalyScore> {
        let score = self.model.score(reading)?;
        Ok(AnomalyScore {
            score,
            is_anomaly: score >= self.threshold,
            threshold: self.threshold,
            method: self.model.method().to_string(),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_fitted()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn method(&self) -> &'static str {
        self.model.method()
    }

    /// Training-score statistics; `None` if the model was not trained here
    pub fn stats(&self) -> Option<&ThresholdStats> {
        self.stats.as_ref()
    }

    pub(crate) fn snapshot_model(&self) -> Option<SnapshotModel> {
        self.model.snapshot()
    }
}
