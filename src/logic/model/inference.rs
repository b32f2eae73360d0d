//! Inference - Anomaly model capability
//!
//! The scorer never knows which algorithm it is driving. Anything that can
//! be fitted on nominal readings and then score a reading plugs in here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::telemetry::Reading;
use super::storage::SnapshotModel;

/// Fewest samples any model accepts for fitting
pub const MIN_FIT_SAMPLES: usize = 2;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Scorer output for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    /// Outlier score, higher = more anomalous
    pub score: f64,
    pub is_anomaly: bool,
    pub threshold: f64,
    /// Model method ("isolation_forest", "baseline_deviation", ...)
    pub method: String,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerError {
    #[error("model used before fitting")]
    NotReady,

    #[error("need at least {required} samples to fit, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("invalid training samples: {0}")]
    InvalidSamples(String),
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Capability interface for unsupervised outlier models
pub trait AnomalyModel: Send + Sync {
    fn method(&self) -> &'static str;

    /// Fit on nominal (non-anomalous) readings
    fn fit(&mut self, samples: &[Reading]) -> Result<(), ScorerError>;

    fn is_fitted(&self) -> bool;

    /// Outlier score; `ScorerError::NotReady` if not fitted
    fn score(&self, reading: &Reading) -> Result<f64, ScorerError>;

    /// Persistable copy of the fitted model, if the model supports it
    fn snapshot(&self) -> Option<SnapshotModel> {
        None
    }
}

/// Reject sample sets no model can learn from
pub(crate) fn check_samples(samples: &[Reading]) -> Result<(), ScorerError> {
    if samples.len() < MIN_FIT_SAMPLES {
        return Err(ScorerError::InsufficientSamples {
            required: MIN_FIT_SAMPLES,
            actual: samples.len(),
        });
    }
    if let Some(bad) = samples.iter().find(|r| !r.is_finite()) {
        return Err(ScorerError::InvalidSamples(format!(
            "non-finite reading at step {}",
            bad.step()
        )));
    }
    Ok(())
}
