//! Error handling

use thiserror::Error;

use crate::logic::model::ScorerError;
use crate::logic::telemetry::layout::LayoutMismatchError;

pub type MissionResult<T> = Result<T, MissionError>;

#[derive(Debug, Error)]
pub enum MissionError {
    /// Scorer used before its model was fitted. Fatal for the run.
    #[error("anomaly scorer is not ready: model has not been fitted")]
    ScorerNotReady,

    /// Out-of-range threshold, weight or tuning value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot run on an empty telemetry stream")]
    EmptyStream,

    #[error("scorer error: {0}")]
    Scorer(ScorerError),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MissionError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        MissionError::InvalidConfig(msg.into())
    }
}

impl From<ScorerError> for MissionError {
    fn from(err: ScorerError) -> Self {
        match err {
            ScorerError::NotReady => MissionError::ScorerNotReady,
            other => MissionError::Scorer(other),
        }
    }
}
