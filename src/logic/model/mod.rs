//! Model Module - Anomaly scoring
//!
//! Models fit on nominal telemetry and score readings; the scorer applies
//! the threshold. Swapping the model never touches the pipeline.
//!
//! ## Structure
//! - `inference.rs` - `AnomalyModel` capability trait, `AnomalyScore`
//! - `scaler.rs` - Per-channel standardization
//! - `forest.rs` - Isolation forest
//! - `deviation.rs` - Z-score baseline deviation
//! - `threshold.rs` - Fixed / calibrated threshold
//! - `scorer.rs` - `AnomalyScorer`, `ScorerConfig`
//! - `storage.rs` - JSON snapshots with layout validation

pub mod inference;
pub mod scaler;
pub mod forest;
pub mod deviation;
pub mod threshold;
pub mod scorer;
pub mod storage;

pub use inference::{AnomalyModel, AnomalyScore, ScorerError};
pub use forest::{ForestConfig, IsolationForest};
pub use deviation::BaselineDeviation;
pub use threshold::{ThresholdConfig, ThresholdStats};
pub use scorer::{AnomalyScorer, ModelKind, ScorerConfig};
pub use storage::{load_snapshot, save_snapshot, ScorerSnapshot};
