//! Harness Module - Human vs autonomous response comparison
//!
//! ## Structure
//! - `config.rs` - Bounds, decay, recovery targets, survival weights
//! - `types.rs` - `ResponseMode`, `MissionState`, `RunResult`, `ComparisonReport`
//! - `state.rs` - Mission state machine
//! - `dynamics.rs` - Offsets layered over the recorded stream
//! - `metrics.rs` - Mission damage and survival score
//! - `runner.rs` - `ComparisonHarness`
//!
//! ## Usage
//! ```ignore
//! use crate::logic::harness::{ComparisonHarness, HarnessConfig, ResponseMode};
//!
//! let harness = ComparisonHarness::new(scorer, HarnessConfig::default());
//! let report = harness.compare(&stream)?.report;
//! ```

pub mod config;
pub mod types;
pub mod state;
pub mod dynamics;
pub mod metrics;
pub mod runner;


pub use config::{CatastrophicBounds, ChannelValues, HarnessConfig, NominalBounds, SurvivalWeights};
pub use types::{
    ComparisonOutcome, ComparisonReport, Intervention, MissionState, ResponseMode, RunOutcome,
    RunResult, StateTransition,
};
pub use metrics::{mission_damage, survival_score, MAX_SURVIVAL_SCORE};
pub use runner::ComparisonHarness;
