//! Logic Module - Simulation & Decision Engines
//!
//! Data flows one way:
//! `telemetry` -> `model` -> `diagnosis` -> `response` -> `harness`.
//!
//! - `telemetry/` - Channel layout, readings, generator, failure injection
//! - `model/` - Anomaly models (isolation forest, baseline deviation), scorer
//! - `diagnosis/` - Threshold rules mapping anomalies to subsystems
//! - `response/` - Diagnosis -> recovery action lookup and action log
//! - `harness/` - Human vs autonomous comparison runs
//! - `session` - Session facade shared by the CLI

pub mod error;
pub mod config;
pub mod telemetry;
pub mod model;
pub mod diagnosis;
pub mod response;
pub mod harness;
pub mod session;
pub mod report;

pub use error::{MissionError, MissionResult};
