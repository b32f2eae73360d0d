//! Response Module - Diagnosis → recovery action
//!
//! # Components
//! - `types.rs`: `Action`, `ActionLogEntry`
//! - `controller.rs`: Lookup table + run-scoped action log
//! - `effects.rs`: What each action does to the spacecraft once applied

pub mod types;
pub mod controller;
pub mod effects;

pub use types::{Action, ActionLogEntry};
pub use controller::{respond, ResponseController};
pub use effects::{ActionEffect, RecoveryTuning};
