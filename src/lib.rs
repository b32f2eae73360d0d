//! AstraGuard Core - Library Entry
//!
//! Telemetry simulation, onboard anomaly scoring, diagnosis and scripted
//! recovery, plus the harness that compares human-delayed and autonomous
//! response on the same fault-injected stream.

pub mod constants;
pub mod logic;
