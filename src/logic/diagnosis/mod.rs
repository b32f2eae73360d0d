//! Diagnosis Module - Flag → subsystem category
//!
//! ## Structure
//! - `types.rs` - `Diagnosis`, `DiagnosisResult`
//! - `rules.rs` - Default thresholds and `DiagnosticThresholds`
//! - `mapper.rs` - Ordered rule evaluation (power, thermal, communication)
//!
//! ## Usage
//! ```ignore
//! use crate::logic::diagnosis::{diagnose, Diagnosis};
//!
//! let diagnosis = diagnose(&reading, score.is_anomaly);
//! ```

pub mod types;
pub mod rules;
pub mod mapper;

pub use types::{Diagnosis, DiagnosisResult};
pub use rules::DiagnosticThresholds;
pub use mapper::{diagnose, diagnose_with_reasons, diagnose_with_thresholds};
