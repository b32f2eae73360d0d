//! Diagnostic Rules & Thresholds
//!
//! Constants and config only; evaluation lives in `mapper.rs`.

use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// battery_level below this (%) = power
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;

/// temperature above this (°C) = thermal
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 50.0;

/// signal_strength below this (%) = communication
pub const LOW_SIGNAL_THRESHOLD: f64 = 40.0;

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticThresholds {
    pub low_battery: f64,
    pub high_temperature: f64,
    pub low_signal: f64,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self {
            low_battery: LOW_BATTERY_THRESHOLD,
            high_temperature: HIGH_TEMPERATURE_THRESHOLD,
            low_signal: LOW_SIGNAL_THRESHOLD,
        }
    }
}

impl DiagnosticThresholds {
    /// Earlier diagnosis, more interventions
    pub fn high_sensitivity() -> Self {
        Self {
            low_battery: 30.0,
            high_temperature: 45.0,
            low_signal: 50.0,
        }
    }

    pub fn validate(&self) -> MissionResult<()> {
        for (name, value) in [("low_battery", self.low_battery), ("low_signal", self.low_signal)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(MissionError::invalid_config(format!(
                    "{} threshold must be within [0, 100], got {}",
                    name, value
                )));
            }
        }
        if !self.high_temperature.is_finite() {
            return Err(MissionError::invalid_config("high_temperature threshold must be finite"));
        }
        Ok(())
    }
}
