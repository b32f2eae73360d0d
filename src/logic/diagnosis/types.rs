//! Diagnosis Types

use serde::{Deserialize, Serialize};

use crate::logic::telemetry::Channel;

// ============================================================================
// DIAGNOSIS
// ============================================================================

/// Subsystem category of a flagged anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Power,
    Thermal,
    Communication,
    None,
}

impl Diagnosis {
    /// Evaluation order, first match wins
    pub const PRIORITY: [Diagnosis; 3] = [Diagnosis::Power, Diagnosis::Thermal, Diagnosis::Communication];

    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Power => "power",
            Diagnosis::Thermal => "thermal",
            Diagnosis::Communication => "communication",
            Diagnosis::None => "none",
        }
    }

    /// Channel whose violation produces this diagnosis
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Diagnosis::Power => Some(Channel::BatteryLevel),
            Diagnosis::Thermal => Some(Channel::Temperature),
            Diagnosis::Communication => Some(Channel::SignalStrength),
            Diagnosis::None => None,
        }
    }

    /// Anything but `None` calls for an action
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Diagnosis::None)
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DIAGNOSIS RESULT
// ============================================================================

/// Diagnosis plus the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub diagnosis: Diagnosis,
    /// Every category whose rule matched, in priority order
    pub violations: Vec<Diagnosis>,
    pub reasons: Vec<String>,
}

impl Default for DiagnosisResult {
    fn default() -> Self {
        Self {
            diagnosis: Diagnosis::None,
            violations: vec![],
            reasons: vec![],
        }
    }
}
