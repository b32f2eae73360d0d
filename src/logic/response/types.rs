//! Response Types

use serde::{Deserialize, Serialize};

use crate::logic::diagnosis::Diagnosis;
use crate::logic::telemetry::Channel;

// ============================================================================
// ACTION
// ============================================================================

/// Scripted recovery directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Shed non-critical loads to stabilize the power bus
    NonCriticalShutdown,
    CoolingActivation,
    /// Switch to the backup antenna
    BackupChannelSwitch,
    NoOp,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NonCriticalShutdown => "non_critical_shutdown",
            Action::CoolingActivation => "cooling_activation",
            Action::BackupChannelSwitch => "backup_channel_switch",
            Action::NoOp => "no_op",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::NonCriticalShutdown => "Shut down non-critical systems",
            Action::CoolingActivation => "Activate cooling mode",
            Action::BackupChannelSwitch => "Switch to backup communication channel",
            Action::NoOp => "No action",
        }
    }

    /// Channel the action restores
    pub fn target_channel(&self) -> Option<Channel> {
        match self {
            Action::NonCriticalShutdown => Some(Channel::BatteryLevel),
            Action::CoolingActivation => Some(Channel::Temperature),
            Action::BackupChannelSwitch => Some(Channel::SignalStrength),
            Action::NoOp => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ACTION LOG
// ============================================================================

/// One controller decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub step: usize,
    pub diagnosis: Diagnosis,
    pub action: Action,
}

impl ActionLogEntry {
    pub fn as_tuple(&self) -> (usize, Diagnosis, Action) {
        (self.step, self.diagnosis, self.action)
    }
}
