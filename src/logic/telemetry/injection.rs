//! Failure Injection
//!
//! Scripted faults layered on top of the nominal channel profiles.
//! `k` below is the number of steps since the injection started.

use serde::{Deserialize, Serialize};

use super::layout::CHANNEL_COUNT;
use super::reading::Channel;

/// Fault pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    /// Channel forced to a fixed value
    Override { channel: Channel, value: f64 },
    /// temperature += s·(0.05k + 0.8·sin(k/7)), cpu += s·0.03k
    ThermalRunaway { severity: f64 },
    /// battery −= s·(0.06k + 0.4·|sin(k/10)|), cpu −= s·0.01k
    PowerDrain { severity: f64 },
    /// signal −= s·(0.18k + 3·|sin(k/6)|), cpu += s·0.02k
    CommDrop { severity: f64 },
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Override { .. } => "override",
            FailureKind::ThermalRunaway { .. } => "thermal_runaway",
            FailureKind::PowerDrain { .. } => "power_drain",
            FailureKind::CommDrop { .. } => "comm_drop",
        }
    }

    /// Channel the fault is aimed at
    pub fn primary_channel(&self) -> Channel {
        match self {
            FailureKind::Override { channel, .. } => *channel,
            FailureKind::ThermalRunaway { .. } => Channel::Temperature,
            FailureKind::PowerDrain { .. } => Channel::BatteryLevel,
            FailureKind::CommDrop { .. } => Channel::SignalStrength,
        }
    }

    pub fn severity(&self) -> Option<f64> {
        match self {
            FailureKind::Override { .. } => None,
            FailureKind::ThermalRunaway { severity }
            | FailureKind::PowerDrain { severity }
            | FailureKind::CommDrop { severity } => Some(*severity),
        }
    }
}

/// One entry of the failure-injection schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailureInjection {
    pub start_step: usize,
    /// Exclusive end; open-ended when absent
    #[serde(default)]
    pub end_step: Option<usize>,
    pub kind: FailureKind,
}

impl FailureInjection {
    pub fn new(start_step: usize, kind: FailureKind) -> Self {
        Self {
            start_step,
            end_step: None,
            kind,
        }
    }

    pub fn override_channel(start_step: usize, channel: Channel, value: f64) -> Self {
        Self::new(start_step, FailureKind::Override { channel, value })
    }

    pub fn until(mut self, end_step: usize) -> Self {
        self.end_step = Some(end_step);
        self
    }

    pub fn is_active(&self, step: usize) -> bool {
        step >= self.start_step && self.end_step.map_or(true, |end| step < end)
    }

    /// Apply the fault to raw values for `step`. No-op outside the window.
    pub fn apply(&self, step: usize, values: &mut [f64; CHANNEL_COUNT]) {
        if !self.is_active(step) {
            return;
        }

        let k = (step - self.start_step) as f64;
        let battery = Channel::BatteryLevel.index();
        let temperature = Channel::Temperature.index();
        let signal = Channel::SignalStrength.index();
        let cpu = Channel::CpuLoad.index();

        match self.kind {
            FailureKind::Override { channel, value } => {
                values[channel.index()] = value;
            }
            FailureKind::ThermalRunaway { severity } => {
                values[temperature] += severity * (0.05 * k + 0.8 * (k / 7.0).sin());
                values[cpu] += severity * (0.03 * k);
            }
            FailureKind::PowerDrain { severity } => {
                values[battery] -= severity * (0.06 * k + 0.4 * (k / 10.0).sin().abs());
                values[cpu] -= severity * (0.01 * k);
            }
            FailureKind::CommDrop { severity } => {
                values[signal] -= severity * (0.18 * k + 3.0 * (k / 6.0).sin().abs());
                values[cpu] += severity * (0.02 * k);
            }
        }
    }
}
