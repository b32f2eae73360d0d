//! Action Effects
//!
//! Once an action takes effect its target channel is pulled back toward
//! its recovery target every step, and its one-shot side effects hit the
//! other channels once.

use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};
use crate::logic::telemetry::{Channel, CHANNEL_COUNT};
use super::types::Action;

#[derive(Debug, Clone, PartialEq)]
pub struct ActionEffect {
    pub target: Channel,
    /// Recovery per step, always positive
    pub rate: f64,
    /// Added once to each channel when the action is applied
    pub one_shot: [f64; CHANNEL_COUNT],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryTuning {
    /// battery_level gain per step after a non-critical shutdown
    pub battery_rate: f64,
    /// temperature drop per step while cooling
    pub temperature_rate: f64,
    /// signal_strength gain per step on the backup channel
    pub signal_rate: f64,
    pub shutdown_cpu_relief: f64,
    pub cooling_cpu_relief: f64,
    pub cooling_battery_cost: f64,
    pub switch_cpu_cost: f64,
    pub switch_battery_cost: f64,
}

impl Default for RecoveryTuning {
    fn default() -> Self {
        Self {
            battery_rate: 0.6,
            temperature_rate: 3.0,
            signal_rate: 4.0,
            shutdown_cpu_relief: 10.0,
            cooling_cpu_relief: 8.0,
            cooling_battery_cost: 0.3,
            switch_cpu_cost: 2.0,
            switch_battery_cost: 0.2,
        }
    }
}

impl RecoveryTuning {
    pub fn effect(&self, action: Action) -> Option<ActionEffect> {
        let mut one_shot = [0.0; CHANNEL_COUNT];
        let (target, rate) = match action {
            Action::NonCriticalShutdown => {
                one_shot[Channel::CpuLoad.index()] = -self.shutdown_cpu_relief;
                (Channel::BatteryLevel, self.battery_rate)
            }
            Action::CoolingActivation => {
                one_shot[Channel::CpuLoad.index()] = -self.cooling_cpu_relief;
                one_shot[Channel::BatteryLevel.index()] = -self.cooling_battery_cost;
                (Channel::Temperature, self.temperature_rate)
            }
            Action::BackupChannelSwitch => {
                one_shot[Channel::CpuLoad.index()] = self.switch_cpu_cost;
                one_shot[Channel::BatteryLevel.index()] = -self.switch_battery_cost;
                (Channel::SignalStrength, self.signal_rate)
            }
            Action::NoOp => return None,
        };

        Some(ActionEffect {
            target,
            rate,
            one_shot,
        })
    }

    pub fn validate(&self) -> MissionResult<()> {
        let rates = [
            ("battery_rate", self.battery_rate),
            ("temperature_rate", self.temperature_rate),
            ("signal_rate", self.signal_rate),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(MissionError::invalid_config(format!(
                    "{} must be > 0, got {}",
                    name, rate
                )));
            }
        }

        let side_effects = [
            self.shutdown_cpu_relief,
            self.cooling_cpu_relief,
            self.cooling_battery_cost,
            self.switch_cpu_cost,
            self.switch_battery_cost,
        ];
        if side_effects.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(MissionError::invalid_config(
                "action side effects must be finite values >= 0",
            ));
        }
        Ok(())
    }
}
