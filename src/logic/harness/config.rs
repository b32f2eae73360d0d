//! Harness Configuration
//!
//! Bounds, decay and recovery tuning, survival weighting. Everything here is
//! configuration, not law: presets exist for the common scenarios.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_HUMAN_DELAY_STEPS;
use crate::logic::error::{MissionError, MissionResult};
use crate::logic::response::RecoveryTuning;
use crate::logic::telemetry::{Channel, Reading, CHANNEL_COUNT};
use super::types::ResponseMode;

// ============================================================================
// CHANNEL VALUES
// ============================================================================

/// One number per channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelValues {
    pub battery_level: f64,
    pub temperature: f64,
    pub signal_strength: f64,
    pub cpu_load: f64,
}

impl ChannelValues {
    pub fn new(battery_level: f64, temperature: f64, signal_strength: f64, cpu_load: f64) -> Self {
        Self {
            battery_level,
            temperature,
            signal_strength,
            cpu_load,
        }
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::BatteryLevel => self.battery_level,
            Channel::Temperature => self.temperature,
            Channel::SignalStrength => self.signal_strength,
            Channel::CpuLoad => self.cpu_load,
        }
    }

    pub fn as_array(&self) -> [f64; CHANNEL_COUNT] {
        [self.battery_level, self.temperature, self.signal_strength, self.cpu_load]
    }

    fn all_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Envelope a healthy spacecraft stays in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalBounds {
    pub min_battery: f64,
    pub max_temperature: f64,
    pub min_signal: f64,
    pub max_cpu: f64,
}

impl Default for NominalBounds {
    fn default() -> Self {
        Self {
            min_battery: 20.0,
            max_temperature: 45.0,
            min_signal: 50.0,
            max_cpu: 80.0,
        }
    }
}

impl NominalBounds {
    pub fn channel_in_bounds(&self, channel: Channel, value: f64) -> bool {
        match channel {
            Channel::BatteryLevel => value >= self.min_battery,
            Channel::Temperature => value <= self.max_temperature,
            Channel::SignalStrength => value >= self.min_signal,
            Channel::CpuLoad => value <= self.max_cpu,
        }
    }

    pub fn contains(&self, reading: &Reading) -> bool {
        Channel::ALL
            .iter()
            .all(|c| self.channel_in_bounds(*c, reading.get(*c)))
    }

    pub fn violations(&self, reading: &Reading) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| !self.channel_in_bounds(*c, reading.get(*c)))
            .collect()
    }
}

/// Crossing either bound loses the mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatastrophicBounds {
    /// battery_level at or below = loss
    pub min_battery: f64,
    /// temperature at or above = loss
    pub max_temperature: f64,
}

impl Default for CatastrophicBounds {
    fn default() -> Self {
        Self {
            min_battery: 0.0,
            max_temperature: 90.0,
        }
    }
}

impl CatastrophicBounds {
    /// First breached channel, if any
    pub fn breach(&self, reading: &Reading) -> Option<Channel> {
        if reading.battery_level() <= self.min_battery {
            Some(Channel::BatteryLevel)
        } else if reading.temperature() >= self.max_temperature {
            Some(Channel::Temperature)
        } else {
            None
        }
    }
}

// ============================================================================
// SURVIVAL WEIGHTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalWeights {
    pub battery: f64,
    pub stability: f64,
}

impl Default for SurvivalWeights {
    fn default() -> Self {
        Self {
            battery: 0.5,
            stability: 0.5,
        }
    }
}

impl SurvivalWeights {
    pub fn validate(&self) -> MissionResult<()> {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(self.battery) || !valid(self.stability) {
            return Err(MissionError::invalid_config(format!(
                "survival weights must be finite and >= 0, got battery={} stability={}",
                self.battery, self.stability
            )));
        }
        if self.battery + self.stability <= 0.0 {
            return Err(MissionError::invalid_config("survival weights must not both be 0"));
        }
        Ok(())
    }
}

// ============================================================================
// HARNESS CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Steps between diagnosis and action in human mode
    pub human_delay_steps: usize,
    pub nominal: NominalBounds,
    pub catastrophic: CatastrophicBounds,
    /// Per-step worsening of an unmitigated, out-of-bounds channel
    pub decay: ChannelValues,
    /// Values mitigated channels are pulled back toward
    pub recovery_targets: ChannelValues,
    pub recovery: RecoveryTuning,
    pub survival: SurvivalWeights,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            human_delay_steps: DEFAULT_HUMAN_DELAY_STEPS,
            nominal: NominalBounds::default(),
            catastrophic: CatastrophicBounds::default(),
            decay: ChannelValues::new(0.5, 0.8, 1.5, 1.0),
            recovery_targets: ChannelValues::new(95.0, 35.0, 85.0, 35.0),
            recovery: RecoveryTuning::default(),
            survival: SurvivalWeights::default(),
        }
    }
}

impl HarnessConfig {
    pub fn with_human_delay(mut self, steps: usize) -> Self {
        self.human_delay_steps = steps;
        self
    }

    /// Steps between diagnosis and action for a mode
    pub fn delay_for(&self, mode: ResponseMode) -> usize {
        match mode {
            ResponseMode::Human => self.human_delay_steps,
            ResponseMode::Autonomous => 0,
        }
    }

    pub fn validate(&self) -> MissionResult<()> {
        self.survival.validate()?;
        self.recovery.validate()?;

        let n = &self.nominal;
        if ![n.min_battery, n.max_temperature, n.min_signal, n.max_cpu]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(MissionError::invalid_config("nominal bounds must be finite"));
        }

        let c = &self.catastrophic;
        if !c.min_battery.is_finite() || c.min_battery >= n.min_battery {
            return Err(MissionError::invalid_config(format!(
                "catastrophic battery bound {} must be below nominal {}",
                c.min_battery, n.min_battery
            )));
        }
        if !c.max_temperature.is_finite() || c.max_temperature <= n.max_temperature {
            return Err(MissionError::invalid_config(format!(
                "catastrophic temperature bound {} must be above nominal {}",
                c.max_temperature, n.max_temperature
            )));
        }

        if !self.decay.all_finite() || self.decay.as_array().iter().any(|v| *v < 0.0) {
            return Err(MissionError::invalid_config("decay rates must be finite values >= 0"));
        }

        if !self.recovery_targets.all_finite() {
            return Err(MissionError::invalid_config("recovery targets must be finite"));
        }
        for channel in Channel::ALL {
            if !n.channel_in_bounds(channel, self.recovery_targets.get(channel)) {
                return Err(MissionError::invalid_config(format!(
                    "recovery target for {} lies outside nominal bounds",
                    channel
                )));
            }
        }
        Ok(())
    }
}
