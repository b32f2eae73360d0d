//! Reading - Point-in-time telemetry sample
//!
//! A `Reading` is immutable once produced. Anything that needs a modified
//! sample (fault injection, mitigation offsets) gets a new `Reading` back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::layout::{CHANNEL_COUNT, CHANNEL_LAYOUT};

// ============================================================================
// CHANNEL
// ============================================================================

/// Telemetry channel, ordered as in `CHANNEL_LAYOUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    BatteryLevel,
    Temperature,
    SignalStrength,
    CpuLoad,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::BatteryLevel,
        Channel::Temperature,
        Channel::SignalStrength,
        Channel::CpuLoad,
    ];

    pub fn index(&self) -> usize {
        match self {
            Channel::BatteryLevel => 0,
            Channel::Temperature => 1,
            Channel::SignalStrength => 2,
            Channel::CpuLoad => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Channel> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        CHANNEL_LAYOUT[self.index()]
    }

    /// Physical range a value is clipped to. Temperature is open-ended.
    pub fn physical_range(&self) -> (f64, f64) {
        match self {
            Channel::Temperature => (f64::NEG_INFINITY, f64::INFINITY),
            _ => (0.0, 100.0),
        }
    }

    /// Direction a failing channel moves in (+1 up, -1 down)
    pub fn degrade_sign(&self) -> f64 {
        match self {
            Channel::BatteryLevel | Channel::SignalStrength => -1.0,
            Channel::Temperature | Channel::CpuLoad => 1.0,
        }
    }

    pub fn clip(&self, value: f64) -> f64 {
        let (lo, hi) = self.physical_range();
        value.clamp(lo, hi)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// READING
// ============================================================================

/// One synthetic telemetry sample across all channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    step: usize,
    timestamp: DateTime<Utc>,
    battery_level: f64,
    temperature: f64,
    signal_strength: f64,
    cpu_load: f64,
}

impl Reading {
    /// Build a reading from raw values in layout order, clipped to physical bounds
    pub fn from_values(step: usize, timestamp: DateTime<Utc>, values: [f64; CHANNEL_COUNT]) -> Self {
        let [battery_level, temperature, signal_strength, cpu_load] = values;
        Self {
            step,
            timestamp,
            battery_level: Channel::BatteryLevel.clip(battery_level),
            temperature: Channel::Temperature.clip(temperature),
            signal_strength: Channel::SignalStrength.clip(signal_strength),
            cpu_load: Channel::CpuLoad.clip(cpu_load),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn battery_level(&self) -> f64 {
        self.battery_level
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn signal_strength(&self) -> f64 {
        self.signal_strength
    }

    pub fn cpu_load(&self) -> f64 {
        self.cpu_load
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::BatteryLevel => self.battery_level,
            Channel::Temperature => self.temperature,
            Channel::SignalStrength => self.signal_strength,
            Channel::CpuLoad => self.cpu_load,
        }
    }

    /// Values in layout order
    pub fn values(&self) -> [f64; CHANNEL_COUNT] {
        [self.battery_level, self.temperature, self.signal_strength, self.cpu_load]
    }

    /// Copy with one channel replaced
    pub fn with_channel(&self, channel: Channel, value: f64) -> Reading {
        let mut values = self.values();
        values[channel.index()] = value;
        Reading::from_values(self.step, self.timestamp, values)
    }

    /// Copy with per-channel offsets added
    pub fn offset_by(&self, offsets: &[f64; CHANNEL_COUNT]) -> Reading {
        let mut values = self.values();
        for (value, offset) in values.iter_mut().zip(offsets) {
            *value += offset;
        }
        Reading::from_values(self.step, self.timestamp, values)
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(values: [f64; CHANNEL_COUNT]) -> Reading {
        Reading::from_values(0, Utc::now(), values)
    }

    #[test]
    fn test_values_are_clipped() {
        let r = reading([140.0, 180.0, -5.0, 101.0]);
        assert_eq!(r.battery_level(), 100.0);
        assert_eq!(r.temperature(), 180.0); // open-ended
        assert_eq!(r.signal_strength(), 0.0);
        assert_eq!(r.cpu_load(), 100.0);
    }

    #[test]
    fn test_with_channel_returns_new_reading() {
        let original = reading([90.0, 35.0, 85.0, 35.0]);
        let forced = original.with_channel(Channel::BatteryLevel, 5.0);

        assert_eq!(original.battery_level(), 90.0);
        assert_eq!(forced.battery_level(), 5.0);
        assert_eq!(forced.step(), original.step());
        assert_eq!(forced.timestamp(), original.timestamp());
    }

    #[test]
    fn test_offset_by() {
        let r = reading([10.0, 35.0, 85.0, 35.0]).offset_by(&[-12.0, 2.5, 0.0, -1.0]);
        assert_eq!(r.values(), [0.0, 37.5, 85.0, 34.0]);
    }

    #[test]
    fn test_channel_index_matches_layout() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
            assert_eq!(Channel::from_index(i), Some(*channel));
            assert_eq!(channel.as_str(), CHANNEL_LAYOUT[i]);
        }
        assert_eq!(Channel::from_index(CHANNEL_COUNT), None);
    }
}
