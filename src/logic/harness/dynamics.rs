//! Channel dynamics applied on top of the recorded stream
//!
//! The stream itself is never touched; the harness keeps per-channel
//! offsets and adds them to each recorded reading.

use crate::logic::telemetry::{Channel, Reading, CHANNEL_COUNT};
use super::config::HarnessConfig;
use super::types::MissionState;

#[derive(Debug, Clone, Default)]
pub struct ChannelDynamics {
    offsets: [f64; CHANNEL_COUNT],
    /// Recovery rate of mitigated channels
    recovery: [Option<f64>; CHANNEL_COUNT],
}

impl ChannelDynamics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded reading plus offsets, clipped
    pub fn live(&self, recorded: &Reading) -> Reading {
        recorded.offset_by(&self.offsets)
    }

    pub fn offsets(&self) -> &[f64; CHANNEL_COUNT] {
        &self.offsets
    }

    pub fn apply_one_shot(&mut self, deltas: &[f64; CHANNEL_COUNT]) {
        for (offset, delta) in self.offsets.iter_mut().zip(deltas) {
            *offset += delta;
        }
    }

    /// Start pulling `channel` back toward its target; lasts for the rest
    /// of the run
    pub fn mitigate(&mut self, channel: Channel, rate: f64) {
        self.recovery[channel.index()] = Some(rate);
    }

    pub fn is_mitigated(&self, channel: Channel) -> bool {
        self.recovery[channel.index()].is_some()
    }

    /// Offsets for the next step
    pub fn advance(&mut self, live: &Reading, state: MissionState, config: &HarnessConfig) {
        for channel in Channel::ALL {
            let i = channel.index();
            let value = live.get(channel);

            if let Some(rate) = self.recovery[i] {
                let gap = config.recovery_targets.get(channel) - value;
                self.offsets[i] += gap.signum() * rate.min(gap.abs());
            } else if state == MissionState::Anomalous
                && !config.nominal.channel_in_bounds(channel, value)
            {
                self.offsets[i] += channel.degrade_sign() * config.decay.get(channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(values: [f64; CHANNEL_COUNT]) -> Reading {
        Reading::from_values(0, Utc::now(), values)
    }

    #[test]
    fn test_degrades_only_while_anomalous() {
        let config = HarnessConfig::default();
        let low = reading([10.0, 35.0, 85.0, 35.0]);

        let mut dynamics = ChannelDynamics::new();
        dynamics.advance(&low, MissionState::Nominal, &config);
        assert_eq!(dynamics.offsets(), &[0.0; CHANNEL_COUNT]);

        dynamics.advance(&low, MissionState::Anomalous, &config);
        assert_eq!(dynamics.offsets(), &[-0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_in_bounds_channels_do_not_degrade() {
        let config = HarnessConfig::default();
        let mut dynamics = ChannelDynamics::new();
        dynamics.advance(&reading([90.0, 60.0, 85.0, 35.0]), MissionState::Anomalous, &config);
        assert_eq!(dynamics.offsets(), &[0.0, 0.8, 0.0, 0.0]);
    }

    #[test]
    fn test_recovery_stops_at_target() {
        let config = HarnessConfig::default();
        let mut dynamics = ChannelDynamics::new();
        dynamics.mitigate(Channel::Temperature, 3.0);

        dynamics.advance(&reading([90.0, 37.0, 85.0, 35.0]), MissionState::Recovering, &config);
        // 2 degrees from target: no overshoot
        assert_eq!(dynamics.offsets()[Channel::Temperature.index()], -2.0);
    }

    #[test]
    fn test_live_applies_offsets_and_clips() {
        let mut dynamics = ChannelDynamics::new();
        dynamics.apply_one_shot(&[-50.0, 10.0, 0.0, -40.0]);

        let live = dynamics.live(&reading([30.0, 35.0, 85.0, 35.0]));
        assert_eq!(live.values(), [0.0, 45.0, 85.0, 0.0]);
    }
}
