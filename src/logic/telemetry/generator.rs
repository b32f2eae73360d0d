//! Telemetry Generator
//!
//! Lazy, finite iterator of synthetic readings:
//! `value(t) = baseline + drift·t + amplitude·sin(t / period)
//!            + cos_amplitude·cos(t / cos_period) + noise`,
//! then the failure-injection schedule, then clipping.
//! Restartable with a fresh seed.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};
use super::injection::{FailureInjection, FailureKind};
use super::layout::CHANNEL_COUNT;
use super::reading::{Channel, Reading};
use super::stream::Stream;

/// Noise is truncated to ±3σ
pub const NOISE_CLIP_SIGMAS: f64 = 3.0;

/// Simulated time from the stream epoch to `step`, `None` on overflow
fn step_offset(step: usize, step_secs: i64) -> Option<Duration> {
    i64::try_from(step)
        .ok()
        .and_then(|s| s.checked_mul(step_secs))
        .and_then(Duration::try_seconds)
}

// ============================================================================
// CHANNEL PROFILE
// ============================================================================

/// Nominal behaviour of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub baseline: f64,
    pub drift_per_step: f64,
    pub amplitude: f64,
    pub period: f64,
    /// Slower secondary oscillation (temperature and cpu load)
    #[serde(default)]
    pub cos_amplitude: f64,
    #[serde(default = "default_period")]
    pub cos_period: f64,
    /// Noise standard deviation before `noise_scale`
    pub noise: f64,
}

fn default_period() -> f64 {
    1.0
}

impl ChannelProfile {
    /// Flat, noise-free channel
    pub fn constant(baseline: f64) -> Self {
        Self {
            baseline,
            drift_per_step: 0.0,
            amplitude: 0.0,
            period: 1.0,
            cos_amplitude: 0.0,
            cos_period: 1.0,
            noise: 0.0,
        }
    }

    /// Noise-free value at step `t`
    pub fn value_at(&self, t: usize) -> f64 {
        let t = t as f64;
        self.baseline
            + self.drift_per_step * t
            + self.amplitude * (t / self.period).sin()
            + self.cos_amplitude * (t / self.cos_period).cos()
    }

    fn validate(&self, channel: Channel) -> MissionResult<()> {
        let finite = [
            self.baseline,
            self.drift_per_step,
            self.amplitude,
            self.period,
            self.cos_amplitude,
            self.cos_period,
            self.noise,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(MissionError::invalid_config(format!(
                "{} profile contains non-finite values",
                channel
            )));
        }
        if self.period <= 0.0 || self.cos_period <= 0.0 {
            return Err(MissionError::invalid_config(format!(
                "{} profile periods must be > 0, got {} / {}",
                channel, self.period, self.cos_period
            )));
        }
        if self.noise < 0.0 {
            return Err(MissionError::invalid_config(format!(
                "{} profile noise must be >= 0, got {}",
                channel, self.noise
            )));
        }
        Ok(())
    }
}

// ============================================================================
// GENERATOR CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Stream length
    pub steps: usize,
    pub seed: u64,
    /// Global multiplier on every channel's noise
    pub noise_scale: f64,
    /// Simulated seconds between readings
    pub step_secs: i64,
    pub battery: ChannelProfile,
    pub temperature: ChannelProfile,
    pub signal: ChannelProfile,
    pub cpu: ChannelProfile,
    pub injections: Vec<FailureInjection>,
}

impl Default for GeneratorConfig {
    /// Mission stream: thermal runaway from t=120, crossing the
    /// high-temperature threshold around t=240
    fn default() -> Self {
        Self {
            steps: 300,
            seed: 7,
            noise_scale: 1.1,
            injections: vec![FailureInjection::new(
                120,
                FailureKind::ThermalRunaway { severity: 2.5 },
            )],
            ..Self::nominal()
        }
    }
}

impl GeneratorConfig {
    /// Fault-free telemetry, used for training samples
    pub fn nominal() -> Self {
        Self {
            steps: 400,
            seed: 1,
            noise_scale: 1.0,
            step_secs: 1,
            battery: ChannelProfile {
                baseline: 100.0,
                drift_per_step: -0.02,
                amplitude: 0.6,
                period: 30.0,
                cos_amplitude: 0.0,
                cos_period: 1.0,
                noise: 0.25,
            },
            temperature: ChannelProfile {
                baseline: 35.0,
                drift_per_step: 0.0,
                amplitude: 0.8,
                period: 18.0,
                cos_amplitude: 0.5,
                cos_period: 50.0,
                noise: 0.35,
            },
            signal: ChannelProfile {
                baseline: 85.0,
                drift_per_step: -0.002,
                amplitude: 3.0,
                period: 40.0,
                cos_amplitude: 0.0,
                cos_period: 1.0,
                noise: 0.9,
            },
            cpu: ChannelProfile {
                baseline: 35.0,
                drift_per_step: 0.0,
                amplitude: 8.0,
                period: 10.0,
                cos_amplitude: 5.0,
                cos_period: 17.0,
                noise: 1.2,
            },
            injections: Vec::new(),
        }
    }

    /// Flat, noise-free channels at the given values (scripted scenarios)
    pub fn constant(steps: usize, values: [f64; CHANNEL_COUNT]) -> Self {
        let [battery, temperature, signal, cpu] = values;
        Self {
            steps,
            noise_scale: 0.0,
            battery: ChannelProfile::constant(battery),
            temperature: ChannelProfile::constant(temperature),
            signal: ChannelProfile::constant(signal),
            cpu: ChannelProfile::constant(cpu),
            ..Self::nominal()
        }
    }

    pub fn with_injection(mut self, injection: FailureInjection) -> Self {
        self.injections.push(injection);
        self
    }

    pub fn profile(&self, channel: Channel) -> &ChannelProfile {
        match channel {
            Channel::BatteryLevel => &self.battery,
            Channel::Temperature => &self.temperature,
            Channel::SignalStrength => &self.signal,
            Channel::CpuLoad => &self.cpu,
        }
    }

    pub fn validate(&self) -> MissionResult<()> {
        if self.steps == 0 {
            return Err(MissionError::invalid_config("generator steps must be > 0"));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(MissionError::invalid_config(format!(
                "noise_scale must be a finite value >= 0, got {}",
                self.noise_scale
            )));
        }
        if self.step_secs <= 0 {
            return Err(MissionError::invalid_config("step_secs must be > 0"));
        }
        let span = step_offset(self.steps - 1, self.step_secs)
            .and_then(|offset| Utc::now().checked_add_signed(offset));
        if span.is_none() {
            return Err(MissionError::invalid_config(format!(
                "{} steps of {}s overflow the timestamp range",
                self.steps, self.step_secs
            )));
        }
        for channel in Channel::ALL {
            self.profile(channel).validate(channel)?;
        }
        for injection in &self.injections {
            if let Some(end) = injection.end_step {
                if end <= injection.start_step {
                    return Err(MissionError::invalid_config(format!(
                        "injection {} ends at {} before it starts at {}",
                        injection.kind.as_str(),
                        end,
                        injection.start_step
                    )));
                }
            }
            match injection.kind {
                FailureKind::Override { value, .. } if !value.is_finite() => {
                    return Err(MissionError::invalid_config("override value must be finite"));
                }
                kind => {
                    if let Some(severity) = kind.severity() {
                        if !severity.is_finite() || severity < 0.0 {
                            return Err(MissionError::invalid_config(format!(
                                "{} severity must be a finite value >= 0, got {}",
                                kind.as_str(),
                                severity
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct TelemetryGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    step: usize,
    epoch: DateTime<Utc>,
}

impl TelemetryGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            step: 0,
            epoch: Utc::now(),
        }
    }

    /// Rewind to step 0 with a fresh seed
    pub fn restart(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.step = 0;
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn remaining(&self) -> usize {
        self.config.steps.saturating_sub(self.step)
    }

    /// Drain the rest of the sequence into a stream
    pub fn collect_stream(&mut self) -> Stream {
        let mut stream = Stream::with_capacity(self.remaining());
        for reading in self.by_ref() {
            stream.push(reading);
        }
        stream
    }

    fn sample_noise(&mut self, sigma: f64) -> f64 {
        // Always draw so every channel consumes the RNG the same way.
        let z: f64 = self.rng.sample(StandardNormal);
        z.clamp(-NOISE_CLIP_SIGMAS, NOISE_CLIP_SIGMAS) * sigma
    }
}

impl Iterator for TelemetryGenerator {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        if self.step >= self.config.steps {
            return None;
        }

        let step = self.step;
        let mut values = [0.0f64; CHANNEL_COUNT];
        for channel in Channel::ALL {
            let profile = *self.config.profile(channel);
            let sigma = profile.noise * self.config.noise_scale;
            values[channel.index()] = profile.value_at(step) + self.sample_noise(sigma);
        }

        for injection in &self.config.injections {
            injection.apply(step, &mut values);
        }

        // Unvalidated configs saturate instead of overflowing
        let timestamp = step_offset(step, self.config.step_secs)
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.step += 1;

        Some(Reading::from_values(step, timestamp, values))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

/// Generate a full stream from a config
pub fn generate(config: &GeneratorConfig) -> Stream {
    TelemetryGenerator::new(config.clone()).collect_stream()
}
