//! Generator tests
//!
//! Determinism, finiteness and fault scheduling of the telemetry generator.

use super::generator::{
    generate, ChannelProfile, GeneratorConfig, TelemetryGenerator, NOISE_CLIP_SIGMAS,
};
use crate::logic::error::MissionError;
use super::injection::{FailureInjection, FailureKind};
use super::reading::Channel;

#[test]
fn test_stream_has_configured_length() {
    let config = GeneratorConfig {
        steps: 25,
        ..GeneratorConfig::nominal()
    };
    let mut generator = TelemetryGenerator::new(config);
    assert_eq!(generator.size_hint(), (25, Some(25)));

    let stream = generator.collect_stream();
    assert_eq!(stream.len(), 25);
    assert!(generator.next().is_none());

    for (i, reading) in stream.iter().enumerate() {
        assert_eq!(reading.step(), i);
        assert!(reading.is_finite());
    }
}

#[test]
fn test_same_seed_same_values() {
    let a = generate(&GeneratorConfig::nominal());
    let b = generate(&GeneratorConfig::nominal());

    let values_a: Vec<_> = a.iter().map(|r| r.values()).collect();
    let values_b: Vec<_> = b.iter().map(|r| r.values()).collect();
    assert_eq!(values_a, values_b);
}

#[test]
fn test_restart_with_new_seed() {
    let mut generator = TelemetryGenerator::new(GeneratorConfig::nominal());
    let first: Vec<_> = generator.by_ref().take(20).map(|r| r.values()).collect();

    generator.restart(1);
    let replay: Vec<_> = generator.by_ref().take(20).map(|r| r.values()).collect();
    assert_eq!(first, replay);

    generator.restart(99);
    let reseeded: Vec<_> = generator.by_ref().take(20).map(|r| r.values()).collect();
    assert_ne!(first, reseeded);
    assert_eq!(generator.config().seed, 99);
}

#[test]
fn test_noise_is_bounded() {
    let config = GeneratorConfig {
        steps: 500,
        noise_scale: 2.0,
        ..GeneratorConfig::nominal()
    };
    let stream = generate(&config);

    for reading in &stream {
        let t = reading.step();
        let expected = config.temperature.value_at(t);
        let bound = NOISE_CLIP_SIGMAS * config.temperature.noise * config.noise_scale;
        assert!((reading.temperature() - expected).abs() <= bound + 1e-9);
    }
}

#[test]
fn test_constant_profile_is_exact() {
    let stream = generate(&GeneratorConfig::constant(15, [90.0, 35.0, 85.0, 35.0]));
    for reading in &stream {
        assert_eq!(reading.values(), [90.0, 35.0, 85.0, 35.0]);
    }
}

#[test]
fn test_scripted_battery_override() {
    let config = GeneratorConfig::constant(20, [90.0, 35.0, 85.0, 35.0])
        .with_injection(FailureInjection::override_channel(10, Channel::BatteryLevel, 5.0));
    let stream = generate(&config);

    assert_eq!(stream.get(9).map(|r| r.battery_level()), Some(90.0));
    assert_eq!(stream.get(10).map(|r| r.battery_level()), Some(5.0));
    assert_eq!(stream.last().map(|r| r.battery_level()), Some(5.0));
    // Other channels untouched
    assert!(stream.iter().all(|r| r.temperature() == 35.0));
}

#[test]
fn test_default_mission_has_thermal_runaway() {
    let config = GeneratorConfig::default();
    let stream = generate(&config);
    let temps = stream.channel_series(Channel::Temperature);

    let before = temps[60..120].iter().cloned().fold(f64::MIN, f64::max);
    let after = temps[280..].iter().cloned().fold(f64::MIN, f64::max);
    assert!(after > before + 5.0);
    assert!(after > 50.0);
}

#[test]
fn test_validate_rejects_bad_values() {
    assert!(GeneratorConfig::default().validate().is_ok());
    assert!(GeneratorConfig::nominal().validate().is_ok());

    let zero_steps = GeneratorConfig {
        steps: 0,
        ..GeneratorConfig::nominal()
    };
    assert!(zero_steps.validate().is_err());

    let negative_severity = GeneratorConfig::nominal()
        .with_injection(FailureInjection::new(5, FailureKind::PowerDrain { severity: -1.0 }));
    assert!(negative_severity.validate().is_err());

    let inverted_window = GeneratorConfig::nominal()
        .with_injection(FailureInjection::override_channel(10, Channel::CpuLoad, 90.0).until(10));
    assert!(inverted_window.validate().is_err());
}

#[test]
fn test_validate_rejects_timestamp_overflow() {
    let config = GeneratorConfig {
        step_secs: i64::MAX / 2,
        ..GeneratorConfig::constant(5, [90.0, 35.0, 85.0, 35.0])
    };
    assert!(matches!(config.validate(), Err(MissionError::InvalidConfig(_))));

    // Unvalidated configs still yield a full stream
    let stream = generate(&config);
    assert_eq!(stream.len(), 5);
    assert!(stream.iter().all(|r| r.battery_level() == 90.0));

    let hourly = GeneratorConfig {
        step_secs: 3600,
        ..GeneratorConfig::constant(5, [90.0, 35.0, 85.0, 35.0])
    };
    assert!(hourly.validate().is_ok());
}

#[test]
fn test_secondary_oscillation() {
    let config = GeneratorConfig::nominal();

    // cos(0) = 1: temperature 35 + 0.5, cpu 35 + 5
    assert!((config.temperature.value_at(0) - 35.5).abs() < 1e-12);
    assert!((config.cpu.value_at(0) - 40.0).abs() < 1e-12);
    assert_eq!(config.battery.value_at(0), 100.0);

    let zero_period = GeneratorConfig {
        temperature: ChannelProfile {
            cos_period: 0.0,
            ..config.temperature
        },
        ..GeneratorConfig::nominal()
    };
    assert!(zero_period.validate().is_err());
}
