//! Diagnosis Mapper
//!
//! Rule evaluation only. Input: reading + anomaly flag. Output: one
//! `Diagnosis`, deterministic for a given input.

use crate::logic::telemetry::Reading;
use super::rules::DiagnosticThresholds;
use super::types::{Diagnosis, DiagnosisResult};

/// Diagnose with default thresholds
pub fn diagnose(reading: &Reading, is_anomaly: bool) -> Diagnosis {
    diagnose_with_thresholds(reading, is_anomaly, &DiagnosticThresholds::default())
}

pub fn diagnose_with_thresholds(
    reading: &Reading,
    is_anomaly: bool,
    thresholds: &DiagnosticThresholds,
) -> Diagnosis {
    if !is_anomaly {
        return Diagnosis::None;
    }

    Diagnosis::PRIORITY
        .into_iter()
        .find(|d| violates(reading, *d, thresholds))
        .unwrap_or(Diagnosis::None)
}

/// Diagnose and explain. `violations` lists every matching rule, the
/// winner first.
pub fn diagnose_with_reasons(
    reading: &Reading,
    is_anomaly: bool,
    thresholds: &DiagnosticThresholds,
) -> DiagnosisResult {
    if !is_anomaly {
        return DiagnosisResult {
            reasons: vec!["Reading not flagged".to_string()],
            ..Default::default()
        };
    }

    let violations: Vec<Diagnosis> = Diagnosis::PRIORITY
        .into_iter()
        .filter(|d| violates(reading, *d, thresholds))
        .collect();

    let mut reasons: Vec<String> = violations
        .iter()
        .map(|d| reason(reading, *d, thresholds))
        .collect();

    let diagnosis = violations.first().copied().unwrap_or(Diagnosis::None);
    if violations.len() > 1 {
        reasons.push(format!(
            "{} rules matched, {} wins by priority",
            violations.len(),
            diagnosis
        ));
    }
    if violations.is_empty() {
        reasons.push("Flagged, but no subsystem rule matched".to_string());
    }

    DiagnosisResult {
        diagnosis,
        violations,
        reasons,
    }
}

fn violates(reading: &Reading, diagnosis: Diagnosis, t: &DiagnosticThresholds) -> bool {
    match diagnosis {
        Diagnosis::Power => reading.battery_level() < t.low_battery,
        Diagnosis::Thermal => reading.temperature() > t.high_temperature,
        Diagnosis::Communication => reading.signal_strength() < t.low_signal,
        Diagnosis::None => false,
    }
}

fn reason(reading: &Reading, diagnosis: Diagnosis, t: &DiagnosticThresholds) -> String {
    match diagnosis {
        Diagnosis::Power => format!(
            "battery_level {:.1}% < {:.1}%",
            reading.battery_level(),
            t.low_battery
        ),
        Diagnosis::Thermal => format!(
            "temperature {:.1}°C > {:.1}°C",
            reading.temperature(),
            t.high_temperature
        ),
        Diagnosis::Communication => format!(
            "signal_strength {:.1}% < {:.1}%",
            reading.signal_strength(),
            t.low_signal
        ),
        Diagnosis::None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::Channel;
    use chrono::Utc;

    fn reading(battery: f64, temperature: f64, signal: f64) -> Reading {
        Reading::from_values(0, Utc::now(), [battery, temperature, signal, 35.0])
    }

    #[test]
    fn test_not_flagged_is_none() {
        // Even a reading that violates every rule
        let r = reading(5.0, 80.0, 10.0);
        assert_eq!(diagnose(&r, false), Diagnosis::None);
        assert_eq!(diagnose_with_reasons(&r, false, &DiagnosticThresholds::default()).diagnosis, Diagnosis::None);
    }

    #[test]
    fn test_single_rules() {
        assert_eq!(diagnose(&reading(5.0, 35.0, 85.0), true), Diagnosis::Power);
        assert_eq!(diagnose(&reading(90.0, 60.0, 85.0), true), Diagnosis::Thermal);
        assert_eq!(diagnose(&reading(90.0, 35.0, 10.0), true), Diagnosis::Communication);
        assert_eq!(diagnose(&reading(90.0, 35.0, 85.0), true), Diagnosis::None);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(diagnose(&reading(20.0, 50.0, 40.0), true), Diagnosis::None);
    }

    #[test]
    fn test_power_beats_thermal() {
        let r = reading(5.0, 80.0, 85.0);
        assert_eq!(diagnose(&r, true), Diagnosis::Power);

        let result = diagnose_with_reasons(&r, true, &DiagnosticThresholds::default());
        assert_eq!(result.diagnosis, Diagnosis::Power);
        assert_eq!(result.violations, vec![Diagnosis::Power, Diagnosis::Thermal]);
        assert!(result.reasons.iter().any(|r| r.contains("wins by priority")));
    }

    #[test]
    fn test_thermal_beats_communication() {
        assert_eq!(diagnose(&reading(90.0, 80.0, 10.0), true), Diagnosis::Thermal);
    }

    #[test]
    fn test_custom_thresholds() {
        let r = reading(25.0, 35.0, 85.0);
        assert_eq!(diagnose(&r, true), Diagnosis::None);
        assert_eq!(
            diagnose_with_thresholds(&r, true, &DiagnosticThresholds::high_sensitivity()),
            Diagnosis::Power
        );
    }

    #[test]
    fn test_diagnosis_channel() {
        assert_eq!(Diagnosis::Thermal.channel(), Some(Channel::Temperature));
        assert_eq!(Diagnosis::None.channel(), None);
        assert!(!Diagnosis::None.is_actionable());
    }

    #[test]
    fn test_validate() {
        assert!(DiagnosticThresholds::default().validate().is_ok());
        let bad = DiagnosticThresholds {
            low_battery: 150.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
