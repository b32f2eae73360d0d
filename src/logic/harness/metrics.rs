//! Run metrics: per-step mission damage and the survival score.

use crate::logic::telemetry::Reading;
use super::config::SurvivalWeights;

/// Best possible survival score
pub const MAX_SURVIVAL_SCORE: f64 = 1000.0;

// Damage knees and weights per unit past the knee
const DAMAGE_BATTERY_KNEE: f64 = 40.0;
const DAMAGE_BATTERY_WEIGHT: f64 = 0.6;
const DAMAGE_TEMPERATURE_KNEE: f64 = 45.0;
const DAMAGE_TEMPERATURE_WEIGHT: f64 = 1.2;
const DAMAGE_SIGNAL_KNEE: f64 = 50.0;
const DAMAGE_SIGNAL_WEIGHT: f64 = 0.7;
const DAMAGE_CPU_KNEE: f64 = 80.0;
const DAMAGE_CPU_WEIGHT: f64 = 0.4;

/// Damage accrued by one step spent in `reading`. 0 for a healthy craft.
pub fn mission_damage(reading: &Reading) -> f64 {
    (DAMAGE_BATTERY_KNEE - reading.battery_level()).max(0.0) * DAMAGE_BATTERY_WEIGHT
        + (reading.temperature() - DAMAGE_TEMPERATURE_KNEE).max(0.0) * DAMAGE_TEMPERATURE_WEIGHT
        + (DAMAGE_SIGNAL_KNEE - reading.signal_strength()).max(0.0) * DAMAGE_SIGNAL_WEIGHT
        + (reading.cpu_load() - DAMAGE_CPU_KNEE).max(0.0) * DAMAGE_CPU_WEIGHT
}

/// Weighted combination of remaining battery and time spent in bounds,
/// scaled to `[0, MAX_SURVIVAL_SCORE]`.
pub fn survival_score(
    final_battery: f64,
    out_of_bounds_steps: usize,
    steps: usize,
    weights: &SurvivalWeights,
) -> f64 {
    let total = weights.battery + weights.stability;
    if steps == 0 || total <= 0.0 {
        return 0.0;
    }

    let battery = (final_battery / 100.0).clamp(0.0, 1.0);
    let stability = 1.0 - (out_of_bounds_steps.min(steps) as f64 / steps as f64);

    MAX_SURVIVAL_SCORE * (weights.battery * battery + weights.stability * stability) / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_healthy_reading_has_no_damage() {
        let r = Reading::from_values(0, Utc::now(), [90.0, 35.0, 85.0, 35.0]);
        assert_eq!(mission_damage(&r), 0.0);
    }

    #[test]
    fn test_damage_sums_every_channel() {
        let r = Reading::from_values(0, Utc::now(), [30.0, 55.0, 40.0, 90.0]);
        // 10·0.6 + 10·1.2 + 10·0.7 + 10·0.4
        assert!((mission_damage(&r) - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_survival_score_bounds() {
        let w = SurvivalWeights::default();
        assert_eq!(survival_score(100.0, 0, 50, &w), MAX_SURVIVAL_SCORE);
        assert_eq!(survival_score(0.0, 50, 50, &w), 0.0);
        assert!((survival_score(50.0, 25, 50, &w) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_survival_weighting() {
        let battery_only = SurvivalWeights {
            battery: 1.0,
            stability: 0.0,
        };
        assert!((survival_score(40.0, 50, 50, &battery_only) - 400.0).abs() < 1e-9);
        assert_eq!(survival_score(40.0, 0, 0, &battery_only), 0.0);
    }
}
