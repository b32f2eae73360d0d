//! Standard Scaler - per-channel standardization
//!
//! Fitted on the nominal training matrix; zero-variance channels get a
//! scale of 1 so they pass through centered.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::telemetry::{Reading, CHANNEL_COUNT};
use super::inference::{check_samples, ScorerError};

/// Scale used when a channel has (near) zero spread
const MIN_SCALE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; CHANNEL_COUNT],
    pub scale: [f64; CHANNEL_COUNT],
}

impl StandardScaler {
    pub fn fit(samples: &[Reading]) -> Result<Self, ScorerError> {
        check_samples(samples)?;

        let matrix = feature_matrix(samples)?;
        let mean = matrix
            .mean_axis(Axis(0))
            .ok_or_else(|| ScorerError::InvalidSamples("empty feature matrix".to_string()))?;
        let std = matrix.std_axis(Axis(0), 0.0);

        let mut scaler = Self {
            mean: [0.0; CHANNEL_COUNT],
            scale: [1.0; CHANNEL_COUNT],
        };
        for i in 0..CHANNEL_COUNT {
            scaler.mean[i] = mean[i];
            scaler.scale[i] = if std[i] > MIN_SCALE { std[i] } else { 1.0 };
        }

        Ok(scaler)
    }

    pub fn transform(&self, reading: &Reading) -> [f64; CHANNEL_COUNT] {
        let mut out = reading.values();
        for (i, v) in out.iter_mut().enumerate() {
            *v = (*v - self.mean[i]) / self.scale[i];
        }
        out
    }
}

/// Readings as an `n × CHANNEL_COUNT` matrix in layout order
pub fn feature_matrix(samples: &[Reading]) -> Result<Array2<f64>, ScorerError> {
    let data: Vec<f64> = samples.iter().flat_map(|r| r.values()).collect();
    Array2::from_shape_vec((samples.len(), CHANNEL_COUNT), data)
        .map_err(|e| ScorerError::InvalidSamples(format!("shape error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn samples(rows: &[[f64; CHANNEL_COUNT]]) -> Vec<Reading> {
        rows.iter()
            .enumerate()
            .map(|(i, v)| Reading::from_values(i, Utc::now(), *v))
            .collect()
    }

    #[test]
    fn test_fit_mean_and_scale() {
        let data = samples(&[[10.0, 30.0, 80.0, 35.0], [20.0, 40.0, 80.0, 45.0]]);
        let scaler = StandardScaler::fit(&data).unwrap();

        assert_eq!(scaler.mean, [15.0, 35.0, 80.0, 40.0]);
        assert_eq!(scaler.scale, [5.0, 5.0, 1.0, 5.0]); // constant channel -> 1.0

        let z = scaler.transform(&data[1]);
        assert_eq!(z, [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_fit_needs_two_samples() {
        let data = samples(&[[10.0, 30.0, 80.0, 35.0]]);
        assert_eq!(
            StandardScaler::fit(&data),
            Err(ScorerError::InsufficientSamples { required: 2, actual: 1 })
        );
    }

    #[test]
    fn test_feature_matrix_shape() {
        let data = samples(&[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [9.0, 10.0, 11.0, 12.0]]);
        let m = feature_matrix(&data).unwrap();
        assert_eq!(m.dim(), (3, CHANNEL_COUNT));
        assert_eq!(m[[2, 1]], 10.0);
    }
}
