//! Isolation Forest
//!
//! Random axis-aligned splits isolate outliers in fewer steps than inliers.
//! Score: `s(x) = 2^(-E[h(x)] / c(ψ))`, where `h` is the path length in a
//! tree, `ψ` the per-tree sub-sample size and `c` the average path length
//! of an unsuccessful BST search. Scores near 1 are outliers, ~0.5 or lower
//! are normal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};
use crate::logic::telemetry::{Reading, CHANNEL_COUNT};
use super::inference::{AnomalyModel, ScorerError};
use super::scaler::StandardScaler;
use super::storage::SnapshotModel;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

type Point = [f64; CHANNEL_COUNT];

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// Sub-sample size per tree (ψ)
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_samples: 256,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> MissionResult<()> {
        if self.n_estimators == 0 {
            return Err(MissionError::invalid_config("n_estimators must be > 0"));
        }
        if self.max_samples < 2 {
            return Err(MissionError::invalid_config(format!(
                "max_samples must be >= 2, got {}",
                self.max_samples
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum IsolationNode {
    Leaf {
        size: usize,
    },
    Split {
        channel: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
}

impl IsolationNode {
    fn build(points: &mut [Point], depth: usize, max_depth: usize, rng: &mut StdRng) -> Self {
        if depth >= max_depth || points.len() <= 1 {
            return IsolationNode::Leaf { size: points.len() };
        }

        // Only channels with spread can be split on
        let candidates: Vec<(usize, f64, f64)> = (0..CHANNEL_COUNT)
            .filter_map(|c| {
                let lo = points.iter().map(|p| p[c]).fold(f64::INFINITY, f64::min);
                let hi = points.iter().map(|p| p[c]).fold(f64::NEG_INFINITY, f64::max);
                (hi > lo).then_some((c, lo, hi))
            })
            .collect();

        if candidates.is_empty() {
            return IsolationNode::Leaf { size: points.len() };
        }

        let (channel, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);

        let mut split = 0;
        for i in 0..points.len() {
            if points[i][channel] < threshold {
                points.swap(i, split);
                split += 1;
            }
        }

        let (left, right) = points.split_at_mut(split);
        IsolationNode::Split {
            channel,
            threshold,
            left: Box::new(Self::build(left, depth + 1, max_depth, rng)),
            right: Box::new(Self::build(right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, x: &Point) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                IsolationNode::Leaf { size } => return depth + average_path_length(*size),
                IsolationNode::Split { channel, threshold, left, right } => {
                    node = if x[*channel] < *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// c(n): average path length of an unsuccessful search in a BST of n nodes
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    config: ForestConfig,
    scaler: Option<StandardScaler>,
    trees: Vec<IsolationNode>,
    sample_size: usize,
}

impl IsolationForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            scaler: None,
            trees: Vec::new(),
            sample_size: 0,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl AnomalyModel for IsolationForest {
    fn method(&self) -> &'static str {
        "isolation_forest"
    }

    fn fit(&mut self, samples: &[Reading]) -> Result<(), ScorerError> {
        let scaler = StandardScaler::fit(samples)?;
        let points: Vec<Point> = samples.iter().map(|r| scaler.transform(r)).collect();

        let n_estimators = self.config.n_estimators.max(1);
        let sample_size = self.config.max_samples.clamp(2, points.len());
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let trees = (0..n_estimators)
            .map(|_| {
                let mut subset: Vec<Point> = rand::seq::index::sample(&mut rng, points.len(), sample_size)
                    .iter()
                    .map(|i| points[i])
                    .collect();
                IsolationNode::build(&mut subset, 0, max_depth, &mut rng)
            })
            .collect();

        self.scaler = Some(scaler);
        self.trees = trees;
        self.sample_size = sample_size;

        log::debug!(
            "Isolation forest fitted: {} trees, ψ={}, max depth {}",
            n_estimators,
            sample_size,
            max_depth
        );
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_some() && !self.trees.is_empty()
    }

    fn score(&self, reading: &Reading) -> Result<f64, ScorerError> {
        let scaler = self.scaler.as_ref().ok_or(ScorerError::NotReady)?;
        if self.trees.is_empty() {
            return Err(ScorerError::NotReady);
        }

        let x = scaler.transform(reading);
        let mean_path = self.trees.iter().map(|t| t.path_length(&x)).sum::<f64>()
            / self.trees.len() as f64;

        let c = average_path_length(self.sample_size);
        Ok(2f64.powf(-mean_path / c))
    }

    fn snapshot(&self) -> Option<SnapshotModel> {
        self.is_fitted().then(|| SnapshotModel::IsolationForest(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::{generate, Channel, GeneratorConfig};

    fn fitted() -> IsolationForest {
        let samples = generate(&GeneratorConfig::nominal());
        let mut forest = IsolationForest::new(ForestConfig {
            n_estimators: 100,
            ..Default::default()
        });
        forest.fit(samples.as_slice()).unwrap();
        forest
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) ≈ 10.24
        assert!((average_path_length(256) - 10.24).abs() < 0.01);
    }

    #[test]
    fn test_score_before_fit_is_not_ready() {
        let forest = IsolationForest::default();
        let reading = generate(&GeneratorConfig::nominal()).as_slice()[0];
        assert!(!forest.is_fitted());
        assert_eq!(forest.score(&reading), Err(ScorerError::NotReady));
    }

    #[test]
    fn test_outlier_scores_higher_than_inlier() {
        let forest = fitted();
        assert_eq!(forest.tree_count(), 100);

        let stream = generate(&GeneratorConfig::nominal());
        let inlier = stream.as_slice()[200];
        let outlier = inlier
            .with_channel(Channel::BatteryLevel, 5.0)
            .with_channel(Channel::Temperature, 120.0);

        let inlier_score = forest.score(&inlier).unwrap();
        let outlier_score = forest.score(&outlier).unwrap();

        assert!(inlier_score < 0.6, "inlier score {}", inlier_score);
        assert!(outlier_score > inlier_score, "outlier {} vs inlier {}", outlier_score, inlier_score);
        assert!(outlier_score <= 1.0);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let a = fitted();
        let b = fitted();
        let reading = generate(&GeneratorConfig::default()).as_slice()[250];
        assert_eq!(a.score(&reading), b.score(&reading));
    }

    #[test]
    fn test_validate_config() {
        assert!(ForestConfig::default().validate().is_ok());
        let bad = ForestConfig {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
