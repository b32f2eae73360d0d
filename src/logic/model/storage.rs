//! Scorer snapshots - save / load fitted scorers as JSON
//!
//! A snapshot carries the channel layout it was trained against; loading is
//! refused when that layout no longer matches.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::error::{MissionError, MissionResult};
use crate::logic::telemetry::layout::LayoutInfo;
use super::deviation::BaselineDeviation;
use super::forest::IsolationForest;
use super::inference::AnomalyModel;
use super::scorer::AnomalyScorer;
use super::threshold::ThresholdStats;

/// Persistable fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotModel {
    IsolationForest(IsolationForest),
    BaselineDeviation(BaselineDeviation),
}

impl SnapshotModel {
    fn into_model(self) -> Box<dyn AnomalyModel> {
        match self {
            SnapshotModel::IsolationForest(m) => Box::new(m),
            SnapshotModel::BaselineDeviation(m) => Box::new(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerSnapshot {
    pub layout: LayoutInfo,
    pub saved_at: DateTime<Utc>,
    pub threshold: f64,
    #[serde(default)]
    pub stats: Option<ThresholdStats>,
    pub model: SnapshotModel,
}

impl ScorerSnapshot {
    /// Capture a ready scorer
    pub fn capture(scorer: &AnomalyScorer) -> MissionResult<Self> {
        if !scorer.is_ready() {
            return Err(MissionError::ScorerNotReady);
        }
        let model = scorer.snapshot_model().ok_or_else(|| {
            MissionError::invalid_config(format!("{} models cannot be persisted", scorer.method()))
        })?;

        Ok(Self {
            layout: LayoutInfo::current(),
            saved_at: Utc::now(),
            threshold: scorer.threshold(),
            stats: scorer.stats().cloned(),
            model,
        })
    }

    /// Rebuild a ready scorer
    pub fn into_scorer(self) -> MissionResult<AnomalyScorer> {
        self.layout.validate()?;
        Ok(AnomalyScorer::restore(
            self.model.into_model(),
            self.threshold,
            self.stats,
        ))
    }
}

pub fn save_snapshot(scorer: &AnomalyScorer, path: &Path) -> MissionResult<()> {
    let snapshot = ScorerSnapshot::capture(scorer)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(&snapshot)?;
    fs::write(path, json)?;

    log::info!("Scorer snapshot saved to {}", path.display());
    Ok(())
}

/// Load and validate a snapshot, returning a ready scorer
pub fn load_snapshot(path: &Path) -> MissionResult<AnomalyScorer> {
    let data = fs::read(path)?;
    let snapshot: ScorerSnapshot = serde_json::from_slice(&data)?;
    let scorer = snapshot.into_scorer()?;

    log::info!(
        "Scorer snapshot loaded from {} (method={}, threshold={:.4})",
        path.display(),
        scorer.method(),
        scorer.threshold()
    );
    Ok(scorer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::scorer::ScorerConfig;
    use crate::logic::model::forest::ForestConfig;
    use crate::logic::telemetry::{generate, GeneratorConfig};
    use tempfile::tempdir;

    fn small_forest() -> ScorerConfig {
        ScorerConfig {
            forest: ForestConfig {
                n_estimators: 20,
                max_samples: 64,
                seed: 3,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_saved_scorer_scores_identically() {
        let samples = generate(&GeneratorConfig::nominal());
        let scorer = small_forest().train(samples.as_slice()).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scorer.json");
        save_snapshot(&scorer, &path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.is_ready());
        assert!((loaded.threshold() - scorer.threshold()).abs() < 1e-12);

        let mission = generate(&GeneratorConfig::default());
        for reading in mission.iter().step_by(25) {
            let before = scorer.score(reading).unwrap().score;
            let after = loaded.score(reading).unwrap().score;
            assert!((before - after).abs() < 1e-9, "{} vs {}", before, after);
        }
    }

    #[test]
    fn test_layout_mismatch_is_rejected() {
        let samples = generate(&GeneratorConfig::nominal());
        let scorer = ScorerConfig::deviation().train(samples.as_slice()).unwrap();

        let mut snapshot = ScorerSnapshot::capture(&scorer).unwrap();
        snapshot.layout.hash ^= 0xdead_beef;

        let dir = tempdir().unwrap();
        let path = dir.path().join("scorer.json");
        fs::write(&path, serde_json::to_vec_pretty(&snapshot).unwrap()).unwrap();

        assert!(matches!(load_snapshot(&path), Err(MissionError::LayoutMismatch(_))));
    }

    #[test]
    fn test_unfitted_scorer_cannot_be_saved() {
        let scorer = AnomalyScorer::new(Box::new(IsolationForest::default()), 0.6);
        let dir = tempdir().unwrap();
        let result = save_snapshot(&scorer, &dir.path().join("scorer.json"));
        assert!(matches!(result, Err(MissionError::ScorerNotReady)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_snapshot(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(MissionError::Io(_))));
    }
}
