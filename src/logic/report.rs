//! Mission report export (JSON)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{APP_NAME, APP_VERSION};
use super::error::MissionResult;
use super::harness::ComparisonReport;
use super::model::{AnomalyScorer, ThresholdStats};
use super::response::ActionLogEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerSummary {
    pub method: String,
    pub threshold: f64,
    pub stats: Option<ThresholdStats>,
}

impl ScorerSummary {
    pub fn from_scorer(scorer: &AnomalyScorer) -> Self {
        Self {
            method: scorer.method().to_string(),
            threshold: scorer.threshold(),
            stats: scorer.stats().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub report_id: Uuid,
    pub app: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub scorer: ScorerSummary,
    pub comparison: ComparisonReport,
    /// Non-noop decisions of the last run
    pub actions_taken: Vec<ActionLogEntry>,
}

impl MissionReport {
    pub fn new(
        scorer: &AnomalyScorer,
        comparison: ComparisonReport,
        actions_taken: Vec<ActionLogEntry>,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            app: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            generated_at: Utc::now(),
            scorer: ScorerSummary::from_scorer(scorer),
            comparison,
            actions_taken,
        }
    }

    /// `mission_report_<timestamp>_<id prefix>.json`, unique per report
    pub fn file_name(&self) -> String {
        let id = self.report_id.simple().to_string();
        format!(
            "mission_report_{}_{}.json",
            self.generated_at.format("%Y%m%d_%H%M%S"),
            &id[..8]
        )
    }
}

/// Write `report` into `dir`, returning the file path
pub fn save_report(report: &MissionReport, dir: &Path) -> MissionResult<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(report.file_name());
    fs::write(&path, serde_json::to_vec_pretty(report)?)?;

    log::info!("Mission report written to {}", path.display());
    Ok(path)
}

pub fn load_report(path: &Path) -> MissionResult<MissionReport> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::config::MissionConfig;
    use crate::logic::model::ScorerConfig;
    use crate::logic::session::MissionSession;
    use crate::logic::telemetry::{Channel, FailureInjection, GeneratorConfig};
    use tempfile::tempdir;

    #[test]
    fn test_report_written_and_readable() {
        let session = MissionSession::new(MissionConfig {
            scorer: ScorerConfig::deviation(),
            ..Default::default()
        })
        .unwrap();

        let stream = GeneratorConfig::constant(30, [90.0, 35.0, 85.0, 35.0])
            .with_injection(FailureInjection::override_channel(8, Channel::SignalStrength, 20.0));
        let comparison = session.compare(&stream).unwrap();
        let report = MissionReport::new(&session.scorer(), comparison, session.get_actions_taken());

        let dir = tempdir().unwrap();
        let path = save_report(&report, &dir.path().join("reports")).unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("mission_report_"));

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.app, APP_NAME);
        assert_eq!(loaded.scorer.method, "baseline_deviation");
        assert_eq!(loaded.comparison.autonomous.interventions.len(), 1);
        assert_eq!(loaded.actions_taken.len(), report.actions_taken.len());
        assert_eq!(loaded.report_id, report.report_id);
    }

    #[test]
    fn test_reports_in_same_second_do_not_collide() {
        let session = MissionSession::new(MissionConfig {
            scorer: ScorerConfig::deviation(),
            ..Default::default()
        })
        .unwrap();
        let comparison = session
            .compare(&GeneratorConfig::constant(10, [90.0, 35.0, 85.0, 35.0]))
            .unwrap();

        let first = MissionReport::new(&session.scorer(), comparison.clone(), Vec::new());
        let mut second = MissionReport::new(&session.scorer(), comparison, Vec::new());
        second.generated_at = first.generated_at;

        let dir = tempdir().unwrap();
        let a = save_report(&first, dir.path()).unwrap();
        let b = save_report(&second, dir.path()).unwrap();
        assert_ne!(a, b);
        assert_eq!(load_report(&a).unwrap().report_id, first.report_id);
        assert_eq!(load_report(&b).unwrap().report_id, second.report_id);
    }
}
