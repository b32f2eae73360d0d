//! Mission Session
//!
//! Owns a trained scorer and the mission config. Each run gets a fresh
//! harness state; only the scorer is shared between runs. The last run's
//! action log and a bounded run history are kept behind `RwLock`s so the
//! session can be driven from any thread.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use super::config::MissionConfig;
use super::diagnosis::Diagnosis;
use super::error::MissionResult;
use super::harness::{ComparisonHarness, ComparisonReport, ResponseMode, RunResult};
use super::model::{save_snapshot, AnomalyScorer};
use super::response::{Action, ActionLogEntry};
use super::telemetry::{generate, GeneratorConfig, Stream};

const MAX_HISTORY: usize = 100;

pub struct MissionSession {
    config: MissionConfig,
    scorer: Arc<AnomalyScorer>,
    last_action_log: RwLock<Vec<ActionLogEntry>>,
    history: RwLock<Vec<RunResult>>,
}

impl MissionSession {
    /// Validate the config and fit the scorer on the training stream
    pub fn new(config: MissionConfig) -> MissionResult<Self> {
        config.validate()?;

        let training = generate(&config.training);
        log::info!(
            "Training {} scorer on {} nominal readings",
            config.scorer.model.as_str(),
            training.len()
        );
        let scorer = config.scorer.train(training.as_slice())?;

        Ok(Self::build(config, Arc::new(scorer)))
    }

    /// Session around an already trained (e.g. snapshot-loaded) scorer
    pub fn with_scorer(config: MissionConfig, scorer: Arc<AnomalyScorer>) -> MissionResult<Self> {
        config.validate()?;
        Ok(Self::build(config, scorer))
    }

    fn build(config: MissionConfig, scorer: Arc<AnomalyScorer>) -> Self {
        Self {
            config,
            scorer,
            last_action_log: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn scorer(&self) -> Arc<AnomalyScorer> {
        Arc::clone(&self.scorer)
    }

    fn harness(&self) -> ComparisonHarness {
        ComparisonHarness::new(Arc::clone(&self.scorer), self.config.harness.clone())
            .with_thresholds(self.config.diagnosis.clone())
    }

    // ========================================================================
    // RUNS
    // ========================================================================

    /// Generate a stream from `stream_config` and run it in `mode`
    pub fn run(&self, stream_config: &GeneratorConfig, mode: ResponseMode) -> MissionResult<RunResult> {
        stream_config.validate()?;
        let stream = generate(stream_config);
        self.run_stream(&stream, mode)
    }

    pub fn run_stream(&self, stream: &Stream, mode: ResponseMode) -> MissionResult<RunResult> {
        let outcome = self.harness().run(stream, mode)?;
        self.record(&outcome.result, outcome.action_log);
        Ok(outcome.result)
    }

    /// Both modes on one generated stream. The action log afterwards is
    /// the human run's.
    pub fn compare(&self, stream_config: &GeneratorConfig) -> MissionResult<ComparisonReport> {
        stream_config.validate()?;
        let stream = generate(stream_config);

        let outcome = self.harness().compare(&stream)?;
        self.record(&outcome.report.autonomous, outcome.autonomous_log);
        self.record(&outcome.report.human, outcome.human_log);
        Ok(outcome.report)
    }

    fn record(&self, result: &RunResult, action_log: Vec<ActionLogEntry>) {
        *self.last_action_log.write() = action_log;

        let mut history = self.history.write();
        history.push(result.clone());
        if history.len() > MAX_HISTORY {
            let excess = history.len() - MAX_HISTORY;
            history.drain(0..excess);
        }
    }

    /// Compare on the configured mission stream
    pub fn run_mission(&self) -> MissionResult<ComparisonReport> {
        self.compare(&self.config.mission)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// `(step, diagnosis, action)` for every step of the last run
    pub fn get_action_log(&self) -> Vec<(usize, Diagnosis, Action)> {
        self.last_action_log.read().iter().map(|e| e.as_tuple()).collect()
    }

    /// Steps of the last run where an action other than no-op was chosen
    pub fn get_actions_taken(&self) -> Vec<ActionLogEntry> {
        self.last_action_log
            .read()
            .iter()
            .filter(|e| !e.action.is_noop())
            .copied()
            .collect()
    }

    /// Past runs, oldest first
    pub fn history(&self) -> Vec<RunResult> {
        self.history.read().clone()
    }

    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    pub fn save_scorer(&self, path: &Path) -> MissionResult<()> {
        save_snapshot(&self.scorer, path)
    }
}
