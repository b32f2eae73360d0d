//! Comparison Harness
//!
//! Replays one stream through scorer → mapper → controller under a response
//! mode. Per step:
//! 1. live reading = recorded reading + dynamics offsets
//! 2. catastrophic bounds → LOST, run ends
//! 3. RECOVERING and back in bounds → NOMINAL
//! 4. score, diagnose, respond (logged)
//! 5. schedule an action for a newly diagnosed channel → ANOMALOUS
//! 6. transient anomaly that cleared before its action → NOMINAL
//! 7. apply due actions → RECOVERING
//! 8. stability / damage bookkeeping, then advance the dynamics

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::logic::diagnosis::{diagnose_with_thresholds, Diagnosis, DiagnosticThresholds};
use crate::logic::error::{MissionError, MissionResult};
use crate::logic::model::AnomalyScorer;
use crate::logic::response::{Action, ResponseController};
use crate::logic::telemetry::{Reading, Stream};
use super::config::HarnessConfig;
use super::dynamics::ChannelDynamics;
use super::metrics::{mission_damage, survival_score};
use super::state::StateTracker;
use super::types::{
    ComparisonOutcome, ComparisonReport, Intervention, MissionState, ResponseMode, RunOutcome,
    RunResult,
};

/// Action waiting for its apply step
#[derive(Debug, Clone, Copy)]
struct PendingAction {
    detected_step: usize,
    apply_at: usize,
    diagnosis: Diagnosis,
    action: Action,
}

pub struct ComparisonHarness {
    scorer: Arc<AnomalyScorer>,
    thresholds: DiagnosticThresholds,
    config: HarnessConfig,
}

impl ComparisonHarness {
    pub fn new(scorer: Arc<AnomalyScorer>, config: HarnessConfig) -> Self {
        Self {
            scorer,
            thresholds: DiagnosticThresholds::default(),
            config,
        }
    }

    pub fn with_thresholds(mut self, thresholds: DiagnosticThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &DiagnosticThresholds {
        &self.thresholds
    }

    pub fn validate(&self) -> MissionResult<()> {
        self.config.validate()?;
        self.thresholds.validate()
    }

    /// Run both modes on the same stream
    pub fn compare(&self, stream: &Stream) -> MissionResult<ComparisonOutcome> {
        let autonomous = self.run(stream, ResponseMode::Autonomous)?;
        let human = self.run(stream, ResponseMode::Human)?;

        let report = ComparisonReport::new(autonomous.result, human.result);
        log::info!(
            "[Harness] comparison done: impact {:+.2} survival, {:.2} damage avoided",
            report.impact,
            report.damage_avoided
        );
        Ok(ComparisonOutcome {
            report,
            autonomous_log: autonomous.action_log,
            human_log: human.action_log,
        })
    }

    pub fn run(&self, stream: &Stream, mode: ResponseMode) -> MissionResult<RunOutcome> {
        self.validate()?;
        if stream.is_empty() {
            return Err(MissionError::EmptyStream);
        }

        let config = &self.config;
        let delay = config.delay_for(mode);
        let started_at = Utc::now();

        log::info!(
            "[Harness] {} run: {} steps, delay {} steps, scorer {}",
            mode,
            stream.len(),
            delay,
            self.scorer.method()
        );

        let mut tracker = StateTracker::new();
        let mut dynamics = ChannelDynamics::new();
        let mut controller = ResponseController::new();
        let mut pending: Vec<PendingAction> = Vec::new();
        let mut interventions: Vec<Intervention> = Vec::new();
        let mut lost_channel = None;
        let mut out_of_bounds = 0usize;
        let mut total_damage = 0.0;
        let mut steps_run = 0usize;
        let mut final_reading: Option<Reading> = None;

        for recorded in stream {
            let step = recorded.step();
            let live = dynamics.live(recorded);
            steps_run += 1;
            final_reading = Some(live);

            let in_bounds = config.nominal.contains(&live);

            if let Some(channel) = config.catastrophic.breach(&live) {
                tracker.transition(step, MissionState::Lost, format!("{} breached catastrophic bound", channel));
                lost_channel = Some(channel);
                if !in_bounds {
                    out_of_bounds += 1;
                }
                total_damage += mission_damage(&live);
                break;
            }

            if tracker.is(MissionState::Recovering) && in_bounds {
                tracker.transition(step, MissionState::Nominal, "all channels back in bounds");
            }

            let score = self.scorer.score(&live)?;
            let diagnosis = diagnose_with_thresholds(&live, score.is_anomaly, &self.thresholds);
            let action = controller.respond(step, diagnosis);

            log::debug!(
                "[Harness] step {} score={:.3} flagged={} diagnosis={} action={}",
                step,
                score.score,
                score.is_anomaly,
                diagnosis,
                action
            );

            // New subsystem problem: schedule its action
            if let Some(channel) = diagnosis.channel() {
                let already_handled = dynamics.is_mitigated(channel)
                    || pending.iter().any(|p| p.diagnosis == diagnosis);
                if !already_handled {
                    pending.push(PendingAction {
                        detected_step: step,
                        // Saturates: an unreachable apply step is never applied
                        apply_at: step.saturating_add(delay),
                        diagnosis,
                        action,
                    });
                    tracker.transition(step, MissionState::Anomalous, format!("{} anomaly", diagnosis));
                }
            }

            // Transient: cleared before any action took effect
            if tracker.is(MissionState::Anomalous) && !score.is_anomaly && in_bounds {
                pending.clear();
                tracker.transition(step, MissionState::Nominal, "anomaly cleared before action");
            }

            let (due, waiting): (Vec<PendingAction>, Vec<PendingAction>) =
                pending.into_iter().partition(|p| p.apply_at <= step);
            pending = waiting;

            for p in due {
                if let Some(effect) = config.recovery.effect(p.action) {
                    dynamics.apply_one_shot(&effect.one_shot);
                    dynamics.mitigate(effect.target, effect.rate);
                }
                log::info!(
                    "[Harness] step {}: {} applied ({} detected at step {})",
                    step,
                    p.action,
                    p.diagnosis,
                    p.detected_step
                );
                interventions.push(Intervention {
                    detected_step: p.detected_step,
                    applied_step: step,
                    diagnosis: p.diagnosis,
                    action: p.action,
                });
            }

            if pending.is_empty() && tracker.is(MissionState::Anomalous) {
                tracker.transition(step, MissionState::Recovering, "action in effect");
            }

            if !in_bounds {
                out_of_bounds += 1;
            }
            total_damage += mission_damage(&live);

            dynamics.advance(&live, tracker.state(), config);
        }

        // Non-empty stream: at least one step ran
        let final_reading = final_reading.ok_or(MissionError::EmptyStream)?;
        let state = tracker.state();
        let survival = if state.is_terminal() {
            0.0
        } else {
            survival_score(
                final_reading.battery_level(),
                out_of_bounds,
                steps_run,
                &config.survival,
            )
        };

        let result = RunResult {
            run_id: Uuid::new_v4(),
            mode,
            started_at,
            state,
            steps_total: stream.len(),
            steps_run,
            final_reading,
            final_battery: final_reading.battery_level(),
            stability_duration: out_of_bounds,
            survival_score: survival,
            total_damage,
            anomaly_step: tracker.anomaly_step(),
            recovering_step: tracker.recovering_step(),
            lost_step: tracker.lost_step(),
            lost_channel,
            interventions,
            transitions: tracker.into_transitions(),
        };

        log::info!(
            "[Harness] {} run finished: state={} battery={:.1}% unstable={} damage={:.2} survival={:.2}",
            mode,
            result.state,
            result.final_battery,
            result.stability_duration,
            result.total_damage,
            result.survival_score
        );

        Ok(RunOutcome {
            result,
            action_log: controller.into_log(),
        })
    }
}
