//! Harness Types
//!
//! Run modes, mission states and the results a run produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::diagnosis::Diagnosis;
use crate::logic::response::{Action, ActionLogEntry};
use crate::logic::telemetry::{Channel, Reading};

// ============================================================================
// MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Action applied after the configured reaction delay
    Human,
    /// Action applied at the step the anomaly is diagnosed
    Autonomous,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Human => "human",
            ResponseMode::Autonomous => "autonomous",
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionState {
    Nominal,
    Anomalous,
    Recovering,
    /// Terminal
    Lost,
}

impl MissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionState::Nominal => "NOMINAL",
            MissionState::Anomalous => "ANOMALOUS",
            MissionState::Recovering => "RECOVERING",
            MissionState::Lost => "LOST",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionState::Lost)
    }

    /// Edges of the mission state machine
    pub fn can_transition_to(&self, next: MissionState) -> bool {
        use MissionState::*;
        match (self, next) {
            (Lost, _) => false,
            (_, Lost) => true,
            (Nominal, Anomalous) => true,
            (Anomalous, Nominal) | (Anomalous, Recovering) => true,
            (Recovering, Nominal) | (Recovering, Anomalous) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub step: usize,
    pub from: MissionState,
    pub to: MissionState,
    pub reason: String,
}

// ============================================================================
// INTERVENTION
// ============================================================================

/// An action that actually took effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub detected_step: usize,
    pub applied_step: usize,
    pub diagnosis: Diagnosis,
    pub action: Action,
}

impl Intervention {
    pub fn delay(&self) -> usize {
        self.applied_step.saturating_sub(self.detected_step)
    }
}

// ============================================================================
// RUN RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub mode: ResponseMode,
    pub started_at: DateTime<Utc>,
    /// Terminal state of the run
    pub state: MissionState,
    pub steps_total: usize,
    /// Shorter than `steps_total` when the mission was lost
    pub steps_run: usize,
    pub final_reading: Reading,
    pub final_battery: f64,
    /// Steps with any channel outside nominal bounds
    pub stability_duration: usize,
    pub survival_score: f64,
    pub total_damage: f64,
    pub anomaly_step: Option<usize>,
    pub recovering_step: Option<usize>,
    pub lost_step: Option<usize>,
    pub lost_channel: Option<Channel>,
    pub interventions: Vec<Intervention>,
    pub transitions: Vec<StateTransition>,
}

impl RunResult {
    pub fn is_lost(&self) -> bool {
        self.state == MissionState::Lost
    }

    /// Step the first action took effect
    pub fn first_applied_step(&self) -> Option<usize> {
        self.interventions.first().map(|i| i.applied_step)
    }
}

/// A run plus the controller's decision log
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub result: RunResult,
    pub action_log: Vec<ActionLogEntry>,
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Both runs of a comparison with their decision logs
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub report: ComparisonReport,
    pub autonomous_log: Vec<ActionLogEntry>,
    pub human_log: Vec<ActionLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub autonomous: RunResult,
    pub human: RunResult,
    /// autonomous survival − human survival
    pub impact: f64,
    /// human damage − autonomous damage
    pub damage_avoided: f64,
}

impl ComparisonReport {
    pub fn new(autonomous: RunResult, human: RunResult) -> Self {
        let impact = autonomous.survival_score - human.survival_score;
        let damage_avoided = human.total_damage - autonomous.total_damage;
        Self {
            autonomous,
            human,
            impact,
            damage_avoided,
        }
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for result in [&self.autonomous, &self.human] {
            lines.push(format!(
                "{:<10} trigger={} state={} battery={:.1}% unstable={} damage={:.2} survival={:.2}",
                result.mode.as_str(),
                result
                    .first_applied_step()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                result.state,
                result.final_battery,
                result.stability_duration,
                result.total_damage,
                result.survival_score
            ));
        }
        lines.push(format!(
            "impact: {:+.2} survival, {:.2} damage avoided",
            self.impact, self.damage_avoided
        ));
        lines
    }
}
