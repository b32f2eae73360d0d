//! Mission state machine
//!
//! `NOMINAL → ANOMALOUS → (RECOVERING | LOST)`, RECOVERING → NOMINAL.

use super::types::{MissionState, StateTransition};

#[derive(Debug, Clone)]
pub struct StateTracker {
    state: MissionState,
    transitions: Vec<StateTransition>,
    anomaly_step: Option<usize>,
    recovering_step: Option<usize>,
    lost_step: Option<usize>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            state: MissionState::Nominal,
            transitions: Vec::new(),
            anomaly_step: None,
            recovering_step: None,
            lost_step: None,
        }
    }
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn is(&self, state: MissionState) -> bool {
        self.state == state
    }

    /// Move to `to`. Returns false (and changes nothing) for a self-loop or
    /// an edge the machine does not have.
    pub fn transition(&mut self, step: usize, to: MissionState, reason: impl Into<String>) -> bool {
        if self.state == to || !self.state.can_transition_to(to) {
            return false;
        }

        let reason = reason.into();
        log::info!("[Harness] step {}: {} -> {} ({})", step, self.state, to, reason);

        match to {
            MissionState::Anomalous => {
                self.anomaly_step.get_or_insert(step);
            }
            MissionState::Recovering => {
                self.recovering_step.get_or_insert(step);
            }
            MissionState::Lost => self.lost_step = Some(step),
            MissionState::Nominal => {}
        }

        self.transitions.push(StateTransition {
            step,
            from: self.state,
            to,
            reason,
        });
        self.state = to;
        true
    }

    /// First step ANOMALOUS was entered
    pub fn anomaly_step(&self) -> Option<usize> {
        self.anomaly_step
    }

    /// First step RECOVERING was entered
    pub fn recovering_step(&self) -> Option<usize> {
        self.recovering_step
    }

    pub fn lost_step(&self) -> Option<usize> {
        self.lost_step
    }

    pub fn into_transitions(self) -> Vec<StateTransition> {
        self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut tracker = StateTracker::new();
        assert!(tracker.transition(10, MissionState::Anomalous, "power"));
        assert!(tracker.transition(15, MissionState::Recovering, "applied"));
        assert!(tracker.transition(40, MissionState::Nominal, "in bounds"));

        assert_eq!(tracker.anomaly_step(), Some(10));
        assert_eq!(tracker.recovering_step(), Some(15));
        assert_eq!(tracker.into_transitions().len(), 3);
    }

    #[test]
    fn test_rejects_missing_edges() {
        let mut tracker = StateTracker::new();
        assert!(!tracker.transition(1, MissionState::Recovering, "skip"));
        assert!(!tracker.transition(1, MissionState::Nominal, "self"));
        assert!(tracker.is(MissionState::Nominal));
    }

    #[test]
    fn test_lost_is_terminal() {
        let mut tracker = StateTracker::new();
        assert!(tracker.transition(3, MissionState::Lost, "breach"));
        assert!(!tracker.transition(4, MissionState::Nominal, "revive"));
        assert_eq!(tracker.lost_step(), Some(3));
        assert!(tracker.state().is_terminal());
    }

    #[test]
    fn test_first_markers_are_kept() {
        let mut tracker = StateTracker::new();
        tracker.transition(5, MissionState::Anomalous, "a");
        tracker.transition(6, MissionState::Nominal, "transient");
        tracker.transition(9, MissionState::Anomalous, "b");
        assert_eq!(tracker.anomaly_step(), Some(5));
    }
}
