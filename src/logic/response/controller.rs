//! Response Controller
//!
//! Decision only: no effects are applied here.

use crate::logic::diagnosis::Diagnosis;
use super::types::{Action, ActionLogEntry};

/// Total lookup: every diagnosis maps to exactly one action
pub fn respond(diagnosis: Diagnosis) -> Action {
    match diagnosis {
        Diagnosis::Power => Action::NonCriticalShutdown,
        Diagnosis::Thermal => Action::CoolingActivation,
        Diagnosis::Communication => Action::BackupChannelSwitch,
        Diagnosis::None => Action::NoOp,
    }
}

/// Run-scoped controller that records every decision
#[derive(Debug, Clone, Default)]
pub struct ResponseController {
    log: Vec<ActionLogEntry>,
}

impl ResponseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, step: usize, diagnosis: Diagnosis) -> Action {
        let action = respond(diagnosis);
        self.log.push(ActionLogEntry {
            step,
            diagnosis,
            action,
        });

        if !action.is_noop() {
            log::debug!("[Controller] step {}: {} -> {}", step, diagnosis, action);
        }
        action
    }

    pub fn action_log(&self) -> &[ActionLogEntry] {
        &self.log
    }

    pub fn into_log(self) -> Vec<ActionLogEntry> {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table() {
        assert_eq!(respond(Diagnosis::Power), Action::NonCriticalShutdown);
        assert_eq!(respond(Diagnosis::Thermal), Action::CoolingActivation);
        assert_eq!(respond(Diagnosis::Communication), Action::BackupChannelSwitch);
        assert_eq!(respond(Diagnosis::None), Action::NoOp);
    }

    #[test]
    fn test_action_targets_diagnosed_channel() {
        for d in Diagnosis::PRIORITY {
            assert_eq!(respond(d).target_channel(), d.channel());
        }
    }

    #[test]
    fn test_controller_logs_every_decision() {
        let mut controller = ResponseController::new();
        controller.respond(3, Diagnosis::None);
        controller.respond(4, Diagnosis::Thermal);
        controller.respond(5, Diagnosis::None);

        let log: Vec<_> = controller.action_log().iter().map(|e| e.as_tuple()).collect();
        assert_eq!(
            log,
            vec![
                (3, Diagnosis::None, Action::NoOp),
                (4, Diagnosis::Thermal, Action::CoolingActivation),
                (5, Diagnosis::None, Action::NoOp),
            ]
        );
        assert_eq!(controller.into_log().len(), 3);
    }
}
