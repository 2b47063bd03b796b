//! The per-session decision log.

use paradox_rules::{decision, Decision, GameState, RulesError};
use serde::{Deserialize, Serialize};

/// One accepted decision, recorded after it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The turn on which the decision was made (1-based).
    pub turn: u32,
    pub decision_index: usize,
    pub cost: i64,
    /// State immediately after the decision was applied.
    pub snapshot: GameState,
}

impl HistoryEntry {
    /// The catalog entry this record refers to. Fails for hand-built entries naming no decision.
    pub fn decision(&self) -> Result<&'static Decision, RulesError> {
        decision(self.decision_index)
    }

    pub fn label(&self) -> Option<&'static str> {
        self.decision().ok().map(|d| d.label)
    }

    pub fn message(&self) -> Option<&'static str> {
        self.decision().ok().map(|d| d.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paradox_rules::INITIAL_STATE;

    #[test]
    fn test_unknown_decision_has_no_label() {
        let entry = HistoryEntry {
            turn: 1,
            decision_index: 42,
            cost: 0,
            snapshot: INITIAL_STATE,
        };

        assert_eq!(
            entry.decision(),
            Err(RulesError::UnknownDecision { index: 42, len: 4 })
        );
        assert_eq!(entry.label(), None);
        assert_eq!(entry.message(), None);
    }
}
