//! Engine events - what a session publishes to its observers.
//!
//! Every payload is an owned value. Subscribers never see a live reference
//! into the session that produced the event.

mod bus;

pub use bus::*;

use paradox_rules::{GameState, MetricDelta, TerminationReason};
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// An event emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A session began or was reset.
    Started {
        session_id: SessionId,
        initial_state: GameState,
        max_turns: u32,
    },

    /// A decision was accepted and applied.
    DecisionApplied {
        session_id: SessionId,
        /// The turn that was just completed.
        turn: u32,
        decision_index: usize,
        cost: i64,
        effects: Vec<MetricDelta>,
        post_state: GameState,
    },

    /// The session reached a terminal state.
    Ended {
        session_id: SessionId,
        /// The session's turn counter when the game ended.
        turn: u32,
        reason: TerminationReason,
        final_state: GameState,
        history_length: usize,
    },
}

impl EngineEvent {
    /// The serialized `kind` tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::Started { .. } => "started",
            EngineEvent::DecisionApplied { .. } => "decision_applied",
            EngineEvent::Ended { .. } => "ended",
        }
    }

    /// The session that emitted this event.
    pub fn session_id(&self) -> SessionId {
        match self {
            EngineEvent::Started { session_id, .. }
            | EngineEvent::DecisionApplied { session_id, .. }
            | EngineEvent::Ended { session_id, .. } => *session_id,
        }
    }
}
