//! Session - a live game progressing turn by turn until it terminates.
//!
//! A session owns its state, turn counter, history log, and event bus. It is
//! single-threaded: every operation runs to completion before returning, and
//! observers are notified inline.

mod history;

pub use history::*;

use paradox_rules::{
    apply_decision, can_afford, check_termination, decision, GameState, Termination,
    TerminationReason, DECISIONS, INITIAL_STATE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventBus, EventSubscriber, SubscriberId};

/// Identifier of one play-through. Refreshed on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Running,
    Over(TerminationReason),
}

/// A copy of everything a presenter needs to render the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    /// The turn about to be played (1-based).
    pub turn: u32,
    pub max_turns: u32,
    pub game_over: bool,
    pub reason: Option<TerminationReason>,
    pub history_length: usize,
}

/// Everything needed to rebuild a session: its snapshot plus its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub snapshot: SessionSnapshot,
    pub history: Vec<HistoryEntry>,
}

/// Why a submission was refused without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    /// The session has already terminated.
    Over,
    /// The decision costs more than the remaining budget.
    Unaffordable,
}

/// Result of a well-formed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Accepted {
        state: GameState,
        terminated: bool,
        reason: Option<TerminationReason>,
    },
    Rejected(Rejection),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// A live game.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    max_turns: u32,
    state: GameState,
    turn: u32,
    history: Vec<HistoryEntry>,
    phase: SessionPhase,
    bus: EventBus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the catalog's turn cap.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a session from configuration. No event is emitted since nobody is subscribed yet.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            id: SessionId::new(),
            max_turns: config.max_turns,
            state: INITIAL_STATE,
            turn: 1,
            history: Vec::new(),
            phase: SessionPhase::Running,
            bus: EventBus::new(),
        }
    }

    /// Create a session, register `subscribers` in order, and announce the start to them.
    pub fn with_subscribers(
        config: &EngineConfig,
        subscribers: impl IntoIterator<Item = Box<dyn EventSubscriber>>,
    ) -> Self {
        let mut session = Self::with_config(config);
        for subscriber in subscribers {
            session.add_subscriber(subscriber);
        }
        session.announce_start();
        session
    }

    /// Rebuild a session from a saved record.
    ///
    /// The record must be internally consistent: metrics in range, history turns
    /// numbered from 1, the snapshot's turn one past the last entry, and the
    /// recorded ending matching what the rules say about the saved state.
    /// Subscribers are not carried over and no event is emitted.
    pub fn restore(record: SessionRecord) -> Result<Self, EngineError> {
        let SessionRecord { snapshot, history } = record;
        let invalid = |msg: String| Err(EngineError::InvalidRecord(msg));

        if snapshot.max_turns == 0 {
            return invalid("max_turns must be at least 1".into());
        }
        if !snapshot.state.metrics_in_bounds() {
            return invalid(format!("metrics out of range: {:?}", snapshot.state));
        }
        if snapshot.state.budget < 0 {
            return invalid(format!("negative budget: {}", snapshot.state.budget));
        }
        if snapshot.history_length != history.len() {
            return invalid(format!(
                "history_length {} does not match {} history entries",
                snapshot.history_length,
                history.len()
            ));
        }
        if snapshot.turn as usize != history.len() + 1 {
            return invalid(format!(
                "turn {} does not follow {} history entries",
                snapshot.turn,
                history.len()
            ));
        }
        for (i, entry) in history.iter().enumerate() {
            if entry.turn as usize != i + 1 {
                return invalid(format!("history entry {} has turn {}", i, entry.turn));
            }
            let chosen = match entry.decision() {
                Ok(chosen) => chosen,
                Err(err) => return invalid(format!("history entry {}: {}", i, err)),
            };
            if entry.cost != chosen.cost {
                return invalid(format!(
                    "history entry {} records cost {} for '{}' which costs {}",
                    i, entry.cost, chosen.label, chosen.cost
                ));
            }
            if entry.snapshot.budget < 0 || !entry.snapshot.metrics_in_bounds() {
                return invalid(format!("history entry {} has an out-of-range snapshot", i));
            }
        }
        if let Some(last) = history.last() {
            if last.snapshot != snapshot.state {
                return invalid("state does not match the last history snapshot".into());
            }
        }

        let reason = check_termination(&snapshot.state, snapshot.turn, snapshot.max_turns).reason();
        if reason != snapshot.reason || snapshot.game_over != reason.is_some() {
            return invalid(format!(
                "recorded ending {:?} does not match rules ending {:?}",
                snapshot.reason, reason
            ));
        }

        Ok(Self {
            id: SessionId::new(),
            max_turns: snapshot.max_turns,
            state: snapshot.state,
            turn: snapshot.turn,
            history,
            phase: reason.map_or(SessionPhase::Running, SessionPhase::Over),
            bus: EventBus::new(),
        })
    }

    /// Copy out the snapshot and history for saving.
    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            snapshot: self.current_state(),
            history: self.history.clone(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Over(_))
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// The decision log since the last reset, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_state(&self) -> SessionSnapshot {
        let reason = match self.phase {
            SessionPhase::Running => None,
            SessionPhase::Over(reason) => Some(reason),
        };
        SessionSnapshot {
            state: self.state,
            turn: self.turn,
            max_turns: self.max_turns,
            game_over: reason.is_some(),
            reason,
            history_length: self.history.len(),
        }
    }

    /// Catalog indices the current budget can pay for. Empty once the game is over.
    pub fn affordable_decisions(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }
        DECISIONS
            .iter()
            .enumerate()
            .filter(|(_, d)| can_afford(self.state.budget, d.cost))
            .map(|(i, _)| i)
            .collect()
    }

    /// Play a decision.
    ///
    /// Either the decision applies in full (state, history, turn, termination, events)
    /// or nothing changes. Out-of-range indices are an error; game-over and
    /// unaffordable submissions are reported as rejections.
    pub fn submit(&mut self, decision_index: usize) -> Result<SubmitOutcome, EngineError> {
        let chosen = decision(decision_index).map_err(|_| EngineError::InvalidInput {
            index: decision_index,
            len: DECISIONS.len(),
        })?;

        if self.is_over() {
            debug!(session = %self.id, decision_index, "Submission rejected: game over");
            return Ok(SubmitOutcome::Rejected(Rejection::Over));
        }
        if !can_afford(self.state.budget, chosen.cost) {
            debug!(
                session = %self.id,
                decision_index,
                budget = self.state.budget,
                cost = chosen.cost,
                "Submission rejected: unaffordable"
            );
            return Ok(SubmitOutcome::Rejected(Rejection::Unaffordable));
        }

        let completed_turn = self.turn;
        self.state = apply_decision(&self.state, chosen);
        self.history.push(HistoryEntry {
            turn: completed_turn,
            decision_index,
            cost: chosen.cost,
            snapshot: self.state,
        });
        self.turn += 1;

        let termination = check_termination(&self.state, self.turn, self.max_turns);
        if let Termination::Over(reason) = termination {
            self.phase = SessionPhase::Over(reason);
        }

        debug!(
            session = %self.id,
            turn = completed_turn,
            decision = chosen.label,
            social = self.state.social,
            economic = self.state.economic,
            ecology = self.state.ecology,
            budget = self.state.budget,
            "Decision applied"
        );

        self.bus.emit(&EngineEvent::DecisionApplied {
            session_id: self.id,
            turn: completed_turn,
            decision_index,
            cost: chosen.cost,
            effects: chosen.effects.to_vec(),
            post_state: self.state,
        });

        if let Termination::Over(reason) = termination {
            info!(session = %self.id, turn = self.turn, %reason, "Session ended");
            self.bus.emit(&EngineEvent::Ended {
                session_id: self.id,
                turn: self.turn,
                reason,
                final_state: self.state,
                history_length: self.history.len(),
            });
        }

        Ok(SubmitOutcome::Accepted {
            state: self.state,
            terminated: termination.is_over(),
            reason: termination.reason(),
        })
    }

    /// Start over from the initial state. Subscribers are kept.
    pub fn reset(&mut self) {
        self.id = SessionId::new();
        self.state = INITIAL_STATE;
        self.turn = 1;
        self.history.clear();
        self.phase = SessionPhase::Running;
        self.announce_start();
    }

    pub fn add_subscriber(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriberId {
        self.bus.add_subscriber(subscriber)
    }

    pub fn remove_subscriber(&mut self, id: SubscriberId) -> bool {
        self.bus.remove_subscriber(id)
    }

    fn announce_start(&mut self) {
        info!(session = %self.id, max_turns = self.max_turns, "Session started");
        self.bus.emit(&EngineEvent::Started {
            session_id: self.id,
            initial_state: INITIAL_STATE,
            max_turns: self.max_turns,
        });
    }
}
