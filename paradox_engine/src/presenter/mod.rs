//! Presenter contract - the capability set any UI drives, and the projections it renders.
//!
//! A presenter treats its UI as a projection of the engine: after every call it
//! asks for the current state again and rebuilds its view from the catalog.
//! Nothing here caches decision labels, costs, or effects between renders.

mod text;

pub use text::*;

use paradox_rules::{
    end_message, GameState, Metric, MetricDelta, MetricLevel, TerminationReason, CODA,
    DECISIONS, INITIAL_STATE,
};
use serde::Serialize;

use crate::error::EngineError;
use crate::events::{EventSubscriber, SubscriberId};
use crate::session::{Session, SessionSnapshot, SubmitOutcome};

/// What a presenter may ask of the engine.
pub trait DecisionEngine {
    fn current_state(&self) -> SessionSnapshot;

    fn affordable_decisions(&self) -> Vec<usize>;

    fn submit(&mut self, decision_index: usize) -> Result<SubmitOutcome, EngineError>;

    fn reset(&mut self);

    fn add_subscriber(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriberId;

    fn remove_subscriber(&mut self, id: SubscriberId) -> bool;
}

impl DecisionEngine for Session {
    fn current_state(&self) -> SessionSnapshot {
        Session::current_state(self)
    }

    fn affordable_decisions(&self) -> Vec<usize> {
        Session::affordable_decisions(self)
    }

    fn submit(&mut self, decision_index: usize) -> Result<SubmitOutcome, EngineError> {
        Session::submit(self, decision_index)
    }

    fn reset(&mut self) {
        Session::reset(self)
    }

    fn add_subscriber(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriberId {
        Session::add_subscriber(self, subscriber)
    }

    fn remove_subscriber(&mut self, id: SubscriberId) -> bool {
        Session::remove_subscriber(self, id)
    }
}

/// One decision card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionView {
    pub index: usize,
    pub label: &'static str,
    pub cost: i64,
    pub description: &'static str,
    pub effects: Vec<MetricDelta>,
    /// False when the budget cannot cover the cost or the game is over.
    pub affordable: bool,
}

/// One metric bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricView {
    pub metric: Metric,
    pub label: &'static str,
    pub value: i32,
    pub level: MetricLevel,
}

/// The budget display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetView {
    pub remaining: i64,
    /// Remaining budget as a share of the starting budget, floored at zero.
    pub percent: i64,
    pub low: bool,
}

/// Final results, present only once the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndingView {
    pub reason: TerminationReason,
    pub message: &'static str,
    pub coda: &'static [&'static str],
}

/// Everything needed to draw the game board for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub turn: u32,
    pub max_turns: u32,
    pub metrics: Vec<MetricView>,
    pub budget: BudgetView,
    pub decisions: Vec<DecisionView>,
    pub ending: Option<EndingView>,
}

impl BoardView {
    /// Build a fresh projection from the engine and the catalog.
    pub fn project(engine: &impl DecisionEngine) -> Self {
        let snapshot = engine.current_state();
        let affordable = engine.affordable_decisions();

        let decisions = DECISIONS
            .iter()
            .enumerate()
            .map(|(index, d)| DecisionView {
                index,
                label: d.label,
                cost: d.cost,
                description: d.description,
                effects: d.effects.to_vec(),
                affordable: affordable.contains(&index),
            })
            .collect();

        Self {
            turn: snapshot.turn,
            max_turns: snapshot.max_turns,
            metrics: metric_views(&snapshot.state),
            budget: budget_view(&snapshot.state),
            decisions,
            ending: snapshot.reason.map(|reason| EndingView {
                reason,
                message: end_message(Some(reason)),
                coda: &CODA,
            }),
        }
    }

    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }
}

fn metric_views(state: &GameState) -> Vec<MetricView> {
    state
        .metrics()
        .map(|(metric, value)| MetricView {
            metric,
            label: metric.label(),
            value,
            level: MetricLevel::of(value),
        })
        .collect()
}

fn budget_view(state: &GameState) -> BudgetView {
    BudgetView {
        remaining: state.budget,
        percent: (state.budget * 100 / INITIAL_STATE.budget).max(0),
        low: state.is_budget_low(),
    }
}
