//! Content catalog - the immutable constants every session is seeded from.
//!
//! The numbers and strings here are part of the game's contract. Presenters read
//! labels, costs, and effects from this module on every render instead of caching them.

use serde::Serialize;

use crate::error::RulesError;
use crate::metrics::{GameState, Metric, MetricDelta};

/// State every new or reset session starts from.
pub const INITIAL_STATE: GameState = GameState::new(100, 100, 100, 81_800);

/// Turns available before the timeline runs out.
pub const MAX_TURNS: u32 = 10;

/// A metric at or below this value ends the game.
pub const DEFEAT_THRESHOLD: i32 = 30;

/// Metrics under this value are shown as a warning.
pub const WARNING_THRESHOLD: i32 = 50;

/// Budgets under this value are shown as running low.
pub const LOW_BUDGET_THRESHOLD: i64 = 20_000;

/// A development choice available every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub label: &'static str,
    /// Budget cost in crores.
    pub cost: i64,
    pub effects: &'static [MetricDelta],
    pub description: &'static str,
    /// Narration shown after the decision is applied.
    pub message: &'static str,
}

impl Decision {
    /// Delta this decision applies to a metric, if any.
    pub fn effect_on(&self, metric: Metric) -> Option<i32> {
        self.effects
            .iter()
            .find(|e| e.metric == metric)
            .map(|e| e.delta)
    }
}

/// The ordered decision catalog. Indices are stable.
pub static DECISIONS: [Decision; 4] = [
    Decision {
        label: "Build Port Infrastructure",
        cost: 15_000,
        effects: &[
            MetricDelta::new(Metric::Social, -20),
            MetricDelta::new(Metric::Economic, 25),
            MetricDelta::new(Metric::Ecology, -30),
        ],
        description: "Construct a deep-water port and shipping facilities. High economic potential but significant environmental impact.",
        message: "Port construction accelerates, devastating marine ecosystems.",
    },
    Decision {
        label: "Implement Conservation Measures",
        cost: 8_000,
        effects: &[
            MetricDelta::new(Metric::Social, -15),
            MetricDelta::new(Metric::Economic, -25),
            MetricDelta::new(Metric::Ecology, 20),
        ],
        description: "Establish protected areas and wildlife corridors. Preserves ecology but slows development.",
        message: "Conservation efforts slow development, causing economic setbacks.",
    },
    Decision {
        label: "Expand Urban Development",
        cost: 12_000,
        effects: &[
            MetricDelta::new(Metric::Social, -25),
            MetricDelta::new(Metric::Economic, 30),
            MetricDelta::new(Metric::Ecology, -35),
        ],
        description: "Build housing and commercial zones. Boosts economy but impacts local communities.",
        message: "Urban sprawl consumes pristine forest land, communities protest.",
    },
    Decision {
        label: "Focus on Social Programs",
        cost: 5_000,
        effects: &[
            MetricDelta::new(Metric::Social, 20),
            MetricDelta::new(Metric::Economic, -20),
            MetricDelta::new(Metric::Ecology, -15),
        ],
        description: "Invest in community welfare and relocation support. Improves social metrics but costly.",
        message: "Social initiatives delay project timelines, investors concerned.",
    },
];

/// Look up a decision by catalog index.
pub fn decision(index: usize) -> Result<&'static Decision, RulesError> {
    DECISIONS.get(index).ok_or(RulesError::UnknownDecision {
        index,
        len: DECISIONS.len(),
    })
}

pub const SOCIAL_END_MESSAGE: &str =
    "The communities here were never part of the plan. No allocation of funds changes whose land this is.";
pub const ECOLOGY_END_MESSAGE: &str =
    "You cannot build a deep-water port in a primary rainforest without destroying it. There was no version where this didn't happen.";
pub const ECONOMIC_END_MESSAGE: &str =
    "The numbers were never meant to add up for the people who live here.";
pub const BUDGET_END_MESSAGE: &str =
    "The costs were always underestimated. That was not an accident.";
pub const TURNS_END_MESSAGE: &str =
    "The project timeline was fixed before the first public consultation was held.";

/// Narration for an unrecognised ending.
pub const DEFAULT_END_MESSAGE: &str =
    "The outcome was determined before the first decision was made.";

/// Closing lines shown under every final result.
pub const CODA: [&str; 3] = [
    "There was no winning combination.",
    "This was a simulation.",
    "The destruction is real.",
];
