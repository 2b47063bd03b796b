//! Metric value types: the three bounded metrics, the budget, and the game state tuple.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::{DEFEAT_THRESHOLD, LOW_BUDGET_THRESHOLD, WARNING_THRESHOLD};
use crate::error::RulesError;

/// Lower bound of every metric.
pub const METRIC_MIN: i32 = 0;

/// Upper bound of every metric.
pub const METRIC_MAX: i32 = 100;

/// The three named metrics tracked by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Social,
    Economic,
    Ecology,
}

impl Metric {
    /// All metrics in catalog order.
    pub const ALL: [Metric; 3] = [Metric::Social, Metric::Economic, Metric::Ecology];

    /// The lowercase key used in effect tables and event payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Social => "social",
            Metric::Economic => "economic",
            Metric::Ecology => "ecology",
        }
    }

    /// Human-readable label for presenters.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Social => "Social Impact",
            Metric::Economic => "Economic Growth",
            Metric::Ecology => "Environmental Health",
        }
    }
}

impl FromStr for Metric {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "social" => Ok(Metric::Social),
            "economic" => Ok(Metric::Economic),
            "ecology" => Ok(Metric::Ecology),
            other => Err(RulesError::UnknownMetric(other.to_string())),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A signed change to one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    /// In [-100, 100].
    pub delta: i32,
}

impl MetricDelta {
    pub const fn new(metric: Metric, delta: i32) -> Self {
        Self { metric, delta }
    }
}

/// How close a metric is to the defeat threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricLevel {
    Healthy,
    Warning,
    Critical,
}

impl MetricLevel {
    /// Classify a metric value.
    pub fn of(value: i32) -> Self {
        if value <= DEFEAT_THRESHOLD {
            MetricLevel::Critical
        } else if value < WARNING_THRESHOLD {
            MetricLevel::Warning
        } else {
            MetricLevel::Healthy
        }
    }
}

/// The complete numeric state of a game at any point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub social: i32,
    pub economic: i32,
    pub ecology: i32,
    /// Remaining budget in crores. Not clamped; non-positive values end the game.
    pub budget: i64,
}

impl GameState {
    pub const fn new(social: i32, economic: i32, ecology: i32, budget: i64) -> Self {
        Self {
            social,
            economic,
            ecology,
            budget,
        }
    }

    /// Read a metric by name.
    pub fn get(&self, metric: Metric) -> i32 {
        match metric {
            Metric::Social => self.social,
            Metric::Economic => self.economic,
            Metric::Ecology => self.ecology,
        }
    }

    /// Return a copy with one metric replaced.
    pub fn with(mut self, metric: Metric, value: i32) -> Self {
        match metric {
            Metric::Social => self.social = value,
            Metric::Economic => self.economic = value,
            Metric::Ecology => self.ecology = value,
        }
        self
    }

    /// Iterate `(metric, value)` pairs in catalog order.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, i32)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Warning level of a metric.
    pub fn level(&self, metric: Metric) -> MetricLevel {
        MetricLevel::of(self.get(metric))
    }

    /// Whether the budget has fallen under the low-funds mark.
    pub fn is_budget_low(&self) -> bool {
        self.budget < LOW_BUDGET_THRESHOLD
    }

    /// Whether every metric lies in the closed metric range.
    pub fn metrics_in_bounds(&self) -> bool {
        self.metrics()
            .all(|(_, v)| (METRIC_MIN..=METRIC_MAX).contains(&v))
    }
}
