//! Errors raised by catalog lookups and key parsing.

use thiserror::Error;

/// Errors produced by the rulebook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("decision index {index} is out of range (catalog has {len} decisions)")]
    UnknownDecision { index: usize, len: usize },

    #[error("unknown metric key: {0}")]
    UnknownMetric(String),

    #[error("unknown termination reason: {0}")]
    UnknownReason(String),
}
