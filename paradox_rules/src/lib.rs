//! # Paradox Rules
//!
//! The rulebook crate - contains the content catalog, metric value types, and the
//! pure decision rules of the Nicobar paradox game.
//! This crate is the single source of truth for game content and holds no session state.

pub mod catalog;
pub mod error;
pub mod metrics;
pub mod rules;

pub use catalog::*;
pub use error::*;
pub use metrics::*;
pub use rules::*;
