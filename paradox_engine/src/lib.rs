//! # Paradox Engine
//!
//! The decision simulation engine behind the Nicobar paradox game. This crate
//! wraps the pure rules from `paradox_rules` in a live, turn-based session and
//! publishes what happens to any number of observers.
//!
//! ## Core Components
//!
//! - **session**: The mutable game session and its public API
//! - **events**: Engine events and the synchronous event bus
//! - **presenter**: The capability set a UI drives, plus board projections and text rendering
//! - **analytics**: An event subscriber that turns engine events into analytics records
//! - **config**: TOML-backed engine configuration
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The same decisions always produce the same states and events
//! - **Event-Driven**: Presenters and sinks react to events, they never reach into the session
//! - **Isolated Observers**: A failing subscriber never disturbs the session or other subscribers

pub mod analytics;
pub mod config;
pub mod error;
pub mod events;
pub mod presenter;
pub mod session;

pub use analytics::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use presenter::*;
pub use session::*;
