//! Analytics sink - turns engine events into analytics records.
//!
//! The sink is an ordinary event subscriber. Delivery to a downstream service
//! is left to an [`AnalyticsTransport`]; batching and retries live there, not
//! in the engine.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use paradox_rules::decision;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::AnalyticsConfig;
use crate::error::SubscriberError;
use crate::events::{EngineEvent, EventSubscriber};
use crate::session::SessionId;

/// One tracked analytics event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRecord {
    /// `game_start`, `game_decision`, or `game_end`.
    pub name: &'static str,
    pub measurement_id: String,
    pub session_id: SessionId,
    pub params: Value,
    pub timestamp: DateTime<Utc>,
}

/// Where analytics records go.
pub trait AnalyticsTransport {
    fn send(&mut self, record: AnalyticsRecord) -> Result<(), SubscriberError>;
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferedTransport {
    records: Rc<RefCell<Vec<AnalyticsRecord>>>,
}

impl BufferedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Remove and return everything buffered so far.
    pub fn drain(&self) -> Vec<AnalyticsRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

impl AnalyticsTransport for BufferedTransport {
    fn send(&mut self, record: AnalyticsRecord) -> Result<(), SubscriberError> {
        self.records.borrow_mut().push(record);
        Ok(())
    }
}

/// Writes each record as a JSON log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl AnalyticsTransport for LogTransport {
    fn send(&mut self, record: AnalyticsRecord) -> Result<(), SubscriberError> {
        let line = serde_json::to_string(&record)?;
        info!(target: "paradox::analytics", event = record.name, "{}", line);
        Ok(())
    }
}

/// Event subscriber that forwards engine events to an analytics transport.
#[derive(Debug)]
pub struct AnalyticsSink<T> {
    config: AnalyticsConfig,
    transport: T,
}

impl<T: AnalyticsTransport> AnalyticsSink<T> {
    pub fn new(config: AnalyticsConfig, transport: T) -> Self {
        Self { config, transport }
    }
}

/// Map an engine event to its analytics record.
pub fn analytics_record(
    event: &EngineEvent,
    measurement_id: &str,
) -> Result<AnalyticsRecord, SubscriberError> {
    let (name, params) = match event {
        EngineEvent::Started { max_turns, .. } => {
            ("game_start", json!({ "max_turns": max_turns }))
        }
        EngineEvent::DecisionApplied {
            turn,
            decision_index,
            cost,
            effects,
            ..
        } => {
            let label = decision(*decision_index)
                .map_err(|e| SubscriberError::Rejected(e.to_string()))?
                .label;
            let effects: Map<String, Value> = effects
                .iter()
                .map(|e| (e.metric.as_str().to_string(), json!(e.delta)))
                .collect();
            (
                "game_decision",
                json!({
                    "decision": label,
                    "effects": effects,
                    "turn": turn,
                    "cost": cost,
                }),
            )
        }
        EngineEvent::Ended {
            turn,
            reason,
            final_state,
            ..
        } => {
            let mut params = serde_json::to_value(final_state)?;
            if let Value::Object(fields) = &mut params {
                fields.insert("turns".into(), json!(turn));
                fields.insert("reason".into(), json!(reason.as_str()));
            }
            ("game_end", params)
        }
    };

    Ok(AnalyticsRecord {
        name,
        measurement_id: measurement_id.to_string(),
        session_id: event.session_id(),
        params,
        timestamp: Utc::now(),
    })
}

impl<T: AnalyticsTransport> EventSubscriber for AnalyticsSink<T> {
    fn on_event(&mut self, event: &EngineEvent) -> Result<(), SubscriberError> {
        if !self.config.is_active() {
            return Ok(());
        }
        let measurement_id = self.config.measurement_id.as_deref().unwrap_or_default();
        let record = analytics_record(event, measurement_id)?;
        self.transport.send(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::session::Session;

    fn active_config() -> AnalyticsConfig {
        AnalyticsConfig {
            enabled: true,
            measurement_id: Some("G-TEST".into()),
        }
    }

    fn tracked_session(config: AnalyticsConfig) -> (Session, BufferedTransport) {
        let transport = BufferedTransport::new();
        let sink = AnalyticsSink::new(config, transport.clone());
        let subscribers: Vec<Box<dyn EventSubscriber>> = vec![Box::new(sink)];
        let session = Session::with_subscribers(&EngineConfig::default(), subscribers);
        (session, transport)
    }

    #[test]
    fn test_records_full_game() {
        let (mut session, transport) = tracked_session(active_config());
        session.submit(2).unwrap();
        session.submit(2).unwrap();

        let names: Vec<_> = transport.records().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["game_start", "game_decision", "game_decision", "game_end"]);
        assert!(transport
            .records()
            .iter()
            .all(|r| r.measurement_id == "G-TEST" && r.session_id == session.id()));
    }

    #[test]
    fn test_decision_params() {
        let (mut session, transport) = tracked_session(active_config());
        session.submit(0).unwrap();

        let record = &transport.records()[1];
        assert_eq!(record.params["decision"], "Build Port Infrastructure");
        assert_eq!(record.params["effects"]["social"], -20);
        assert_eq!(record.params["effects"]["economic"], 25);
        assert_eq!(record.params["effects"]["ecology"], -30);
        assert_eq!(record.params["turn"], 1);
    }

    #[test]
    fn test_end_params() {
        let (mut session, transport) = tracked_session(active_config());
        session.submit(2).unwrap();
        session.submit(2).unwrap();

        let end = transport.drain().pop().unwrap();
        assert_eq!(end.name, "game_end");
        assert_eq!(end.params["turns"], 3);
        assert_eq!(end.params["reason"], "ecology");
        assert_eq!(end.params["social"], 50);
        assert_eq!(end.params["budget"], 57_800);
        assert!(transport.is_empty());
    }

    #[test]
    fn test_silent_without_measurement_id() {
        let (mut session, transport) = tracked_session(AnalyticsConfig::default());
        session.submit(1).unwrap();
        assert!(transport.is_empty());
    }

    #[test]
    fn test_failing_transport_does_not_break_session() {
        struct Down;

        impl AnalyticsTransport for Down {
            fn send(&mut self, _: AnalyticsRecord) -> Result<(), SubscriberError> {
                Err(SubscriberError::Transport("connection refused".into()))
            }
        }

        let mut session = Session::new();
        session.add_subscriber(Box::new(AnalyticsSink::new(active_config(), Down)));

        let outcome = session.submit(0).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(session.history().len(), 1);
    }
}
