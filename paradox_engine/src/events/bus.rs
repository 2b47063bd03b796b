//! Synchronous fan-out of engine events to registered subscribers.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use super::EngineEvent;
use crate::error::SubscriberError;

/// Something that wants to observe engine events.
pub trait EventSubscriber {
    fn on_event(&mut self, event: &EngineEvent) -> Result<(), SubscriberError>;
}

impl<F> EventSubscriber for F
where
    F: FnMut(&EngineEvent) -> Result<(), SubscriberError>,
{
    fn on_event(&mut self, event: &EngineEvent) -> Result<(), SubscriberError> {
        self(event)
    }
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Outcome of delivering one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered list of subscribers.
///
/// Delivery is synchronous and follows registration order. A subscriber that
/// returns an error or panics is logged and skipped; the remaining subscribers
/// still receive the event.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Box<dyn EventSubscriber>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber at the end of the delivery order.
    pub fn add_subscriber(&mut self, subscriber: Box<dyn EventSubscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Unregister a subscriber. Returns false if the id was unknown.
    pub fn remove_subscriber(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver an event to every subscriber.
    pub fn emit(&mut self, event: &EngineEvent) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (id, subscriber) in self.subscribers.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    warn!(subscriber = %id, kind = event.kind(), error = %err, "Event subscriber failed");
                    report.failed += 1;
                }
                Err(payload) => {
                    warn!(
                        subscriber = %id,
                        kind = event.kind(),
                        panic = panic_message(payload.as_ref()),
                        "Event subscriber panicked"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
