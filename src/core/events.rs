//! Endpoint lifecycle events and the channel carrying them.
//!
//! Every endpoint owns an [`EventBus`] and emits exactly one event per
//! operation outcome: a `read()` produces one `ReadStart`, any number of
//! `ReadData`, and exactly one of `ReadEnd`/`ReadError`; a successful
//! `push`/`clear` produces one `Push`/`Clear` and a failed one produces
//! nothing. The dashboard and tests subscribe through the same channel.

use crate::core::error::Error;
use crate::core::record::{Record, Selector};
use tokio::sync::broadcast;
use tracing::debug;

/// Default per-endpoint event channel capacity.
const EVENT_CAPACITY: usize = 64;

/// The fixed lifecycle event vocabulary.
#[derive(Debug, Clone)]
pub enum EndpointEvent {
    /// A read began, before any element
    ReadStart,
    /// One element was produced
    ReadData(Record),
    /// The read completed normally
    ReadEnd,
    /// The read failed terminally
    ReadError(Error),
    /// A value was persisted
    Push(Record),
    /// Matching state was deleted
    Clear(Selector),
}

/// Broadcast channel for one endpoint's lifecycle events.
///
/// Cheap to clone; events sent while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EndpointEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Subscribe to all events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EndpointEvent> {
        self.tx.subscribe()
    }

    /// Emit one lifecycle event.
    pub fn emit(&self, event: EndpointEvent) {
        debug!(?event, "endpoint event");
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
