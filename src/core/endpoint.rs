//! The endpoint capability contract.
//!
//! An endpoint is an adapter unifying produce (`read`), consume (`push`)
//! and delete (`clear`) against one medium. Endpoints are constructed
//! once and reused across calls; each `read` hands back a restartable
//! [`Flow`] whose subscriptions honor the shared pause state between
//! element productions.

use crate::core::context::Context;
use crate::core::error::{Error, Result};
use crate::core::events::{EndpointEvent, EventBus};
use crate::core::flow::Flow;
use crate::core::record::{Record, Selector};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// The capability contract every concrete adapter implements.
///
/// Lifecycle event discipline, per operation:
/// - `read`: one `ReadStart` before the first element, one `ReadData`
///   per element, terminated by exactly one of `ReadEnd`/`ReadError`.
///   An error is terminal for that sequence; there is no retry.
/// - `push`: one `Push` on success, nothing on failure.
/// - `clear`: one `Clear` on success, nothing on failure.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Display name for dashboards and logs.
    fn name(&self) -> &str;

    /// The shared pause/shutdown context this endpoint consults.
    fn context(&self) -> &Arc<Context>;

    /// Subscribe to this endpoint's lifecycle events.
    fn subscribe_events(&self) -> broadcast::Receiver<EndpointEvent>;

    /// Produce the records matching `selector` as a restartable flow.
    fn read_with(&self, selector: Selector) -> Flow;

    /// Produce all records as a restartable flow.
    fn read(&self) -> Flow {
        self.read_with(Selector::All)
    }

    /// Persist one record to the medium.
    async fn push(&self, record: Record) -> Result<()>;

    /// Delete the records matching `selector` from the medium.
    async fn clear(&self, selector: Selector) -> Result<()>;
}

/// Shared plumbing embedded in every concrete endpoint: display name,
/// injected context, and the lifecycle event bus.
#[derive(Debug, Clone)]
pub struct EndpointCore {
    name: String,
    ctx: Arc<Context>,
    events: EventBus,
}

impl EndpointCore {
    pub fn new(name: impl Into<String>, ctx: Arc<Context>) -> Self {
        Self {
            name: name.into(),
            ctx,
            events: EventBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EndpointEvent> {
        self.events.subscribe()
    }

    pub fn send_start(&self) {
        self.events.emit(EndpointEvent::ReadStart);
    }

    pub fn send_data(&self, record: &Record) {
        self.events.emit(EndpointEvent::ReadData(record.clone()));
    }

    pub fn send_end(&self) {
        self.events.emit(EndpointEvent::ReadEnd);
    }

    pub fn send_error(&self, error: &Error) {
        self.events.emit(EndpointEvent::ReadError(error.clone()));
    }

    pub fn send_push(&self, record: &Record) {
        self.events.emit(EndpointEvent::Push(record.clone()));
    }

    pub fn send_clear(&self, selector: &Selector) {
        self.events.emit(EndpointEvent::Clear(selector.clone()));
    }

    /// Mirror a read-side failure on the event channel, then pass it on.
    ///
    /// Intended for `?` inside read streams so `ReadError` and the
    /// stream's failure carry the same error.
    pub fn check_read<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.send_error(err);
        }
        result
    }
}
