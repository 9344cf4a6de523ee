//! Periodic counter endpoint.

use crate::core::context::Context;
use crate::core::endpoint::{Endpoint, EndpointCore};
use crate::core::error::{Error, Result};
use crate::core::events::EndpointEvent;
use crate::core::flow::Flow;
use crate::core::record::{Record, Selector, Value};
use async_stream::try_stream;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// An endpoint emitting an incrementing counter once per period.
///
/// The sequence is infinite until [`TimerEndpoint::stop`] or a context
/// shutdown, either of which completes active reads with `ReadEnd`
/// instead of aborting them mid-element. `push` seeds the counter,
/// `clear` resets it to zero; the counter is shared across reads.
pub struct TimerEndpoint {
    core: EndpointCore,
    period: Duration,
    counter: Arc<Mutex<i64>>,
    stop: CancellationToken,
}

impl TimerEndpoint {
    pub fn new(name: impl Into<String>, ctx: Arc<Context>, period: Duration) -> Self {
        Self {
            core: EndpointCore::new(name, ctx),
            period,
            counter: Arc::new(Mutex::new(0)),
            stop: CancellationToken::new(),
        }
    }

    /// Stop ticking and complete every active read.
    pub fn stop(&self) {
        self.stop.cancel();
    }
}

#[async_trait]
impl Endpoint for TimerEndpoint {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn context(&self) -> &Arc<Context> {
        self.core.context()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<EndpointEvent> {
        self.core.subscribe()
    }

    fn read_with(&self, _selector: Selector) -> Flow {
        let core = self.core.clone();
        let period = self.period;
        let counter = Arc::clone(&self.counter);
        let stop = self.stop.clone();
        Flow::new(move || {
            let core = core.clone();
            let counter = Arc::clone(&counter);
            let stop = stop.clone();
            Box::pin(try_stream! {
                core.send_start();
                let shutdown = core.context().shutdown_token();
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    let stopped = tokio::select! {
                        _ = stop.cancelled() => true,
                        _ = shutdown.cancelled() => true,
                        _ = ticker.tick() => false,
                    };
                    if stopped {
                        break;
                    }
                    core.context().wait_while_paused().await;
                    let record = {
                        let mut counter = counter.lock().unwrap();
                        let value = *counter;
                        *counter += 1;
                        Record::scalar(value)
                    };
                    core.send_data(&record);
                    yield record;
                }
                core.send_end();
            })
        })
    }

    async fn push(&self, record: Record) -> Result<()> {
        let value = match &record {
            Record::Scalar(Value::Int(value)) => *value,
            other => {
                return Err(Error::shape_mismatch(format!(
                    "timer endpoint accepts integer scalars only, got {}",
                    other.shape()
                )))
            }
        };
        *self.counter.lock().unwrap() = value;
        self.core.send_push(&record);
        Ok(())
    }

    async fn clear(&self, selector: Selector) -> Result<()> {
        *self.counter.lock().unwrap() = 0;
        self.core.send_clear(&selector);
        Ok(())
    }
}
