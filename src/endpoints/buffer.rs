//! In-memory buffer endpoint.

use crate::core::context::Context;
use crate::core::endpoint::{Endpoint, EndpointCore};
use crate::core::error::Result;
use crate::core::events::EndpointEvent;
use crate::core::flow::Flow;
use crate::core::record::{Record, Selector};
use async_stream::try_stream;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// An endpoint backed by an in-process `Vec<Record>`.
///
/// Reads snapshot the buffer at subscription time, so a push during an
/// active read does not change what that read produces.
pub struct BufferEndpoint {
    core: EndpointCore,
    records: Arc<Mutex<Vec<Record>>>,
}

impl BufferEndpoint {
    /// Create an empty buffer.
    pub fn new(name: impl Into<String>, ctx: Arc<Context>) -> Self {
        Self::with_records(name, ctx, Vec::new())
    }

    /// Create a buffer pre-seeded with records.
    pub fn with_records(name: impl Into<String>, ctx: Arc<Context>, records: Vec<Record>) -> Self {
        Self {
            core: EndpointCore::new(name, ctx),
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Current buffer contents.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Endpoint for BufferEndpoint {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn context(&self) -> &Arc<Context> {
        self.core.context()
    }

    fn subscribe_events(&self) -> broadcast::Receiver<EndpointEvent> {
        self.core.subscribe()
    }

    fn read_with(&self, selector: Selector) -> Flow {
        let core = self.core.clone();
        let records = Arc::clone(&self.records);
        Flow::new(move || {
            let core = core.clone();
            let records = Arc::clone(&records);
            let selector = selector.clone();
            Box::pin(try_stream! {
                core.send_start();
                let snapshot: Vec<Record> = records
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|r| selector.matches(r))
                    .cloned()
                    .collect();
                for record in snapshot {
                    core.context().wait_while_paused().await;
                    core.send_data(&record);
                    yield record;
                }
                core.send_end();
            })
        })
    }

    async fn push(&self, record: Record) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        self.core.send_push(&record);
        Ok(())
    }

    async fn clear(&self, selector: Selector) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .retain(|r| !selector.matches(r));
        self.core.send_clear(&selector);
        Ok(())
    }
}
