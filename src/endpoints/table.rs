//! Relational-style table endpoint.

use crate::core::context::Context;
use crate::core::endpoint::{Endpoint, EndpointCore};
use crate::core::error::{Error, Result};
use crate::core::events::EndpointEvent;
use crate::core::flow::Flow;
use crate::core::record::{Record, Selector, Value};
use async_stream::try_stream;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// An endpoint modeling one relational table: keyed rows only, with
/// field-equality selectors standing in for `where` clauses on `read`
/// and `clear`. SQL generation itself is out of scope; this covers the
/// capability contract over a row-shaped medium.
pub struct TableEndpoint {
    core: EndpointCore,
    rows: Arc<Mutex<Vec<IndexMap<String, Value>>>>,
}

impl TableEndpoint {
    pub fn new(name: impl Into<String>, ctx: Arc<Context>) -> Self {
        Self {
            core: EndpointCore::new(name, ctx),
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl Endpoint for TableEndpoint {
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
        let rows = Arc::clone(&self.rows);
        Flow::new(move || {
            let core = core.clone();
            let rows = Arc::clone(&rows);
            let selector = selector.clone();
            Box::pin(try_stream! {
                core.send_start();
                let matching: Vec<Record> = rows
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|row| Record::Keyed(row.clone()))
                    .filter(|record| selector.matches(record))
                    .collect();
                for record in matching {
                    core.context().wait_while_paused().await;
                    core.send_data(&record);
                    yield record;
                }
                core.send_end();
            })
        })
    }

    async fn push(&self, record: Record) -> Result<()> {
        let row = match &record {
            Record::Keyed(map) => map.clone(),
            other => {
                return Err(Error::shape_mismatch(format!(
                    "table endpoint accepts keyed records only, got {}",
                    other.shape()
                )))
            }
        };
        self.rows.lock().unwrap().push(row);
        self.core.send_push(&record);
        Ok(())
    }

    async fn clear(&self, selector: Selector) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !selector.matches(&Record::Keyed(row.clone())));
        self.core.send_clear(&selector);
        Ok(())
    }
}
