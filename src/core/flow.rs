//! Restartable push streams of records.
//!
//! A [`Flow`] wraps a subscription-setup procedure: every call to
//! [`Flow::subscribe`] re-invokes the setup and returns a fresh,
//! independently suspendable stream. Nothing is multicast; two
//! subscribers each drive their own production. This is what lets the
//! `join` operator re-run its right-hand side once per left element.

use crate::core::error::Result;
use crate::core::record::Record;
use async_stream::try_stream;
use futures::StreamExt;
use futures_core::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed stream of record results, one subscription's worth of output.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Record>> + Send>>;

/// A lazy, restartable producer of records.
#[derive(Clone)]
pub struct Flow {
    factory: Arc<dyn Fn() -> RecordStream + Send + Sync>,
}

impl Flow {
    /// Wrap a subscription-setup procedure.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> RecordStream + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// A flow that replays a fixed set of records on every subscription.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new(move || {
            let records = records.clone();
            Box::pin(futures::stream::iter(records.into_iter().map(Ok)))
        })
    }

    /// Start a fresh, independent production of this flow's elements.
    pub fn subscribe(&self) -> RecordStream {
        (self.factory)()
    }

    /// Transform each record; a returned error fails the stream.
    pub fn map<F>(&self, f: F) -> Flow
    where
        F: Fn(Record) -> Result<Record> + Send + Sync + 'static,
    {
        let inner = self.clone();
        let f = Arc::new(f);
        Flow::new(move || {
            let inner = inner.clone();
            let f = Arc::clone(&f);
            Box::pin(try_stream! {
                let mut source = inner.subscribe();
                while let Some(item) = source.next().await {
                    yield f(item?)?;
                }
            })
        })
    }

    /// Keep only records satisfying the predicate.
    pub fn filter<F>(&self, predicate: F) -> Flow
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        let inner = self.clone();
        let predicate = Arc::new(predicate);
        Flow::new(move || {
            let inner = inner.clone();
            let predicate = Arc::clone(&predicate);
            Box::pin(try_stream! {
                let mut source = inner.subscribe();
                while let Some(item) = source.next().await {
                    let record = item?;
                    if predicate(&record) {
                        yield record;
                    }
                }
            })
        })
    }

    /// Observe each record without changing it.
    pub fn tap<F>(&self, f: F) -> Flow
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        let inner = self.clone();
        let f = Arc::new(f);
        Flow::new(move || {
            let inner = inner.clone();
            let f = Arc::clone(&f);
            Box::pin(try_stream! {
                let mut source = inner.subscribe();
                while let Some(item) = source.next().await {
                    let record = item?;
                    f(&record);
                    yield record;
                }
            })
        })
    }

    /// End the stream after `count` records.
    pub fn take(&self, count: usize) -> Flow {
        let inner = self.clone();
        Flow::new(move || Box::pin(inner.subscribe().take(count)))
    }

    /// Cross-product join against a restartable right-hand flow.
    ///
    /// See [`crate::operators::join`] for the shape-combination rules.
    pub fn join(&self, right: &Flow, scalar_field: Option<&str>) -> Flow {
        crate::operators::join(self, right, scalar_field.map(str::to_string))
    }

    /// Like [`Flow::join`], but every element on both sides must be a
    /// sequence; anything else fails the stream.
    pub fn join_arrays(&self, right: &Flow) -> Flow {
        crate::operators::join_arrays(self, right)
    }

    /// Like [`Flow::join`], but every element on both sides must be
    /// keyed; anything else fails the stream.
    pub fn join_objects(&self, right: &Flow) -> Flow {
        crate::operators::join_objects(self, right)
    }

    /// Attach an incrementing counter to each record.
    ///
    /// See [`crate::operators::numerate`] for the per-shape rules.
    pub fn numerate(&self, start: i64, field_name: Option<&str>) -> Flow {
        crate::operators::numerate(self, start, field_name.map(str::to_string))
    }
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow").finish_non_exhaustive()
    }
}
