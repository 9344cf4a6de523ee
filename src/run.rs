//! Bridging composed flows to awaitable completion.

use crate::core::error::Result;
use crate::core::flow::Flow;
use crate::core::record::Record;
use futures::future;
use futures::StreamExt;

/// Drive a fully composed flow to completion or first failure.
///
/// This is the synchronization boundary between the push-based pipeline
/// and imperative callers: side effects are already wired in through
/// operators, so the records themselves are discarded here.
pub async fn run(flow: &Flow) -> Result<()> {
    let mut stream = flow.subscribe();
    while let Some(item) = stream.next().await {
        item?;
    }
    Ok(())
}

/// Drive several composed flows concurrently; the first failure wins.
pub async fn run_all<I>(flows: I) -> Result<()>
where
    I: IntoIterator<Item = Flow>,
{
    let drains = flows
        .into_iter()
        .map(|flow| async move { run(&flow).await });
    future::try_join_all(drains).await?;
    Ok(())
}

/// Drain one subscription of `flow` and return everything it emitted.
pub async fn collect(flow: &Flow) -> Result<Vec<Record>> {
    let mut stream = flow.subscribe();
    let mut records = Vec::new();
    while let Some(item) = stream.next().await {
        records.push(item?);
    }
    Ok(records)
}
