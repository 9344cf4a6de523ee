//! End-to-end pipeline examples for etlflow
//!
//! Run with: cargo run --example pipeline

use etlflow::prelude::*;
use std::time::Duration;

/// Example 1: join two buffers and number the results
async fn join_example(ctx: &std::sync::Arc<Context>) -> Result<()> {
    println!("=== Join and Numerate ===");

    let people = BufferEndpoint::with_records(
        "people",
        ctx.clone(),
        vec![
            Record::keyed([("name", Value::from("ada"))]),
            Record::keyed([("name", Value::from("grace"))]),
        ],
    );
    let cities = BufferEndpoint::with_records(
        "cities",
        ctx.clone(),
        vec![Record::scalar("oslo"), Record::scalar("lima")],
    );

    let flow = people
        .read()
        .join(&cities.read(), Some("city"))
        .numerate(1, Some("row"))
        .tap(|record| println!("joined: {}", record));
    run(&flow).await?;

    println!();
    Ok(())
}

/// Example 2: copy a buffer into a JSONL file, filtering on the way
async fn copy_example(ctx: &std::sync::Arc<Context>) -> Result<()> {
    println!("=== Buffer to File ===");

    let source = BufferEndpoint::with_records(
        "source",
        ctx.clone(),
        (0..10).map(Record::scalar).collect(),
    );
    let target = FilesystemEndpoint::new("target", ctx.clone(), "pipeline_out.jsonl");
    target.clear(Selector::All).await?;

    let evens = source
        .read()
        .filter(|record| !matches!(record, Record::Scalar(Value::Int(n)) if n % 2 != 0));
    for record in collect(&evens).await? {
        target.push(record).await?;
    }

    println!("wrote even numbers to pipeline_out.jsonl");
    println!();
    Ok(())
}

/// Example 3: a finite slice of a timer, mirrored on the dashboard
async fn timer_example(ctx: &std::sync::Arc<Context>) -> Result<()> {
    println!("=== Timer with Dashboard ===");

    let dashboard = Dashboard::new(ctx.clone())?;
    let timer = TimerEndpoint::new("ticker", ctx.clone(), Duration::from_millis(50));
    dashboard.register(&timer);

    let flow = timer
        .read()
        .take(5)
        .tap(|record| println!("tick: {}", record));
    run(&flow).await?;

    tokio::time::sleep(Duration::from_millis(50)).await;
    for row in dashboard.rows() {
        println!(
            "{}: {} ({})",
            row.name,
            row.status,
            row.last_value.as_deref().unwrap_or("-")
        );
    }

    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let ctx = Context::new();
    join_example(&ctx).await?;
    copy_example(&ctx).await?;
    timer_example(&ctx).await?;
    Ok(())
}
