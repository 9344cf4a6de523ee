//! # Composable push-based ETL pipelines for Rust
//!
//! This crate provides endpoints (adapters over a medium such as a file,
//! a table, a timer, or an in-memory buffer) that emit and consume
//! [`Record`]s through restartable push streams, composed with a fixed
//! set of operators and coordinated by a process-wide pause/step
//! controller.
//!
//! ## Core Concepts
//!
//! - **Record**: a runtime-shaped element (scalar, sequence, or keyed map)
//! - **Endpoint**: unifies read/push/clear against one medium and emits
//!   lifecycle events for every operation
//! - **Flow**: a lazy producer; every subscription re-runs its setup
//! - **Operators**: `join`, `join_arrays`, `join_objects`, `numerate`,
//!   plus `map`/`filter`/`tap`/`take` glue
//! - **Dashboard**: mirrors endpoint lifecycle events as status rows and
//!   owns the pause/step/quit bindings
//!
//! ## Example
//!
//! ```rust
//! use etlflow::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new();
//!     let left = BufferEndpoint::with_records(
//!         "left",
//!         ctx.clone(),
//!         vec![Record::sequence([1]), Record::sequence([2])],
//!     );
//!     let right = BufferEndpoint::with_records(
//!         "right",
//!         ctx.clone(),
//!         vec![Record::sequence([10]), Record::sequence([11])],
//!     );
//!
//!     let stream = left
//!         .read()
//!         .join(&right.read(), None)
//!         .numerate(0, None)
//!         .tap(|record| println!("{}", record));
//!     run(&stream).await
//! }
//! ```

pub mod core;
pub mod dashboard;
pub mod endpoints;
pub mod operators;
pub mod run;

// Re-export commonly used items
pub mod prelude {
    pub use crate::core::{
        Context, Endpoint, EndpointEvent, Error, Flow, Record, Result, Selector, Shape, Value,
    };
    pub use crate::dashboard::{Dashboard, EndpointStatus};
    pub use crate::endpoints::{BufferEndpoint, FilesystemEndpoint, TableEndpoint, TimerEndpoint};
    pub use crate::run::{collect, run, run_all};
}

// Re-export main error type
pub use crate::core::{Error, Record, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
