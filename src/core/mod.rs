//! Core types for the etlflow library.
//!
//! This module contains the record data model, the error taxonomy, the
//! shared pause/shutdown context, the restartable [`Flow`] producer, and
//! the endpoint capability contract.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod flow;
pub mod record;

// Re-export core items
pub use context::{Context, PauseState};
pub use endpoint::{Endpoint, EndpointCore};
pub use error::{Error, Result};
pub use events::{EndpointEvent, EventBus};
pub use flow::{Flow, RecordStream};
pub use record::{Record, Selector, Shape, Value};
