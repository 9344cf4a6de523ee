//! Error types for the pipeline system.

use std::sync::Arc;
use thiserror::Error;

/// The main error type for pipelines and endpoints.
///
/// Cloneable so a failure can be mirrored on the lifecycle event channel
/// and propagated to the awaiting caller at the same time. No variant is
/// ever retried automatically.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A read-side producer failed generating an element. Reported via the
    /// `ReadError` lifecycle event and terminal for that sequence.
    #[error("produce error: {0}")]
    Produce(Arc<dyn std::error::Error + Send + Sync>),

    /// A push or clear failed against the underlying medium. Rejects the
    /// caller; no lifecycle event is emitted.
    #[error("mutation error: {0}")]
    Mutation(Arc<dyn std::error::Error + Send + Sync>),

    /// An operator received an element violating its required shape
    /// combination or parameter contract. Fails the whole composed stream.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Invalid setup, e.g. a second live dashboard. Fails fast.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a produce error from any error type.
    pub fn produce<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Produce(Arc::new(error))
    }

    /// Create a mutation error from any error type.
    pub fn mutation<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Mutation(Arc::new(error))
    }

    /// Create a shape mismatch error with a message.
    pub fn shape_mismatch<S: Into<String>>(message: S) -> Self {
        Error::ShapeMismatch(message.into())
    }

    /// Create a configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Error::Configuration(message.into())
    }
}

/// Convenience type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
