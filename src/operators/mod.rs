//! Stream-to-stream transformation operators.
//!
//! Operators are pure transforms over [`crate::Flow`]s, composable by
//! chaining; each also exists as a method on `Flow`. Shape violations
//! fail the entire composed stream; no element is ever skipped.

mod join;
mod numerate;

pub use join::{join, join_arrays, join_objects};
pub use numerate::numerate;
