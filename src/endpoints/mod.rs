//! Concrete endpoint implementations.
//!
//! Each endpoint implements the capability contract over one medium:
//! an in-memory buffer, a JSON-lines file, a relational-style table,
//! and a periodic timer.

pub mod buffer;
pub mod filesystem;
pub mod table;
pub mod timer;

pub use buffer::BufferEndpoint;
pub use filesystem::FilesystemEndpoint;
pub use table::TableEndpoint;
pub use timer::TimerEndpoint;
