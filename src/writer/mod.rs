//! Chunked writing.
//!
//! - [`ChunkedWriter`] - writes one logical text stream into numbered chunk files
//!
//! # State machine
//!
//! ```text
//! Open(0) --rollover--> Open(1) --rollover--> ... --close--> Closed
//! ```
//!
//! A rollover flushes the current chunk, opens the next one and only then
//! releases the previous handle, so a failed open leaves the previous chunk
//! open, flushed and usable.

mod chunked;

pub use chunked::ChunkedWriter;
