//! Chunked reading.
//!
//! - [`ChunkedReader`] - reads a directory of chunk files back as one logical stream
//!
//! # State machine
//!
//! ```text
//! NotOpened --> Reading(0) --> Reading(1) --> ... --> Reading(last), at end
//!                                                        |
//!        (more text in the last chunk, or a new chunk) <-+
//! ```

mod chunked;
mod line;

pub use chunked::ChunkedReader;
