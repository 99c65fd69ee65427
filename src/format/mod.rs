//! Chunk naming scheme.
//!
//! - [`ChunkFormat`] - maps `(logical path, index)` to a chunk file path and back
//! - [`ChunkWalk`] - lazy, existence-probed enumeration of a stream's chunks
//! - [`list_chunks`] - collects a walk into a vector
//! - [`scan_chunks`] - directory-listing discovery that also sees chunks past a gap
//!
//! # Layout
//!
//! The logical path itself becomes the directory holding the chunks:
//!
//! ```text
//! data.txt/
//!   data.000000.txt
//!   data.000001.txt
//!   data.000002.txt
//! ```

mod naming;
mod scan;
mod walk;

pub use naming::{ChunkFormat, ChunkIndex};
pub(crate) use naming::NameParts;
pub use scan::scan_chunks;
pub use walk::{ChunkEntry, ChunkWalk, list_chunks};
