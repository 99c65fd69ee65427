//! Chunk assignment for streams of line parts.
//!
//! - [`SequentialChunker`] - decides which chunk each written fragment belongs to
//! - [`MaxLineChunker`] - rolls over to a new chunk every `max_lines` complete lines
//!
//! Chunkers are pure: they never touch the filesystem, they only turn line
//! parts into chunk indices and keep a running position between calls.

mod max_lines;

pub use max_lines::MaxLineChunker;

use crate::format::ChunkIndex;

/// Assigns chunk indices to line parts, in write order.
///
/// Implementations must keep every fragment of one logical line in the same
/// chunk: a line is never split across two chunk files.
pub trait SequentialChunker {
    /// Resets the chunker to index 0 with an empty current chunk.
    fn reset(&mut self);

    /// Returns the chunk index of a single line part.
    fn index(&mut self, part: &[u8]) -> ChunkIndex;

    /// Returns one chunk index per line part.
    ///
    /// Equivalent to calling [`index`](Self::index) once per part in order;
    /// implementations may override this with a batched computation.
    fn indices<P: AsRef<[u8]>>(&mut self, parts: &[P]) -> Vec<ChunkIndex> {
        parts.iter().map(|part| self.index(part.as_ref())).collect()
    }

    /// Returns the index of the chunk currently being filled.
    fn current_index(&self) -> ChunkIndex;
}
