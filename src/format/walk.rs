//! Existence-probed enumeration of chunk files.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::Result;

use super::naming::{ChunkFormat, ChunkIndex, NameParts};

/// One chunk file discovered by a [`ChunkWalk`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkEntry {
    /// Path of the chunk file.
    pub path: PathBuf,

    /// Index of the chunk within its logical stream.
    pub index: ChunkIndex,
}

/// Lazy enumeration of a logical stream's chunk files in index order.
///
/// Each step probes a single path: the file for the next index either exists
/// as a regular file or the walk reports the end. A missing index ends the
/// walk even when higher indices exist on disk.
///
/// The walk is not fused. Once it has reported the end, the next call
/// probes the same index again, so chunks created in the meantime become
/// visible.
#[derive(Debug, Clone)]
pub struct ChunkWalk {
    parts: NameParts,
    width: usize,
    next: ChunkIndex,
}

impl ChunkWalk {
    pub(crate) fn new(parts: NameParts, width: usize) -> Self {
        Self {
            parts,
            width,
            next: 0,
        }
    }

    /// Returns the directory holding the chunks.
    pub fn dir(&self) -> &Path {
        self.parts.dir()
    }

    /// Returns the index the next probe will look for.
    pub fn next_index(&self) -> ChunkIndex {
        self.next
    }

    /// Probes the next chunk without moving past it.
    pub fn peek(&self) -> Option<ChunkEntry> {
        let path = self.parts.chunk_path(self.next, self.width);
        if !path.is_file() {
            trace!(index = self.next, path = %path.display(), "no chunk file, walk ends");
            return None;
        }

        Some(ChunkEntry {
            path,
            index: self.next,
        })
    }

    /// Moves past the chunk last returned by [`peek`](Self::peek).
    pub(crate) fn advance(&mut self) {
        self.next += 1;
    }
}

impl Iterator for ChunkWalk {
    type Item = ChunkEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.peek()?;
        self.advance();
        Some(entry)
    }
}

/// Lists the chunk files of `logical` in index order, stopping at the first
/// missing index.
///
/// # Example
///
/// ```no_run
/// use linechunk::{ChunkFormat, list_chunks};
///
/// for entry in list_chunks("/var/log/app.log", &ChunkFormat::default())? {
///     println!("{} -> {}", entry.index, entry.path.display());
/// }
/// # Ok::<(), linechunk::ChunkError>(())
/// ```
pub fn list_chunks(logical: impl AsRef<Path>, format: &ChunkFormat) -> Result<Vec<ChunkEntry>> {
    Ok(format.walk(logical)?.collect())
}
