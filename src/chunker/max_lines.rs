//! Line-budget chunker.
//!
//! # Example
//!
//! ```
//! use linechunk::{MaxLineChunker, SequentialChunker};
//!
//! let mut chunker = MaxLineChunker::new(2, "\n")?;
//! let indices = chunker.indices(&["first\n", "sec", "ond\n", "t", "hi", "rd\n", "four", "th"]);
//! assert_eq!(indices, vec![0, 0, 0, 1, 1, 1, 1, 1]);
//! # Ok::<(), linechunk::ChunkError>(())
//! ```

use tracing::trace;

use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::format::ChunkIndex;

use super::SequentialChunker;

/// Chunker that starts a new chunk once the current one holds `max_lines`
/// complete lines.
///
/// A line is complete when its last part ends with the delimiter. The chunk
/// is full when its count reaches `max_lines`; the rollover happens on the
/// *next* part, so an incomplete trailing fragment never makes a chunk full
/// but does land in the next chunk once the current one is full.
///
/// # Determinism
///
/// Assignments depend only on the concatenated text, never on how it was
/// split into parts or calls: every fragment of a line shares the index of
/// that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxLineChunker {
    max_lines: u64,
    delimiter: Vec<u8>,
    index: ChunkIndex,
    line_count: u64,
}

impl MaxLineChunker {
    /// Creates a chunker with the given line budget and delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `max_lines` is zero or the
    /// delimiter is empty.
    pub fn new(max_lines: usize, delimiter: impl AsRef<[u8]>) -> Result<Self> {
        if max_lines == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "max_lines must be greater than zero",
            });
        }

        let delimiter = delimiter.as_ref().to_vec();
        if delimiter.is_empty() {
            return Err(ChunkError::InvalidConfig {
                message: "delimiter must not be empty",
            });
        }

        Ok(Self {
            max_lines: max_lines as u64,
            delimiter,
            index: 0,
            line_count: 0,
        })
    }

    /// Creates the chunker described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `max_lines` is unset or zero.
    pub fn from_config(config: &ChunkConfig) -> Result<Self> {
        Self::new(config.require_max_lines()?, config.delimiter())
    }

    /// Returns the line budget per chunk.
    pub fn max_lines(&self) -> u64 {
        self.max_lines
    }

    /// Returns the number of complete lines assigned to the current chunk.
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    fn terminates(&self, part: &[u8]) -> bool {
        part.ends_with(&self.delimiter)
    }
}

impl SequentialChunker for MaxLineChunker {
    fn reset(&mut self) {
        self.index = 0;
        self.line_count = 0;
    }

    fn index(&mut self, part: &[u8]) -> ChunkIndex {
        if self.line_count >= self.max_lines {
            self.line_count = 0;
            self.index += 1;
        }

        if self.terminates(part) {
            self.line_count += 1;
        }
        self.index
    }

    /// Batched assignment.
    ///
    /// Parts are grouped into lines; the `k`-th line of the batch sits at
    /// position `line_count + k` counted from the start of the current
    /// chunk, so its index is `index + position / max_lines`.
    fn indices<P: AsRef<[u8]>>(&mut self, parts: &[P]) -> Vec<ChunkIndex> {
        let Some(last) = parts.last() else {
            return Vec::new();
        };

        let mut indices = Vec::with_capacity(parts.len());
        let mut completed = 0u64;
        for part in parts {
            indices.push(self.index + (self.line_count + completed) / self.max_lines);
            if self.terminates(part.as_ref()) {
                completed += 1;
            }
        }

        // An unterminated last line takes a position but does not count
        // toward the budget.
        let open_tail = u64::from(!self.terminates(last.as_ref()));
        let last_position = self.line_count + completed + open_tail - 1;

        self.index += last_position / self.max_lines;
        self.line_count = last_position % self.max_lines + 1 - open_tail;

        trace!(
            parts = parts.len(),
            index = self.index,
            line_count = self.line_count,
            "assigned chunk indices"
        );
        indices
    }

    fn current_index(&self) -> ChunkIndex {
        self.index
    }
}
