//! Configuration for chunked streams.
//!
//! [`ChunkConfig`] is a plain value handed to readers and writers at
//! construction. There is no shared default instance: every session builds
//! (or clones) its own.
//!
//! # Example
//!
//! ```
//! use linechunk::ChunkConfig;
//!
//! let config = ChunkConfig::default()
//!     .with_max_lines(Some(500))
//!     .with_index_width(4);
//! config.validate()?;
//!
//! # Ok::<(), linechunk::ChunkError>(())
//! ```

use crate::error::{ChunkError, Result};

/// Default line budget per chunk file.
pub const DEFAULT_MAX_LINES: usize = 1_000;

/// Default line delimiter.
pub const DEFAULT_DELIMITER: &str = "\n";

/// Default minimum number of digits in a chunk file index.
pub const DEFAULT_INDEX_WIDTH: usize = 6;

/// Configuration shared by [`ChunkedWriter`](crate::ChunkedWriter),
/// [`ChunkedReader`](crate::ChunkedReader) and [`open`](crate::open()).
///
/// - `max_lines` - line budget per chunk. `None` disables chunking for
///   writes (see [`open`](crate::open())); a writer requires `Some(n)`, `n > 0`.
/// - `delimiter` - the byte sequence terminating a line.
/// - `index_width` - minimum zero-padded width of the index in chunk names.
///   Wider indices are never truncated.
/// - `keep_extension` - whether chunk names end with the logical path's
///   extension (`data.000001.txt`) or stop at the index (`data.000001`).
/// - `verbose` - warn when chunk-scoped operations (seek, position,
///   truncate) are used, since they only act on the current chunk file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    max_lines: Option<usize>,
    delimiter: String,
    index_width: usize,
    keep_extension: bool,
    verbose: bool,
}

impl ChunkConfig {
    /// Creates a configuration with the given line budget and defaults
    /// for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `max_lines` is zero.
    pub fn new(max_lines: usize) -> Result<Self> {
        let config = Self::default().with_max_lines(Some(max_lines));
        config.validate()?;
        Ok(config)
    }

    /// Sets the line budget. Not validated until [`ChunkConfig::validate`].
    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Sets the line delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the minimum index width used in chunk file names.
    pub fn with_index_width(mut self, width: usize) -> Self {
        self.index_width = width;
        self
    }

    /// Sets whether chunk names keep the logical path's extension.
    pub fn with_keep_extension(mut self, keep_extension: bool) -> Self {
        self.keep_extension = keep_extension;
        self
    }

    /// Enables or disables warnings for chunk-scoped operations.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the line budget, if chunked writing is configured.
    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Returns the line delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Returns the minimum index width.
    pub fn index_width(&self) -> usize {
        self.index_width
    }

    /// Returns whether chunk names keep the logical path's extension.
    pub fn keep_extension(&self) -> bool {
        self.keep_extension
    }

    /// Returns whether chunk-scoped operations warn.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the line budget or fails if chunked writing is not configured.
    pub(crate) fn require_max_lines(&self) -> Result<usize> {
        match self.max_lines {
            Some(0) => Err(ChunkError::InvalidConfig {
                message: "max_lines must be greater than zero",
            }),
            Some(n) => Ok(n),
            None => Err(ChunkError::InvalidConfig {
                message: "max_lines is required for chunked writes",
            }),
        }
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_lines == Some(0) {
            return Err(ChunkError::InvalidConfig {
                message: "max_lines must be greater than zero",
            });
        }

        if self.delimiter.is_empty() {
            return Err(ChunkError::InvalidConfig {
                message: "delimiter must not be empty",
            });
        }

        if self.index_width == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "index_width must be at least one digit",
            });
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_lines: Some(DEFAULT_MAX_LINES),
            delimiter: DEFAULT_DELIMITER.to_string(),
            index_width: DEFAULT_INDEX_WIDTH,
            keep_extension: true,
            verbose: true,
        }
    }
}
