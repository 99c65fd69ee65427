//! Error types for linechunk.

use std::io;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ChunkError> = std::result::Result<T, E>;

/// Errors that can occur while naming, writing or reading chunked streams.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// A chunk index outside the valid (non-negative) range was supplied.
    #[error("invalid chunk index: {index}")]
    InvalidIndex {
        /// The rejected index.
        index: i64,
    },

    /// A path does not follow the `stem.<index>.ext` chunk naming pattern.
    #[error("malformed chunk name {}: {reason}", path.display())]
    MalformedChunkName {
        /// The offending path.
        path: PathBuf,
        /// What part of the name failed to parse.
        reason: &'static str,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The open mode string requests something chunked files cannot do.
    #[error("unsupported open mode {mode:?} (accepted: r, w, t)")]
    InvalidMode {
        /// The rejected mode string.
        mode: String,
    },

    /// A chunk-scoped operation was requested while no chunk file is open.
    #[error("no chunk file is currently open")]
    NotOpen,

    /// An I/O error occurred on an underlying chunk file.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ChunkError> for io::Error {
    fn from(e: ChunkError) -> Self {
        match e {
            ChunkError::Io(e) => e,
            not_open @ ChunkError::NotOpen => io::Error::new(io::ErrorKind::NotConnected, not_open),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
