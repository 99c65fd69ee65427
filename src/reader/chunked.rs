//! The chunked reader.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::format::{ChunkFormat, ChunkIndex, ChunkWalk};

use super::line::read_bounded;

#[derive(Debug)]
enum ReaderState {
    NotOpened,
    Reading {
        index: ChunkIndex,
        file: BufReader<File>,
    },
}

/// Reads a directory of chunk files back as one logical text stream.
///
/// Chunks are opened lazily in index order through a [`ChunkWalk`]; empty
/// chunk files are skipped, and the first missing index ends the stream.
/// At most one chunk file is open at a time, and the previous one is only
/// released after the next one has been opened.
///
/// Reaching the end is not final. The last chunk stays open, and a later
/// read first picks up whatever was appended to it, then probes for the
/// next chunk again, so a stream that is still being written can be
/// followed.
///
/// # Example
///
/// ```no_run
/// use linechunk::{ChunkConfig, ChunkedReader};
///
/// let reader = ChunkedReader::open("/tmp/data.txt", ChunkConfig::default())?;
/// for line in reader {
///     print!("{}", line?);
/// }
/// # Ok::<(), linechunk::ChunkError>(())
/// ```
#[derive(Debug)]
pub struct ChunkedReader {
    path: PathBuf,
    config: ChunkConfig,
    walk: ChunkWalk,
    state: ReaderState,
    at_end: bool,
}

impl ChunkedReader {
    /// Creates a reader for the stream at `path`. No file is opened until
    /// the first read. `max_lines` is ignored.
    pub fn open(path: impl AsRef<Path>, config: ChunkConfig) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref().to_path_buf();
        let walk = ChunkFormat::from_config(&config).walk(&path)?;

        Ok(Self {
            path,
            config,
            walk,
            state: ReaderState::NotOpened,
            at_end: false,
        })
    }

    /// Reads one line, including its delimiter.
    ///
    /// With `Some(limit)`, at most `limit` bytes are returned (rounded down
    /// to a character boundary, but never less than one character); the rest
    /// of the line is returned by the next call. A line never continues into
    /// the next chunk file. An empty string means the logical stream has
    /// ended.
    pub fn readline(&mut self, limit: Option<usize>) -> Result<String> {
        let mut line = Vec::new();
        self.read_line_bytes(limit, &mut line)?;
        into_string(line)
    }

    /// Reads lines until their total size reaches `hint` bytes, or all
    /// remaining lines when `hint` is `None` or `Some(0)`.
    ///
    /// The hint is a minimum: the line that crosses it is returned whole.
    pub fn readlines(&mut self, hint: Option<usize>) -> Result<Vec<String>> {
        let hint = hint.filter(|&h| h > 0);
        let mut lines = Vec::new();
        let mut total = 0;

        loop {
            let line = self.readline(None)?;
            if line.is_empty() {
                break;
            }

            total += line.len();
            lines.push(line);
            if hint.is_some_and(|h| total >= h) {
                break;
            }
        }
        Ok(lines)
    }

    /// Reads up to `limit` bytes of the logical stream (everything that is
    /// left when `None`), crossing chunk files as needed.
    pub fn read_string(&mut self, limit: Option<usize>) -> Result<String> {
        let mut out = Vec::new();

        loop {
            let remaining = limit.map(|l| l.saturating_sub(out.len()));
            if remaining == Some(0) {
                break;
            }

            if let ReaderState::Reading { file, .. } = &mut self.state {
                if read_bounded(file, None, remaining, &mut out)? > 0 {
                    self.at_end = false;
                    continue;
                }
            }
            if !self.advance()? {
                break;
            }
        }
        into_string(out)
    }

    /// Moves within the current chunk file and returns the new position.
    ///
    /// The position is relative to the current physical chunk, not to the
    /// logical stream.
    pub fn seek_in_chunk(&mut self, pos: SeekFrom) -> Result<u64> {
        self.warn_chunk_scoped("seek");
        let file = self.open_file()?;
        Ok(file.seek(pos)?)
    }

    /// Returns the read position within the current chunk file.
    pub fn position_in_chunk(&mut self) -> Result<u64> {
        self.warn_chunk_scoped("position");
        let file = self.open_file()?;
        Ok(file.stream_position()?)
    }

    /// Releases the open chunk file, if any.
    pub fn close(self) {
        debug!(path = %self.path.display(), "closed chunked reader");
    }

    /// Returns the logical path of the stream.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration the reader was built with.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Returns the index of the chunk file currently open. At the end of
    /// the stream this is the last chunk read.
    pub fn current_index(&self) -> Option<ChunkIndex> {
        match &self.state {
            ReaderState::Reading { index, .. } => Some(*index),
            ReaderState::NotOpened => None,
        }
    }

    /// Returns true when the last read ran past the end of the stream.
    pub fn is_exhausted(&self) -> bool {
        self.at_end
    }

    fn read_line_bytes(&mut self, limit: Option<usize>, out: &mut Vec<u8>) -> Result<usize> {
        if limit == Some(0) {
            return Ok(0);
        }

        loop {
            if let ReaderState::Reading { file, .. } = &mut self.state {
                let delimiter = self.config.delimiter().as_bytes();
                let n = read_bounded(file, Some(delimiter), limit, out)?;
                if n > 0 {
                    self.at_end = false;
                    return Ok(n);
                }
            }
            if !self.advance()? {
                return Ok(0);
            }
        }
    }

    /// Opens the next chunk file. Returns false at the end of the stream,
    /// keeping the current chunk open so appended text is still seen.
    fn advance(&mut self) -> Result<bool> {
        let Some(entry) = self.walk.peek() else {
            if !self.at_end {
                debug!(path = %self.path.display(), "reached end of chunked stream");
            }
            self.at_end = true;
            return Ok(false);
        };

        let file = File::open(&entry.path)?;
        self.walk.advance();
        debug!(index = entry.index, path = %entry.path.display(), "opened chunk");

        self.state = ReaderState::Reading {
            index: entry.index,
            file: BufReader::new(file),
        };
        self.at_end = false;
        Ok(true)
    }

    fn open_file(&mut self) -> Result<&mut BufReader<File>> {
        match &mut self.state {
            ReaderState::Reading { file, .. } => Ok(file),
            ReaderState::NotOpened => Err(ChunkError::NotOpen),
        }
    }

    fn warn_chunk_scoped(&self, operation: &str) {
        if self.config.verbose() {
            warn!(
                operation,
                index = self.current_index(),
                "operation applies to the current chunk file only, not the logical stream"
            );
        }
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| ChunkError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if let ReaderState::Reading { file, .. } = &mut self.state {
                let n = file.read(buf)?;
                if n > 0 {
                    self.at_end = false;
                    return Ok(n);
                }
            }
            if !self.advance()? {
                return Ok(0);
            }
        }
    }
}

impl Iterator for ChunkedReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.readline(None) {
            Ok(line) if line.is_empty() => None,
            other => Some(other),
        }
    }
}
