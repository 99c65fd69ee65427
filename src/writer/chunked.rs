//! The chunked writer.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::mem;
use std::path::{Path, PathBuf};

use bytes::{Buf, BytesMut};
use tracing::{debug, trace, warn};

use crate::chunker::{MaxLineChunker, SequentialChunker};
use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::format::{ChunkFormat, ChunkIndex, NameParts, scan_chunks};
use crate::util::{open_delimiter_suffix, split_line_parts};

#[derive(Debug)]
enum WriterState {
    Open {
        index: ChunkIndex,
        file: BufWriter<File>,
    },
    Closed,
}

/// Contiguous bytes bound for one chunk, not yet handed to its file.
#[derive(Debug)]
struct Run {
    index: ChunkIndex,
    data: BytesMut,
}

/// Writes a logical text stream as a directory of chunk files.
///
/// Text is split into line parts, the chunker assigns each part a chunk
/// index, and contiguous parts for the same chunk are written together. A
/// logical line always lands in a single chunk file, however it was split
/// across calls.
///
/// Exactly one chunk file is open at any time. Chunk 0 is created eagerly
/// by [`create`](ChunkedWriter::create), together with the directory.
/// Opening replaces the logical stream: chunk files left at the same path
/// by an earlier stream are removed.
///
/// # Failed rollovers
///
/// If the next chunk file cannot be opened, the previous chunk stays open
/// and flushed, and the text that was not written stays queued. The write
/// that queued it still succeeds. The next [`write`](ChunkedWriter::write),
/// [`flush`](ChunkedWriter::flush) or [`close`](ChunkedWriter::close) tries
/// the same chunk again first and returns the error if it still fails,
/// without taking any new text. Retrying a failed call is therefore safe.
///
/// # Multi-byte delimiters
///
/// When a write ends with the beginning of a multi-byte delimiter, those
/// bytes are held back until the next write (or close) shows whether the
/// delimiter completes.
///
/// # Example
///
/// ```no_run
/// use linechunk::{ChunkConfig, ChunkedWriter};
///
/// let mut writer = ChunkedWriter::create("/tmp/data.txt", ChunkConfig::new(2)?)?;
/// writer.write("first\nsec")?;
/// writer.write("ond\nthird\n")?;
/// writer.close()?;
/// // /tmp/data.txt/data.000000.txt: "first\nsecond\n"
/// // /tmp/data.txt/data.000001.txt: "third\n"
/// # Ok::<(), linechunk::ChunkError>(())
/// ```
#[derive(Debug)]
pub struct ChunkedWriter<C: SequentialChunker = MaxLineChunker> {
    path: PathBuf,
    config: ChunkConfig,
    names: NameParts,
    chunker: C,
    state: WriterState,
    highest_opened: ChunkIndex,
    backlog: VecDeque<Run>,
    held: BytesMut,
}

impl ChunkedWriter<MaxLineChunker> {
    /// Creates a writer that rolls over every `max_lines` complete lines.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration has no
    /// (or a zero) `max_lines`, and [`ChunkError::Io`] if the directory or
    /// the first chunk file cannot be created.
    pub fn create(path: impl AsRef<Path>, config: ChunkConfig) -> Result<Self> {
        let chunker = MaxLineChunker::from_config(&config)?;
        Self::with_chunker(path, config, chunker)
    }
}

impl<C: SequentialChunker> ChunkedWriter<C> {
    /// Creates a writer driven by a custom chunker.
    ///
    /// The chunker must hand out non-decreasing indices. A chunk that is
    /// revisited is appended to, never truncated.
    pub fn with_chunker(path: impl AsRef<Path>, config: ChunkConfig, chunker: C) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref().to_path_buf();
        let format = ChunkFormat::from_config(&config);
        let names = format.name_parts(&path)?;
        fs::create_dir_all(names.dir())?;

        for stale in scan_chunks(&path, &format)? {
            debug!(path = %stale.path.display(), "removing chunk of previous stream");
            fs::remove_file(&stale.path)?;
        }

        let index = chunker.current_index();
        let chunk_path = names.chunk_path(index, config.index_width());
        let file = File::create(&chunk_path)?;
        debug!(index, path = %chunk_path.display(), "opened first chunk");

        Ok(Self {
            path,
            config,
            names,
            chunker,
            state: WriterState::Open {
                index,
                file: BufWriter::new(file),
            },
            highest_opened: index,
            backlog: VecDeque::new(),
            held: BytesMut::new(),
        })
    }

    /// Writes text to the logical stream.
    ///
    /// Returns the number of bytes of `text` accepted, which is always
    /// `text.len()` on success. Once accepted, the text is never dropped:
    /// if a chunk cannot be opened it stays queued, and the error is
    /// reported by the next call, which retries before taking new text.
    /// On `Err` nothing of `text` was accepted.
    pub fn write(&mut self, text: &str) -> Result<usize> {
        self.write_bytes(text.as_bytes())
    }

    /// Writes raw bytes to the logical stream. Lines are split on the bytes
    /// of the configured delimiter.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        self.drain()?;

        let mut text = mem::take(&mut self.held);
        text.extend_from_slice(data);

        let delimiter = self.config.delimiter().as_bytes();
        let mut parts = split_line_parts(&text, delimiter);

        let mut held_len = 0;
        if let Some(&last) = parts.last() {
            if !last.ends_with(delimiter) {
                held_len = open_delimiter_suffix(last, delimiter);
                parts.pop();
                if held_len < last.len() {
                    parts.push(&last[..last.len() - held_len]);
                }
            }
        }

        self.enqueue(&parts);
        self.held = text.split_off(text.len() - held_len);

        if let Err(e) = self.drain() {
            warn!(error = %e, pending = self.pending_len(), "chunk rollover failed, text stays queued");
        }
        Ok(data.len())
    }

    /// Writes every item in order, with the same on-disk result as one
    /// [`write`](Self::write) of their concatenation. No delimiters are added.
    pub fn write_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = BytesMut::new();
        for line in lines {
            text.extend_from_slice(line.as_ref().as_bytes());
        }
        self.write_bytes(&text)?;
        Ok(())
    }

    /// Writes any queued text and flushes the current chunk file.
    pub fn flush(&mut self) -> Result<()> {
        self.drain()?;
        if let WriterState::Open { file, .. } = &mut self.state {
            file.flush()?;
        }
        Ok(())
    }

    /// Writes everything still held or queued, flushes and closes the
    /// current chunk file.
    pub fn close(mut self) -> Result<()> {
        self.finish()
    }

    /// Returns the logical path of the stream.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration the writer was built with.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Returns the chunker driving this writer.
    pub fn chunker(&self) -> &C {
        &self.chunker
    }

    /// Returns the index of the chunk file currently open.
    pub fn current_index(&self) -> ChunkIndex {
        match &self.state {
            WriterState::Open { index, .. } => *index,
            WriterState::Closed => self.chunker.current_index(),
        }
    }

    /// Returns the path of the chunk file currently open.
    pub fn current_chunk_path(&self) -> PathBuf {
        self.names
            .chunk_path(self.current_index(), self.config.index_width())
    }

    /// Returns the number of accepted bytes not yet handed to a chunk file.
    pub fn pending_len(&self) -> usize {
        self.held.len() + self.backlog.iter().map(|run| run.data.len()).sum::<usize>()
    }

    /// Returns the write position within the current chunk file.
    ///
    /// This is a position in the current physical chunk, not in the
    /// logical stream.
    pub fn position_in_chunk(&mut self) -> Result<u64> {
        self.warn_chunk_scoped("position");
        let file = self.open_file()?;
        Ok(file.stream_position()?)
    }

    /// Truncates the current chunk file to `len` bytes and moves the write
    /// position to its new end.
    ///
    /// Only the current physical chunk is affected, and the chunker's line
    /// count is not adjusted.
    pub fn truncate_chunk(&mut self, len: u64) -> Result<()> {
        self.warn_chunk_scoped("truncate");
        let file = self.open_file()?;
        file.flush()?;
        file.get_ref().set_len(len)?;
        file.seek(SeekFrom::End(0))?;
        Ok(())
    }

    fn open_file(&mut self) -> Result<&mut BufWriter<File>> {
        match &mut self.state {
            WriterState::Open { file, .. } => Ok(file),
            WriterState::Closed => Err(ChunkError::NotOpen),
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

    fn enqueue(&mut self, parts: &[&[u8]]) {
        let indices = self.chunker.indices(parts);
        trace!(parts = parts.len(), "queued line parts");

        for (part, index) in parts.iter().zip(indices) {
            match self.backlog.back_mut() {
                Some(run) if run.index == index => run.data.extend_from_slice(part),
                _ => self.backlog.push_back(Run {
                    index,
                    data: BytesMut::from(*part),
                }),
            }
        }
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(target) = self.backlog.front().map(|run| run.index) {
            if !matches!(self.state, WriterState::Open { index, .. } if index == target) {
                self.roll_to(target)?;
            }

            let WriterState::Open { file, .. } = &mut self.state else {
                return Err(ChunkError::NotOpen);
            };
            if let Some(run) = self.backlog.front_mut() {
                write_run(file, &mut run.data)?;
            }
            self.backlog.pop_front();
        }
        Ok(())
    }

    fn roll_to(&mut self, index: ChunkIndex) -> Result<()> {
        if let WriterState::Open { file, .. } = &mut self.state {
            file.flush()?;
        }

        let path = self.names.chunk_path(index, self.config.index_width());
        let file = if index > self.highest_opened {
            File::create(&path)?
        } else {
            OpenOptions::new().create(true).append(true).open(&path)?
        };
        debug!(index, path = %path.display(), "rolled over to chunk");

        // The previous handle is released only now that the next one is open.
        self.highest_opened = self.highest_opened.max(index);
        self.state = WriterState::Open {
            index,
            file: BufWriter::new(file),
        };
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if matches!(self.state, WriterState::Closed) {
            return Ok(());
        }

        let held = mem::take(&mut self.held);
        if !held.is_empty() {
            self.enqueue(&[&held[..]]);
        }
        self.flush()?;

        self.state = WriterState::Closed;
        debug!(path = %self.path.display(), "closed chunked writer");
        Ok(())
    }
}

/// Writes `data` to `out`, consuming from `data` exactly what was written,
/// so a retry after an error resumes where the failed write stopped.
fn write_run<W: Write>(out: &mut W, data: &mut BytesMut) -> io::Result<()> {
    while !data.is_empty() {
        match out.write(data) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => data.advance(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl<C: SequentialChunker> Write for ChunkedWriter<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(ChunkedWriter::flush(self)?)
    }
}

impl<C: SequentialChunker> Drop for ChunkedWriter<C> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(error = %e, path = %self.path.display(), "failed to close chunked writer");
        }
    }
}
