//! Mode-string dispatch to the chunked reader, the chunked writer or a plain
//! file.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::reader::ChunkedReader;
use crate::writer::ChunkedWriter;

/// Direction requested by an open mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `"r"` or `"rt"`.
    Read,
    /// `"w"` or `"wt"`.
    Write,
}

impl OpenMode {
    /// Parses a mode string made of the characters `r`, `w` and `t`.
    ///
    /// Exactly one of `r` and `w` must be present. Binary, append, exclusive
    /// and update modes are rejected.
    pub fn parse(mode: &str) -> Result<Self> {
        let invalid = || ChunkError::InvalidMode {
            mode: mode.to_owned(),
        };

        if !mode.chars().all(|c| matches!(c, 'r' | 'w' | 't')) {
            return Err(invalid());
        }
        match (mode.contains('r'), mode.contains('w')) {
            (true, false) => Ok(Self::Read),
            (false, true) => Ok(Self::Write),
            _ => Err(invalid()),
        }
    }
}

/// A stream returned by [`open`].
#[derive(Debug)]
pub enum ChunkedFile {
    /// Read mode: the chunks of the logical stream, in order.
    Reader(ChunkedReader),
    /// Write mode with a line budget.
    Writer(ChunkedWriter),
    /// Write mode without a line budget: one ordinary file at the path.
    Plain(File),
}

impl ChunkedFile {
    /// Flushes and closes the stream, surfacing errors that dropping would
    /// only log.
    pub fn close(self) -> Result<()> {
        match self {
            Self::Reader(reader) => {
                reader.close();
                Ok(())
            }
            Self::Writer(writer) => writer.close(),
            Self::Plain(mut file) => {
                file.flush()?;
                Ok(())
            }
        }
    }
}

/// Opens `path` in `mode`.
///
/// Read mode always yields a [`ChunkedReader`]. Write mode yields a
/// [`ChunkedWriter`] when `config` sets `max_lines`, and otherwise creates
/// (or truncates) a single plain file at `path`.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use linechunk::{ChunkConfig, ChunkedFile, open};
///
/// let mut out = open("/tmp/out.txt", "w", &ChunkConfig::new(100)?)?;
/// writeln!(out, "hello")?;
/// out.close()?;
///
/// let ChunkedFile::Reader(reader) = open("/tmp/out.txt", "r", &ChunkConfig::default())? else {
///     unreachable!();
/// };
/// for line in reader {
///     print!("{}", line?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open(path: impl AsRef<Path>, mode: &str, config: &ChunkConfig) -> Result<ChunkedFile> {
    let path = path.as_ref();
    let mode = OpenMode::parse(mode)?;

    let file = match (mode, config.max_lines()) {
        (OpenMode::Read, _) => ChunkedFile::Reader(ChunkedReader::open(path, config.clone())?),
        (OpenMode::Write, Some(_)) => {
            ChunkedFile::Writer(ChunkedWriter::create(path, config.clone())?)
        }
        (OpenMode::Write, None) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            ChunkedFile::Plain(File::create(path)?)
        }
    };

    debug!(path = %path.display(), ?mode, "opened");
    Ok(file)
}

fn unsupported(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{operation} is not supported in this mode"),
    )
}

impl Write for ChunkedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Writer(writer) => Write::write(writer, buf),
            Self::Plain(file) => file.write(buf),
            Self::Reader(_) => Err(unsupported("write")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Writer(writer) => Write::flush(writer),
            Self::Plain(file) => file.flush(),
            Self::Reader(_) => Ok(()),
        }
    }
}

impl Read for ChunkedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Reader(reader) => reader.read(buf),
            Self::Writer(_) | Self::Plain(_) => Err(unsupported("read")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(OpenMode::parse("r").unwrap(), OpenMode::Read);
        assert_eq!(OpenMode::parse("rt").unwrap(), OpenMode::Read);
        assert_eq!(OpenMode::parse("w").unwrap(), OpenMode::Write);
        assert_eq!(OpenMode::parse("tw").unwrap(), OpenMode::Write);
    }

    #[test]
    fn test_parse_mode_rejects() {
        for mode in ["", "t", "rw", "rb", "wb", "a", "w+", "x", "r+"] {
            assert!(
                matches!(OpenMode::parse(mode), Err(ChunkError::InvalidMode { .. })),
                "{mode:?} accepted"
            );
        }
    }

    #[test]
    fn test_open_write_with_budget_is_chunked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut file = open(&path, "w", &ChunkConfig::new(1).unwrap()).unwrap();
        assert!(matches!(file, ChunkedFile::Writer(_)));
        file.write_all(b"a\nb\n").unwrap();
        file.close().unwrap();

        assert_eq!(fs::read_to_string(path.join("out.000000.txt")).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(path.join("out.000001.txt")).unwrap(), "b\n");
    }

    #[test]
    fn test_open_write_without_budget_is_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        let config = ChunkConfig::default().with_max_lines(None);

        let mut file = open(&path, "wt", &config).unwrap();
        assert!(matches!(file, ChunkedFile::Plain(_)));
        file.write_all(b"a\nb\n").unwrap();
        file.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_open_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");

        let mut file = open(&path, "w", &ChunkConfig::new(2).unwrap()).unwrap();
        file.write_all(b"1\n2\n3\n").unwrap();
        file.close().unwrap();

        let mut file = open(&path, "r", &ChunkConfig::default()).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "1\n2\n3\n");
        assert_eq!(
            file.write(b"x").unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_open_invalid_mode() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path().join("a.txt"), "ab", &ChunkConfig::default()).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidMode { mode } if mode == "ab"));
    }
}
