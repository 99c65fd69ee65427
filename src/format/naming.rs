//! Formatting and parsing of chunk file names.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::{ChunkConfig, DEFAULT_INDEX_WIDTH};
use crate::error::{ChunkError, Result};

use super::walk::ChunkWalk;

/// Position of a chunk within its logical stream, dense from 0.
pub type ChunkIndex = u64;

/// The subdirectory-numbered chunk naming scheme.
///
/// `format("/tmp/data.txt", 7)` yields `/tmp/data.txt/data.000007.txt`: the
/// logical path (extension included) is the directory, and the file name is
/// the logical stem, the zero-padded index and the logical extension joined
/// with dots. Indices wider than `index_width` are written in full.
///
/// With [`with_keep_extension(false)`](Self::with_keep_extension) the
/// extension is left off: `/tmp/data.txt/data.000007`.
///
/// # Example
///
/// ```
/// use linechunk::ChunkFormat;
/// use std::path::Path;
///
/// let format = ChunkFormat::default();
/// let path = format.format("/tmp/data.txt", 7)?;
/// assert_eq!(path, Path::new("/tmp/data.txt/data.000007.txt"));
///
/// let (logical, index) = format.parse(&path)?;
/// assert_eq!(logical, Path::new("/tmp/data.txt"));
/// assert_eq!(index, 7);
/// # Ok::<(), linechunk::ChunkError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkFormat {
    index_width: usize,
    keep_extension: bool,
}

impl ChunkFormat {
    /// Creates a format with the given minimum index width. Chunk names keep
    /// the logical extension.
    pub const fn new(index_width: usize) -> Self {
        Self {
            index_width,
            keep_extension: true,
        }
    }

    /// Sets whether chunk names end with the logical path's extension.
    pub const fn with_keep_extension(mut self, keep_extension: bool) -> Self {
        self.keep_extension = keep_extension;
        self
    }

    /// Creates the format described by a configuration.
    pub fn from_config(config: &ChunkConfig) -> Self {
        Self::new(config.index_width()).with_keep_extension(config.keep_extension())
    }

    /// Returns the minimum index width.
    pub fn index_width(&self) -> usize {
        self.index_width
    }

    /// Returns whether chunk names keep the logical extension.
    pub fn keep_extension(&self) -> bool {
        self.keep_extension
    }

    /// Builds the chunk file path for `index` of the stream at `logical`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::MalformedChunkName`] if `logical` has no final
    /// path segment to derive a file name from (e.g. `/` or `..`).
    pub fn format(&self, logical: impl AsRef<Path>, index: ChunkIndex) -> Result<PathBuf> {
        let parts = self.name_parts(logical.as_ref())?;
        Ok(parts.chunk_path(index, self.index_width))
    }

    /// Like [`format`](Self::format) but for indices coming from signed
    /// sources.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidIndex`] for negative indices.
    pub fn format_checked(&self, logical: impl AsRef<Path>, index: i64) -> Result<PathBuf> {
        let index = ChunkIndex::try_from(index).map_err(|_| ChunkError::InvalidIndex { index })?;
        self.format(logical, index)
    }

    /// Recovers `(logical path, index)` from a chunk file path.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::MalformedChunkName`] if the file name has fewer
    /// than three dot-separated segments or its second-to-last segment is not
    /// a non-negative decimal integer. Without kept extensions the index is
    /// the last of at least two segments.
    pub fn parse(&self, chunk_path: impl AsRef<Path>) -> Result<(PathBuf, ChunkIndex)> {
        let chunk_path = chunk_path.as_ref();
        let malformed = |reason| ChunkError::MalformedChunkName {
            path: chunk_path.to_path_buf(),
            reason,
        };

        let name = chunk_path
            .file_name()
            .ok_or_else(|| malformed("path has no file name"))?
            .to_str()
            .ok_or_else(|| malformed("file name is not valid UTF-8"))?;

        let segments: Vec<&str> = name.split('.').collect();
        let (min_segments, from_end) = if self.keep_extension { (3, 2) } else { (2, 1) };
        if segments.len() < min_segments {
            return Err(malformed(if self.keep_extension {
                "expected at least three dot-separated segments"
            } else {
                "expected at least two dot-separated segments"
            }));
        }

        let index = parse_index(segments[segments.len() - from_end])
            .ok_or_else(|| malformed("index segment is not a non-negative 64-bit integer"))?;

        let logical = chunk_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok((logical, index))
    }

    /// Starts a lazy enumeration of the chunks of `logical`, from index 0.
    ///
    /// Every call re-walks from the beginning; nothing is cached.
    pub fn walk(&self, logical: impl AsRef<Path>) -> Result<ChunkWalk> {
        let parts = self.name_parts(logical.as_ref())?;
        Ok(ChunkWalk::new(parts, self.index_width))
    }

    pub(crate) fn name_parts(&self, logical: &Path) -> Result<NameParts> {
        let mut parts = NameParts::split(logical)?;
        if !self.keep_extension {
            parts.extension = None;
        }
        Ok(parts)
    }
}

impl Default for ChunkFormat {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_WIDTH)
    }
}

fn parse_index(digits: &str) -> Option<ChunkIndex> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A logical path pre-split into the pieces every chunk name is built from.
#[derive(Debug, Clone)]
pub(crate) struct NameParts {
    dir: PathBuf,
    stem: OsString,
    extension: Option<OsString>,
}

impl NameParts {
    fn split(logical: &Path) -> Result<Self> {
        let stem = logical
            .file_stem()
            .ok_or_else(|| ChunkError::MalformedChunkName {
                path: logical.to_path_buf(),
                reason: "logical path has no file name",
            })?
            .to_os_string();

        Ok(Self {
            dir: logical.to_path_buf(),
            stem,
            extension: logical.extension().map(|e| e.to_os_string()),
        })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn chunk_path(&self, index: ChunkIndex, width: usize) -> PathBuf {
        let mut name = self.stem.clone();
        name.push(format!(".{index:0width$}"));
        if let Some(extension) = &self.extension {
            name.push(".");
            name.push(extension);
        }
        self.dir.join(name)
    }

    /// Returns the index if `file_name` is a chunk name of this stream, at
    /// any index width.
    pub(crate) fn match_index(&self, file_name: &OsStr) -> Option<ChunkIndex> {
        let name = file_name.to_str()?;
        let mut rest = name.strip_prefix(self.stem.to_str()?)?.strip_prefix('.')?;
        if let Some(extension) = &self.extension {
            rest = rest
                .strip_suffix(extension.to_str()?)?
                .strip_suffix('.')?;
        }
        parse_index(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_default_width() {
        let format = ChunkFormat::default();
        assert_eq!(
            format.format("/tmp/test_file.txt", 0).unwrap(),
            Path::new("/tmp/test_file.txt/test_file.000000.txt")
        );
    }

    #[test]
    fn test_format_index_wider_than_width() {
        let format = ChunkFormat::default();
        assert_eq!(
            format.format("/tmp/test_file.txt", 1_234_567).unwrap(),
            Path::new("/tmp/test_file.txt/test_file.1234567.txt")
        );
    }

    #[test]
    fn test_format_custom_width() {
        let format = ChunkFormat::new(2);
        assert_eq!(
            format.format("logs/app.log", 3).unwrap(),
            Path::new("logs/app.log/app.03.log")
        );
    }

    #[test]
    fn test_format_without_extension() {
        let format = ChunkFormat::default();
        assert_eq!(
            format.format("/tmp/data", 1).unwrap(),
            Path::new("/tmp/data/data.000001")
        );
    }

    #[test]
    fn test_format_checked_rejects_negative() {
        let format = ChunkFormat::default();
        assert!(matches!(
            format.format_checked("/tmp/test_file.txt", -1),
            Err(ChunkError::InvalidIndex { index: -1 })
        ));
        assert!(format.format_checked("/tmp/test_file.txt", 5).is_ok());
    }

    #[test]
    fn test_format_rejects_root() {
        let format = ChunkFormat::default();
        assert!(matches!(
            format.format("/", 0),
            Err(ChunkError::MalformedChunkName { .. })
        ));
    }

    #[test]
    fn test_parse() {
        let format = ChunkFormat::default();
        assert_eq!(
            format.parse("/tmp/test_file.txt/test_file.000000.txt").unwrap(),
            (PathBuf::from("/tmp/test_file.txt"), 0)
        );
        assert_eq!(
            format.parse("/tmp/test_file.txt/test_file.1234567.txt").unwrap(),
            (PathBuf::from("/tmp/test_file.txt"), 1_234_567)
        );
        assert_eq!(
            format
                .parse("/tmp/test_file.something.txt/test_file.something.001234.txt")
                .unwrap(),
            (PathBuf::from("/tmp/test_file.something.txt"), 1234)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let format = ChunkFormat::default();
        for path in [
            "/tmp/test_file.txt/test_file.eins.txt",
            "/tmp/test_file.txt/test_file.-1.txt",
            "/tmp/test_file.txt/test_file.+1.txt",
            "/tmp/test_file.txt/test_file..txt",
            "/tmp/test_file.txt/test_file.txt",
        ] {
            assert!(
                matches!(
                    format.parse(path),
                    Err(ChunkError::MalformedChunkName { .. })
                ),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_is_independent_of_width() {
        let narrow = ChunkFormat::new(2);
        let wide = ChunkFormat::new(8);
        let path = narrow.format("/tmp/a.csv", 42).unwrap();
        assert_eq!(wide.parse(&path).unwrap(), (PathBuf::from("/tmp/a.csv"), 42));
    }

    #[test]
    fn test_format_and_parse_without_kept_extension() {
        let format = ChunkFormat::default().with_keep_extension(false);
        let path = format.format("/tmp/data.txt", 12).unwrap();
        assert_eq!(path, Path::new("/tmp/data.txt/data.000012"));
        assert_eq!(format.parse(&path).unwrap(), (PathBuf::from("/tmp/data.txt"), 12));
        assert!(format.parse("/tmp/data.txt/data").is_err());
    }

    #[test]
    fn test_match_index() {
        let parts = ChunkFormat::default().name_parts(Path::new("/tmp/a.b.txt")).unwrap();
        assert_eq!(parts.match_index(OsStr::new("a.b.000003.txt")), Some(3));
        assert_eq!(parts.match_index(OsStr::new("a.b.3.txt")), Some(3));
        assert_eq!(parts.match_index(OsStr::new("a.b.000003.csv")), None);
        assert_eq!(parts.match_index(OsStr::new("a.000003.txt")), None);
        assert_eq!(parts.match_index(OsStr::new("a.b..txt")), None);

        let bare = ChunkFormat::default().name_parts(Path::new("/tmp/data")).unwrap();
        assert_eq!(bare.match_index(OsStr::new("data.000000")), Some(0));
        assert_eq!(bare.match_index(OsStr::new("data.000000.txt")), None);
        assert_eq!(bare.match_index(OsStr::new("data")), None);
    }
}
