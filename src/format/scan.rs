//! Directory-listing discovery of chunk files.

use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;

use crate::error::Result;

use super::naming::ChunkFormat;
use super::walk::ChunkEntry;

/// Lists every chunk file of `logical` present on disk, gaps included,
/// sorted by index.
///
/// Unlike [`list_chunks`](super::list_chunks) this reads the whole directory.
/// A file counts as a chunk when its name is the stream's stem, a decimal
/// index of any width and, if the format keeps extensions, the stream's
/// extension. Everything else is skipped. A missing directory yields no
/// entries.
pub fn scan_chunks(logical: impl AsRef<Path>, format: &ChunkFormat) -> Result<Vec<ChunkEntry>> {
    let parts = format.name_parts(logical.as_ref())?;

    let dir = match fs::read_dir(parts.dir()) {
        Ok(dir) => dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for entry in dir {
        let entry = entry?;
        let Some(index) = parts.match_index(&entry.file_name()) else {
            trace!(name = ?entry.file_name(), "skipping non-chunk file");
            continue;
        };

        let path = entry.path();
        if path.is_file() {
            entries.push(ChunkEntry { path, index });
        }
    }

    entries.sort_by_key(|entry| entry.index);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_includes_gaps_and_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let logical = dir.path().join("data.txt");
        let format = ChunkFormat::default();
        fs::create_dir_all(&logical).unwrap();

        for index in [0, 1, 5] {
            fs::write(format.format(&logical, index).unwrap(), b"x\n").unwrap();
        }
        fs::write(logical.join("data.txt"), b"").unwrap();
        fs::write(logical.join("data.eins.txt"), b"").unwrap();
        fs::write(logical.join("other.000002.txt"), b"").unwrap();
        fs::write(logical.join("data.000003.csv"), b"").unwrap();

        let indices: Vec<_> = scan_chunks(&logical, &format)
            .unwrap()
            .into_iter()
            .map(|e| e.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 5]);
    }

    #[test]
    fn test_scan_accepts_other_widths() {
        let dir = tempfile::tempdir().unwrap();
        let logical = dir.path().join("data.txt");
        fs::create_dir_all(&logical).unwrap();
        fs::write(logical.join("data.07.txt"), b"").unwrap();

        let entries = scan_chunks(&logical, &ChunkFormat::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 7);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let entries = scan_chunks(dir.path().join("absent.txt"), &ChunkFormat::default()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_scan_extension_less_stream() {
        let dir = tempfile::tempdir().unwrap();
        let logical = dir.path().join("data");
        let format = ChunkFormat::default();
        fs::create_dir_all(&logical).unwrap();

        for index in [0, 2] {
            fs::write(format.format(&logical, index).unwrap(), b"x\n").unwrap();
        }
        fs::write(logical.join("data.000001.txt"), b"").unwrap();

        let indices: Vec<_> = scan_chunks(&logical, &format)
            .unwrap()
            .into_iter()
            .map(|e| e.index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
