//! linechunk
//!
//! Line-chunked text files for Rust.
//!
//! `linechunk` stores one logical text stream as a directory of numbered
//! chunk files, each holding at most a fixed number of lines:
//!
//! ```text
//! data.txt/
//!     data.000000.txt
//!     data.000001.txt
//!     ...
//! ```
//!
//! Writers split the stream at line boundaries, whatever the shape of the
//! individual writes. Readers stitch the chunks back together and skip empty
//! ones, so callers only ever see the logical stream.
//!
//! The crate intentionally:
//! - does NOT seek or tell across chunk boundaries
//! - does NOT chunk binary data
//! - does NOT coordinate concurrent writers
//!
//! # Writing
//!
//! ```no_run
//! use linechunk::{ChunkConfig, ChunkedWriter, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let mut writer = ChunkedWriter::create("logs/app.log", ChunkConfig::new(10_000)?)?;
//!     writer.write("starting\n")?;
//!     writer.write_lines(["ready\n", "serving\n"])?;
//!     writer.close()
//! }
//! ```
//!
//! # Reading
//!
//! ```no_run
//! use linechunk::{ChunkConfig, ChunkedReader, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let reader = ChunkedReader::open("logs/app.log", ChunkConfig::default())?;
//!     for line in reader {
//!         print!("{}", line?);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunker;
mod config;
mod error;
mod format;
mod open;
mod reader;
mod util;
mod writer;

//
// Public surface
//

pub use chunker::{MaxLineChunker, SequentialChunker};
pub use config::{ChunkConfig, DEFAULT_DELIMITER, DEFAULT_INDEX_WIDTH, DEFAULT_MAX_LINES};
pub use error::{ChunkError, Result};
pub use format::{ChunkEntry, ChunkFormat, ChunkIndex, ChunkWalk, list_chunks, scan_chunks};
pub use open::{ChunkedFile, OpenMode, open};
pub use reader::ChunkedReader;
pub use util::{group_into_lines, split_line_parts};
pub use writer::ChunkedWriter;
