//! Splits standard input into chunk files of at most N lines, then reads the
//! chunks back and reports what was written.
//!
//! Run with:
//!     seq 1 25 | RUST_LOG=linechunk=debug cargo run --example rotate_lines -- /tmp/seq.txt 10

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

use linechunk::{ChunkConfig, ChunkFormat, ChunkedReader, ChunkedWriter, list_chunks};

fn run(path: &str, max_lines: usize) -> linechunk::Result<()> {
    let config = ChunkConfig::new(max_lines)?;

    let mut writer = ChunkedWriter::create(path, config.clone())?;
    io::copy(&mut io::stdin().lock(), &mut writer)?;
    writer.close()?;

    for entry in list_chunks(path, &ChunkFormat::from_config(&config))? {
        println!("chunk {:>4}  {}", entry.index, entry.path.display());
    }

    let mut reader = ChunkedReader::open(path, config)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    println!("{} lines, {} bytes", text.lines().count(), text.len());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(max_lines)) = (args.next(), args.next()) else {
        eprintln!("usage: rotate_lines <path> <max-lines>");
        return ExitCode::FAILURE;
    };
    let Ok(max_lines) = max_lines.parse() else {
        eprintln!("max-lines must be a positive integer");
        return ExitCode::FAILURE;
    };

    match run(&path, max_lines) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
