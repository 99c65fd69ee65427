//! Bounded reads from a single buffered chunk file.

use std::io::{self, BufRead};

/// Length of the UTF-8 sequence introduced by `lead`. Bytes that cannot
/// start a sequence count as one.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Appends bytes from `reader` to `out` until `delimiter` has been copied,
/// `limit` bytes have been copied, or the reader is exhausted.
///
/// The limit never cuts a UTF-8 sequence: reading stops before a character
/// that would overshoot it, except that at least one whole character is
/// always copied when one is available. Returns the number of bytes copied;
/// 0 means the reader is exhausted (or `limit` is 0).
pub(crate) fn read_bounded<R: BufRead>(
    reader: &mut R,
    delimiter: Option<&[u8]>,
    limit: Option<usize>,
    out: &mut Vec<u8>,
) -> io::Result<usize> {
    let start = out.len();
    if limit == Some(0) {
        return Ok(0);
    }

    let mut owed = 0;
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            break;
        }

        let mut used = 0;
        let mut done = false;
        for &byte in available {
            if owed == 0 {
                let copied = out.len() - start;
                if let Some(limit) = limit {
                    if copied > 0 && copied + sequence_len(byte) > limit {
                        done = true;
                        break;
                    }
                }
                owed = sequence_len(byte);
            }

            out.push(byte);
            used += 1;
            owed -= 1;

            if owed == 0 {
                let line = &out[start..];
                let at_delimiter = delimiter.is_some_and(|d| line.ends_with(d));
                let at_limit = limit.is_some_and(|l| line.len() >= l);
                if at_delimiter || at_limit {
                    done = true;
                    break;
                }
            }
        }

        reader.consume(used);
        if done {
            break;
        }
    }

    Ok(out.len() - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str, delimiter: Option<&str>, limit: Option<usize>) -> Vec<String> {
        let mut reader = io::BufReader::with_capacity(3, Cursor::new(input.as_bytes()));
        let mut pieces = Vec::new();
        loop {
            let mut out = Vec::new();
            let n = read_bounded(&mut reader, delimiter.map(str::as_bytes), limit, &mut out)
                .unwrap();
            if n == 0 {
                break;
            }
            pieces.push(String::from_utf8(out).unwrap());
        }
        pieces
    }

    #[test]
    fn test_lines() {
        assert_eq!(
            read_all("first line\nsecond\n\nlast", Some("\n"), None),
            vec!["first line\n", "second\n", "\n", "last"]
        );
    }

    #[test]
    fn test_limit_splits_line() {
        assert_eq!(
            read_all("first line\n", Some("\n"), Some(9)),
            vec!["first lin", "e\n"]
        );
    }

    #[test]
    fn test_multi_byte_delimiter_across_buffer_refills() {
        assert_eq!(
            read_all("ab<br>cd<br>e", Some("<br>"), None),
            vec!["ab<br>", "cd<br>", "e"]
        );
    }

    #[test]
    fn test_limit_respects_char_boundaries() {
        assert_eq!(
            read_all("héllo\n", Some("\n"), Some(2)),
            vec!["h", "é", "ll", "o\n"]
        );
        assert_eq!(read_all("€", None, Some(1)), vec!["€"]);
    }

    #[test]
    fn test_zero_limit_reads_nothing() {
        let mut reader = Cursor::new(b"abc".to_vec());
        let mut out = Vec::new();
        assert_eq!(read_bounded(&mut reader, None, Some(0), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
