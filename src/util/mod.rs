//! Line-part helpers shared by the chunker, writer and reader.
//!
//! A *line part* is any fragment of text handed to a write: a whole line, a
//! piece of one, or the terminated lines split out of a larger buffer.

/// Returns the offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    match needle {
        [] => None,
        [byte] => haystack.iter().position(|b| b == byte),
        _ => haystack
            .windows(needle.len())
            .position(|window| window == needle),
    }
}

/// Returns the length of the longest proper prefix of `delimiter` that
/// `text` ends with. Always 0 for single-byte delimiters.
pub(crate) fn open_delimiter_suffix(text: &[u8], delimiter: &[u8]) -> usize {
    (1..delimiter.len())
        .rev()
        .find(|&len| text.ends_with(&delimiter[..len]))
        .unwrap_or(0)
}

/// Splits `text` into delimiter-terminated parts plus, if present, one
/// trailing unterminated part. Every terminated part keeps its delimiter.
/// An empty remainder after the last delimiter is not returned.
///
/// ```
/// use linechunk::split_line_parts;
///
/// let parts = split_line_parts(b"first\nsec", b"\n");
/// assert_eq!(parts, vec![&b"first\n"[..], &b"sec"[..]]);
/// ```
pub fn split_line_parts<'a>(text: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some(at) = find(rest, delimiter) {
        let (line, tail) = rest.split_at(at + delimiter.len());
        parts.push(line);
        rest = tail;
    }

    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

/// Groups consecutive parts into lines. Each group ends with a terminated
/// part, except the last group when the input ends mid-line.
pub fn group_into_lines<'a, P: AsRef<[u8]>>(parts: &'a [P], delimiter: &[u8]) -> Vec<&'a [P]> {
    let mut groups = Vec::new();
    let mut start = 0;

    for (i, part) in parts.iter().enumerate() {
        if part.as_ref().ends_with(delimiter) {
            groups.push(&parts[start..=i]);
            start = i + 1;
        }
    }

    if start < parts.len() {
        groups.push(&parts[start..]);
    }
    groups
}
