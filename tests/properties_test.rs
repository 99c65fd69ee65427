// Property tests for chunk assignment, round trips and naming

use proptest::prelude::*;

use linechunk::{
    ChunkConfig, ChunkError, ChunkFormat, ChunkedReader, ChunkedWriter, MaxLineChunker,
    SequentialChunker, split_line_parts,
};

/// Lines of lowercase text, each terminated except possibly the last.
fn text_lines() -> impl Strategy<Value = Vec<String>> {
    (prop::collection::vec("[a-z ]{0,12}", 0..40), any::<bool>()).prop_map(|(lines, open_tail)| {
        let count = lines.len();
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if open_tail && i + 1 == count && !line.is_empty() {
                    line
                } else {
                    line + "\n"
                }
            })
            .collect()
    })
}

/// Cuts `text` at the given relative positions.
fn fragment(text: &str, cuts: &[prop::sample::Index]) -> Vec<String> {
    let mut offsets: Vec<usize> = cuts.iter().map(|c| c.index(text.len() + 1)).collect();
    offsets.push(0);
    offsets.push(text.len());
    offsets.sort_unstable();
    offsets.dedup();

    offsets
        .windows(2)
        .map(|w| text[w[0]..w[1]].to_string())
        .collect()
}

proptest! {
    #[test]
    fn final_index_after_complete_lines(max_lines in 1usize..20, n in 0usize..200) {
        let mut chunker = MaxLineChunker::new(max_lines, "\n").unwrap();
        chunker.indices(&vec!["line\n"; n]);

        let expected = if n == 0 { 0 } else { ((n - 1) / max_lines) as u64 };
        prop_assert_eq!(chunker.current_index(), expected);
    }

    #[test]
    fn batched_indices_match_single_steps(
        max_lines in 1usize..6,
        text in "[ab\n]{0,60}",
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let fragments = fragment(&text, &cuts);
        let parts: Vec<&[u8]> = fragments
            .iter()
            .flat_map(|f| split_line_parts(f.as_bytes(), b"\n"))
            .collect();

        let mut batched = MaxLineChunker::new(max_lines, "\n").unwrap();
        let mut stepped = batched.clone();

        let expected: Vec<u64> = parts.iter().map(|p| stepped.index(p)).collect();
        prop_assert_eq!(batched.indices(&parts), expected);
        prop_assert_eq!(batched, stepped);
    }

    #[test]
    fn round_trip_is_invariant_to_fragmentation(
        max_lines in 1usize..5,
        lines in text_lines(),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let logical = dir.path().join("prop.txt");
        let text = lines.concat();

        let mut writer = ChunkedWriter::create(&logical, ChunkConfig::new(max_lines).unwrap()).unwrap();
        for piece in fragment(&text, &cuts) {
            writer.write(&piece).unwrap();
        }
        writer.close().unwrap();

        let mut reader = ChunkedReader::open(&logical, ChunkConfig::default()).unwrap();
        prop_assert_eq!(reader.readlines(None).unwrap(), lines);
    }

    #[test]
    fn format_then_parse_recovers_path_and_index(
        stem in "[a-z][a-z_]{0,8}",
        ext in "[a-z]{1,4}",
        width in 1usize..10,
        index in any::<u64>(),
    ) {
        let format = ChunkFormat::new(width);
        let logical = std::path::PathBuf::from("/data").join(format!("{stem}.{ext}"));

        let chunk = format.format(&logical, index).unwrap();
        let (parsed, parsed_index) = format.parse(&chunk).unwrap();
        prop_assert_eq!(parsed, logical);
        prop_assert_eq!(parsed_index, index);
    }

    #[test]
    fn parse_rejects_non_numeric_index(stem in "[a-z]{1,8}", bad in "[a-z-]{1,4}") {
        let path = format!("/data/{stem}.txt/{stem}.{bad}.txt");
        let is_malformed = matches!(
            ChunkFormat::default().parse(&path),
            Err(ChunkError::MalformedChunkName { .. })
        );
        prop_assert!(is_malformed);
    }
}
