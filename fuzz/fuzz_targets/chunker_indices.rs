#![no_main]

use libfuzzer_sys::fuzz_target;
use linechunk::{MaxLineChunker, SequentialChunker, group_into_lines, split_line_parts};

fuzz_target!(|data: &[u8]| {
    let Some((&budget, text)) = data.split_first() else {
        return;
    };
    let max_lines = usize::from(budget % 16) + 1;

    for delimiter in [&b"\n"[..], &b"\r\n"[..]] {
        // Cut each line into fragments of at most three bytes
        let parts: Vec<&[u8]> = split_line_parts(text, delimiter)
            .into_iter()
            .flat_map(|line| line.chunks(3))
            .collect();

        let mut batched = MaxLineChunker::new(max_lines, delimiter).unwrap();
        let mut stepped = batched.clone();

        let indices = batched.indices(&parts);
        let expected: Vec<u64> = parts.iter().map(|p| stepped.index(p)).collect();
        assert_eq!(indices, expected);
        assert_eq!(batched, stepped);

        // Verify: every fragment of a line lands in the same chunk
        let mut offset = 0;
        for line in group_into_lines(&parts, delimiter) {
            let first = indices[offset];
            assert!(indices[offset..offset + line.len()].iter().all(|&i| i == first));
            offset += line.len();
        }

        // Verify: indices never decrease and never skip
        for pair in indices.windows(2) {
            assert!(pair[1] == pair[0] || pair[1] == pair[0] + 1);
        }
    }
});
