/// Split `text` into contiguous spans of at most `chars_per_chunk` characters.
///
/// Boundaries fall on `char` boundaries, so multi-byte text is never cut
/// mid-character. Concatenating the result reproduces `text` exactly.
pub fn split(text: &str, chars_per_chunk: usize) -> Vec<&str> {
    let size = chars_per_chunk.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
