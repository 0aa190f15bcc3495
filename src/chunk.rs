//! Passage chunking: fixed-size word windows over extracted text.

/// Split text on whitespace and greedily group consecutive words into
/// windows of `max_words` words. The final window may be shorter; words
/// are never split across windows. Empty input yields an empty vec.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    if max_words == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words)
        .map(|window| window.join(" "))
        .collect()
}
