//! Extractive summarization of the single best-ranked passage.

use crate::types::Passage;

/// Fallback summary when the best passage has no segmentable sentences.
const FALLBACK_SUMMARY: &str = "No summary could be generated.";

/// Split text into sentences at `.`, `!` or `?` followed by whitespace.
///
/// Fragments are trimmed; empty fragments are dropped. Trailing text
/// without a boundary (including text with no punctuation at all) forms
/// the final sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    // The boundary punctuation is single-byte, so i + 1 is
                    // a valid char boundary.
                    push_trimmed(&mut sentences, &text[start..i + 1]);
                    start = next_idx;
                }
            }
        }
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// Build the extractive summary from the top-ranked passage: its first
/// `max_sentences` sentences joined by a single space, followed by an
/// attribution line naming the source URL.
pub fn summarize(passage: &Passage, max_sentences: usize) -> String {
    let sentences = split_sentences(&passage.text);

    let body = if sentences.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        sentences
            .iter()
            .take(max_sentences)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    };

    format!("{body}\n\nSource: {}", passage.source_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(split_sentences("A. B? C!"), vec!["A.", "B?", "C!"]);
    }

    #[test]
    fn test_no_trailing_whitespace_keeps_fragment_whole() {
        // "C!" ends the text without a following whitespace boundary.
        assert_eq!(split_sentences("A. B?C!"), vec!["A.", "B?C!"]);
    }

    #[test]
    fn test_no_punctuation() {
        assert_eq!(split_sentences("just some words"), vec!["just some words"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            split_sentences("Où est Paris? C'est en France."),
            vec!["Où est Paris?", "C'est en France."]
        );
    }

    #[test]
    fn test_summarize_takes_leading_sentences() {
        let passage = Passage::new(
            "https://example.com/paris",
            "Paris is the capital of France. It is located on the Seine. It is large.",
        );
        let summary = summarize(&passage, 2);
        assert_eq!(
            summary,
            "Paris is the capital of France. It is located on the Seine.\n\nSource: https://example.com/paris"
        );
    }

    #[test]
    fn test_summarize_fewer_sentences_than_requested() {
        let passage = Passage::new("https://example.com", "One sentence only.");
        let summary = summarize(&passage, 3);
        assert!(summary.starts_with("One sentence only."));
        assert!(summary.ends_with("Source: https://example.com"));
    }

    #[test]
    fn test_summarize_degenerate_passage() {
        let passage = Passage::new("https://example.com", "   ");
        let summary = summarize(&passage, 2);
        assert_eq!(
            summary,
            "No summary could be generated.\n\nSource: https://example.com"
        );
    }
}
