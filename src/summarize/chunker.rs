/// Split text into chunks of at most `max_words` whitespace-separated words.
///
/// Words inside a chunk are rejoined with single spaces. Every word lands in
/// exactly one chunk, in order; the last chunk holds whatever is left over.
/// Sentence boundaries are not preserved.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .map(|chunk| chunk.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_basic() {
        let text = "a b c d e f g h i j";
        let chunks = chunk_words(text, 4);
        assert_eq!(chunks, vec!["a b c d", "e f g h", "i j"]);
    }

    #[test]
    fn test_chunks_cover_every_word() {
        let text: Vec<String> = (0..900).map(|i| format!("w{i}")).collect();
        let text = text.join("  \n");

        let chunks = chunk_words(&text, 400);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].split(' ').count(), 100);

        let rejoined = chunks.join(" ");
        assert_eq!(rejoined.split(' ').count(), 900);
        assert!(rejoined.starts_with("w0 w1"));
        assert!(rejoined.ends_with("w898 w899"));
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_words("", 400).is_empty());
        assert!(chunk_words(" \n ", 400).is_empty());
    }

    #[test]
    fn test_zero_size_is_treated_as_one() {
        assert_eq!(chunk_words("x y", 0), vec!["x", "y"]);
    }
}
