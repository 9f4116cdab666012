//! Tokenizers
//!
//! Both tokenizers return contiguous slices of the input: concatenating the
//! tokens always yields the input unchanged.

use unicode_segmentation::UnicodeSegmentation;

/// Split into lines, keeping each `\n` with the line it ends
///
/// The last line has no terminator when the text does not end with one.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Split on Unicode word boundaries
///
/// Whitespace runs are attached to the token before them. Leading whitespace
/// forms a token of its own.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for (idx, piece) in text.split_word_bound_indices() {
        let piece_end = idx + piece.len();
        let is_space = piece.chars().all(char::is_whitespace);

        current = match current {
            Some((start, _)) if is_space => Some((start, piece_end)),
            Some((start, end)) => {
                tokens.push(&text[start..end]);
                Some((idx, piece_end))
            }
            None => Some((idx, piece_end)),
        };
    }

    if let Some((start, end)) = current {
        tokens.push(&text[start..end]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(
            split_lines("line1\nline2\nline3"),
            vec!["line1\n", "line2\n", "line3"]
        );
        assert_eq!(split_lines("a\n\nb\n"), vec!["a\n", "\n", "b\n"]);
        assert_eq!(split_lines("crlf\r\nnext"), vec!["crlf\r\n", "next"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_words_attaches_whitespace() {
        assert_eq!(
            split_words("the quick  brown\nfox"),
            vec!["the ", "quick  ", "brown\n", "fox"]
        );
    }

    #[test]
    fn test_split_words_punctuation_and_leading_space() {
        assert_eq!(
            split_words("  Hello, world!"),
            vec!["  ", "Hello", ", ", "world", "!"]
        );
    }

    #[test]
    fn test_tokens_reconstruct_input() {
        let samples = [
            "",
            " ",
            "one",
            "tabs\tand\nnew lines\r\n",
            "naïve café, déjà vu — 42.5%",
        ];
        for sample in samples {
            assert_eq!(split_words(sample).concat(), sample);
            assert_eq!(split_lines(sample).concat(), sample);
        }
    }
}
