// Text normalization shared by the lexicon, the scorer, and the censor.
//
// Normalized text is lowercase tokens separated by single spaces. A run of
// mask characters is a token of its own: `*word*` becomes `* word *`, while
// a fully masked word still sits between its neighbours. Every byte
// of the normalized string remembers which character of the raw input it came
// from, so a match found in normalized space can be mapped back to the exact
// characters that need masking.

use std::ops::Range;

/// The character that replaces masked letters in censored output.
pub const MASK_CHAR: char = '*';

/// Whether a character belongs to a token (as opposed to a separator).
///
/// Mask characters form tokens too, so masking "b" in "a b c" leaves
/// "a * c" with three tokens instead of letting "a c" form a new match.
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == MASK_CHAR
}

/// Letters and digits never share a token with mask characters.
fn same_token_class(a: char, b: char) -> bool {
    (a == MASK_CHAR) == (b == MASK_CHAR)
}

/// A normalized view of some raw text, with an offset map back to the raw chars.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    /// For each byte of `text`, the char index in the raw input it came from.
    offsets: Vec<usize>,
    raw_chars: usize,
}

impl NormalizedText {
    /// The normalized string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of chars in the raw input this was built from.
    pub fn raw_len(&self) -> usize {
        self.raw_chars
    }

    /// Iterate over the normalized tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split(' ').filter(|t| !t.is_empty())
    }

    /// True when the byte range `[start, end)` starts and ends on token boundaries.
    pub fn is_token_aligned(&self, start: usize, end: usize) -> bool {
        let bytes = self.text.as_bytes();
        let starts_clean = start == 0 || bytes.get(start - 1) == Some(&b' ');
        let ends_clean = end == bytes.len() || bytes.get(end) == Some(&b' ');
        start < end && starts_clean && ends_clean
    }

    /// Map a byte range of the normalized text back to a char range of the raw input.
    pub fn raw_span(&self, start: usize, end: usize) -> Range<usize> {
        if start >= end || end > self.offsets.len() {
            return 0..0;
        }
        self.offsets[start]..self.offsets[end - 1] + 1
    }
}

/// Normalize raw text: case-fold, turn punctuation and whitespace runs into
/// single spaces, and trim separators from both ends.
pub fn normalize(raw: &str) -> NormalizedText {
    let mut text = String::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(raw.len());
    let mut pending_separator: Option<usize> = None;
    let mut previous: Option<char> = None;
    let mut raw_chars = 0;

    for (i, c) in raw.chars().enumerate() {
        raw_chars = i + 1;

        if !is_token_char(c) {
            pending_separator.get_or_insert(i);
            continue;
        }

        if let Some(sep) = pending_separator.take() {
            if !text.is_empty() {
                text.push(' ');
                offsets.push(sep);
            }
        } else if previous.is_some_and(|p| !same_token_class(p, c)) {
            text.push(' ');
            offsets.push(i);
        }
        previous = Some(c);

        for lower in c.to_lowercase() {
            let before = text.len();
            text.push(lower);
            offsets.resize(offsets.len() + (text.len() - before), i);
        }
    }

    NormalizedText {
        text,
        offsets,
        raw_chars,
    }
}

/// Normalize a lexicon phrase into its lookup key.
pub fn normalize_phrase(phrase: &str) -> String {
    normalize(phrase).text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folds_and_collapses_punctuation() {
        let n = normalize("  Hello,   WORLD!! ");
        assert_eq!(n.as_str(), "hello world");
        assert_eq!(n.tokens().collect::<Vec<_>>(), vec!["hello", "world"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n").is_empty());
        assert!(normalize("?!...").is_empty());
    }

    #[test]
    fn test_raw_span_maps_back_to_original_chars() {
        let raw = "Oh, BAD-word here";
        let n = normalize(raw);
        assert_eq!(n.as_str(), "oh bad word here");
        let start = n.as_str().find("bad word").unwrap();
        let span = n.raw_span(start, start + "bad word".len());
        let original: String = raw.chars().skip(span.start).take(span.len()).collect();
        assert_eq!(original, "BAD-word");
    }

    #[test]
    fn test_raw_span_with_multibyte_chars() {
        let raw = "ça va, Émile";
        let n = normalize(raw);
        let start = n.as_str().find("émile").unwrap();
        let span = n.raw_span(start, n.as_str().len());
        assert_eq!(span, 7..12);
        assert_eq!(n.raw_len(), 12);
    }

    #[test]
    fn test_token_alignment() {
        let n = normalize("classic ass");
        let inner = n.as_str().find("ass").unwrap();
        assert!(!n.is_token_aligned(inner, inner + 3));
        let last = n.as_str().rfind("ass").unwrap();
        assert!(n.is_token_aligned(last, last + 3));
    }

    #[test]
    fn test_mask_char_is_a_token() {
        assert_eq!(normalize("a *** c").as_str(), "a *** c");
    }

    #[test]
    fn test_mask_runs_split_from_words() {
        assert_eq!(normalize("*Slur123*").as_str(), "* slur123 *");
        assert_eq!(normalize("word**").as_str(), "word **");
        assert_eq!(normalize("f*ck").as_str(), "f * ck");
    }

    #[test]
    fn test_split_tokens_map_back_to_raw() {
        let raw = "you *Idiot*";
        let n = normalize(raw);
        let start = n.as_str().find("idiot").unwrap();
        assert!(n.is_token_aligned(start, start + 5));
        assert_eq!(n.raw_span(start, start + 5), 5..10);
    }
}
