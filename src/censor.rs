// Censoring: length-preserving masking of unsafe phrase matches.
//
// Only the letters and digits inside a matched unsafe span are replaced with
// the mask character. Spaces and punctuation inside the span, and everything
// outside it, come back exactly as written. Length is measured in chars.
//
// A masked word becomes a run of mask characters, which normalizes to a token
// of its own that no phrase contains. Censoring an already censored string
// therefore finds nothing new to mask.

use crate::lexicon::normalize::{is_token_char, normalize, MASK_CHAR};
use crate::lexicon::LexiconSnapshot;

/// Mask every unsafe lexicon match in `text`. Never fails; text with no
/// unsafe matches is returned unchanged.
pub fn censor(text: &str, lexicon: &LexiconSnapshot) -> String {
    let normalized = normalize(text);
    let mut masked = vec![false; normalized.raw_len()];
    let mut any = false;

    for m in lexicon.find_matches(&normalized) {
        match lexicon.entry(m.entry) {
            Some(entry) if !entry.safe => {}
            _ => continue,
        }
        for i in normalized.raw_span(m.start, m.end) {
            if let Some(slot) = masked.get_mut(i) {
                *slot = true;
                any = true;
            }
        }
    }

    if !any {
        return text.to_string();
    }

    text.chars()
        .zip(masked)
        .map(|(c, mask)| if mask && is_token_char(c) { MASK_CHAR } else { c })
        .collect()
}
