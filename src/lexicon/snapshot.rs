// Immutable lexicon snapshot.
//
// A snapshot is built once from a list of phrase records and never mutated.
// Reloading produces a new snapshot that replaces the old one wholesale.
//
// Matching uses a single Aho-Corasick automaton over every normalized phrase,
// so finding all matches in a text costs O(text length + matches) rather than
// checking every phrase at every position.

use std::collections::{BTreeMap, HashMap};

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::entry::LexiconEntry;
use super::normalize::{normalize_phrase, NormalizedText, MASK_CHAR};

/// One phrase occurrence in a normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Index into the snapshot's entries.
    pub entry: usize,
    /// Byte range in the normalized text.
    pub start: usize,
    pub end: usize,
}

/// An immutable, versioned table of labeled phrases.
#[derive(Debug)]
pub struct LexiconSnapshot {
    version: u64,
    /// Entries in first-seen order; index `i` is also the automaton's pattern id.
    entries: Vec<LexiconEntry>,
    /// Normalized phrase text, parallel to `entries`.
    keys: Vec<String>,
    by_key: HashMap<String, usize>,
    by_category: BTreeMap<String, Vec<usize>>,
    /// `None` when the snapshot has no entries.
    matcher: Option<AhoCorasick>,
}

impl LexiconSnapshot {
    /// Build a snapshot from phrase records.
    ///
    /// Records are keyed by their normalized text. When two records normalize
    /// to the same key, the one that appears later wins. Records that
    /// normalize to nothing, or that contain the mask character, are skipped.
    pub fn build(version: u64, records: impl IntoIterator<Item = LexiconEntry>) -> Result<Self> {
        let mut entries: Vec<LexiconEntry> = Vec::new();
        let mut keys: Vec<String> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for record in records {
            let key = normalize_phrase(&record.text);
            if key.is_empty() {
                debug!(text = %record.text, "Skipping phrase with no word characters");
                continue;
            }
            if key.contains(MASK_CHAR) {
                warn!(text = %record.text, "Skipping phrase containing the mask character");
                continue;
            }

            match by_key.get(&key) {
                Some(&idx) => entries[idx] = record,
                None => {
                    by_key.insert(key.clone(), entries.len());
                    entries.push(record);
                    keys.push(key);
                }
            }
        }

        let mut by_category: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_category
                .entry(entry.category.clone())
                .or_default()
                .push(idx);
        }

        let matcher = if keys.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&keys).context("Failed to build phrase matcher")?)
        };

        Ok(Self {
            version,
            entries,
            keys,
            by_key,
            by_category,
            matcher,
        })
    }

    /// A snapshot with no phrases. Everything scores 0.0 against it.
    pub fn empty() -> Self {
        Self {
            version: 0,
            entries: Vec::new(),
            keys: Vec::new(),
            by_key: HashMap::new(),
            by_category: BTreeMap::new(),
            matcher: None,
        }
    }

    /// Build the next version of this snapshot with `record` added or overriding
    /// the existing entry for the same normalized text.
    pub fn with_entry(&self, record: LexiconEntry) -> Result<Self> {
        let records = self.entries.iter().cloned().chain(std::iter::once(record));
        Self::build(self.version + 1, records)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&LexiconEntry> {
        self.entries.get(idx)
    }

    /// Look up a phrase by its text (normalized before lookup).
    pub fn get(&self, text: &str) -> Option<&LexiconEntry> {
        self.by_key
            .get(&normalize_phrase(text))
            .map(|&idx| &self.entries[idx])
    }

    /// Entries labeled with the given category.
    pub fn in_category(&self, category: &str) -> impl Iterator<Item = &LexiconEntry> {
        self.by_category
            .get(category)
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
    }

    /// Entry counts per category, sorted by category name.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.by_category
            .iter()
            .map(|(cat, idxs)| (cat.as_str(), idxs.len()))
            .collect()
    }

    /// Every phrase occurrence in `text`, including overlapping ones, that
    /// lines up with token boundaries. "ass" does not match inside "class".
    pub fn find_matches(&self, text: &NormalizedText) -> Vec<PhraseMatch> {
        let Some(matcher) = &self.matcher else {
            return Vec::new();
        };

        matcher
            .find_overlapping_iter(text.as_str())
            .filter(|m| text.is_token_aligned(m.start(), m.end()))
            .map(|m| PhraseMatch {
                entry: m.pattern().as_usize(),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    /// The normalized key for an entry index.
    pub fn key(&self, idx: usize) -> Option<&str> {
        self.keys.get(idx).map(String::as_str)
    }
}
