// Base lexical scoring.
//
// Every lexicon phrase found in the text contributes to a raw sum: unsafe
// phrases add their category weight, safe phrases subtract a small offset.
// The sum is squashed through `1 - exp(-sum)` so the score stays in [0, 1]
// and keeps rising (with diminishing returns) as more or worse matches pile up.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use crate::lexicon::normalize::normalize;
use crate::lexicon::LexiconSnapshot;

/// Configurable weights for the lexical score.
///
/// `score = 1 - exp(-max(0, Σ unsafe weights - Σ safe offsets))`
///
/// With the defaults a single slur scores ~0.95, a single threat ~0.86,
/// a single insult ~0.55, and a lone violent word ("died") ~0.50.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Weight per unsafe match, keyed by category.
    pub category_weights: HashMap<String, f64>,
    /// Weight for unsafe matches in a category not listed above (default 1.0).
    pub default_weight: f64,
    /// Subtracted per safe (allow-listed) match (default 0.3).
    pub safe_offset: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        let category_weights = [
            ("slurs", 3.0),
            ("threats", 2.0),
            ("sexual", 1.5),
            ("profanity", 1.0),
            ("insults", 0.8),
            ("violence", 0.7),
        ]
        .into_iter()
        .map(|(cat, w)| (cat.to_string(), w))
        .collect();

        Self {
            category_weights,
            default_weight: 1.0,
            safe_offset: 0.3,
        }
    }
}

impl ScoringWeights {
    /// The (non-negative) weight for an unsafe match in `category`.
    pub fn weight_for(&self, category: &str) -> f64 {
        self.category_weights
            .get(category)
            .copied()
            .unwrap_or(self.default_weight)
            .max(0.0)
    }
}

/// A phrase that contributed to a score, for explaining results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPhrase {
    pub phrase: String,
    pub category: String,
    pub safe: bool,
    pub contribution: f64,
}

/// The full breakdown behind a score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub raw_sum: f64,
    pub matches: Vec<MatchedPhrase>,
}

/// Stateless lexical scorer.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score `text` against `lexicon`. Pure and deterministic; 0.0 for blank text.
    pub fn score(&self, text: &str, lexicon: &LexiconSnapshot) -> f64 {
        self.explain(text, lexicon).score
    }

    /// Score `text` and report which phrases contributed.
    pub fn explain(&self, text: &str, lexicon: &LexiconSnapshot) -> ScoreBreakdown {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return ScoreBreakdown {
                score: 0.0,
                raw_sum: 0.0,
                matches: Vec::new(),
            };
        }

        let mut raw_sum = 0.0;
        let mut matches = Vec::new();

        for m in lexicon.find_matches(&normalized) {
            let Some(entry) = lexicon.entry(m.entry) else {
                continue;
            };
            let contribution = if entry.safe {
                -self.weights.safe_offset.max(0.0)
            } else {
                self.weights.weight_for(&entry.category)
            };
            raw_sum += contribution;
            matches.push(MatchedPhrase {
                phrase: normalized.as_str()[m.start..m.end].to_string(),
                category: entry.category.clone(),
                safe: entry.safe,
                contribution,
            });
        }

        let score = saturate(raw_sum);
        trace!(
            matches = matches.len(),
            raw_sum,
            score,
            lexicon_version = lexicon.version(),
            "Scored text"
        );

        ScoreBreakdown {
            score,
            raw_sum,
            matches,
        }
    }
}

/// Map a raw contribution sum onto [0, 1]. Non-positive sums score 0.0.
pub fn saturate(raw_sum: f64) -> f64 {
    if raw_sum.is_nan() || raw_sum <= 0.0 {
        return 0.0;
    }
    (1.0 - (-raw_sum).exp()).clamp(0.0, 1.0)
}
