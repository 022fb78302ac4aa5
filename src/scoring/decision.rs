// Ban decision: compares a score against the configured BAN_LINE.

use anyhow::Result;

/// Default BAN_LINE. Override with `PYX_BAN_LINE`.
pub const DEFAULT_BAN_LINE: f64 = 0.5;

/// The score at or above which text is treated as disallowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    /// Validate and wrap a threshold. Must be a number in [0.0, 1.0].
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("Ban threshold must be between 0.0 and 1.0, got {value}");
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// `score >= threshold`. The boundary itself counts as bad.
    pub fn is_bad(&self, score: f64) -> bool {
        is_bad(score, self.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_BAN_LINE)
    }
}

/// `score >= threshold`.
pub fn is_bad(score: f64, threshold: f64) -> bool {
    score >= threshold
}
