// Scoring: base lexical severity and the ban decision.

pub mod decision;
pub mod engine;

pub use decision::{is_bad, Threshold, DEFAULT_BAN_LINE};
pub use engine::{saturate, ScoreBreakdown, Scorer, ScoringWeights};
