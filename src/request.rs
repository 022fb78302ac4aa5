// Transport-agnostic request validation and response shape.
//
// A transport parses its body into a serde_json::Value, calls `validate`,
// hands the text to the Moderator, and serializes the resulting Verdict.
// No business logic lives in the transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Longest accepted text, in chars.
pub const MAX_TEXT_CHARS: usize = 1_000_000;

/// Pull the `text` field out of a request body.
///
/// A missing or null `text` is `MissingText`; any other non-string is
/// `NotText`; more than `max_chars` chars is `TooLong`.
pub fn validate(body: &Value, max_chars: usize) -> Result<&str, ValidationError> {
    match body.get("text") {
        None | Some(Value::Null) => Err(ValidationError::MissingText),
        Some(Value::String(text)) => {
            let len = text.chars().count();
            if len > max_chars {
                Err(ValidationError::TooLong {
                    len,
                    max: max_chars,
                })
            } else {
                Ok(text.as_str())
            }
        }
        Some(_) => Err(ValidationError::NotText),
    }
}

/// The response for one scored text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Score rounded to 4 decimals.
    pub score: f64,
    pub bad: bool,
    /// The censored text when `bad`, otherwise the input unchanged.
    pub censored: String,
}

impl Verdict {
    pub fn new(score: f64, bad: bool, censored: String) -> Self {
        Self {
            score: round4(score),
            bad,
            censored,
        }
    }
}

/// Round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Error body, `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ValidationError> for ErrorBody {
    fn from(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
