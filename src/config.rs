use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::context::DEFAULT_SESSION_CAPACITY;
use crate::request::MAX_TEXT_CHARS;
use crate::scoring::{Threshold, DEFAULT_BAN_LINE};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default; a variable that is set but malformed is an error.
#[derive(Debug, Clone)]
pub struct Config {
    /// BAN_LINE: scores at or above this are treated as disallowed.
    pub ban_line: Threshold,
    /// Path to the SQLite phrase store.
    pub db_path: String,
    /// Maximum number of conversation sessions tracked at once.
    pub session_capacity: usize,
    /// Longest text (in chars) a request may carry.
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ban_line: Threshold::default(),
            db_path: "./pyx.db".to_string(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
            max_text_chars: MAX_TEXT_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let ban_line = match parse_var::<f64>(&lookup, "PYX_BAN_LINE")? {
            Some(v) => Threshold::new(v).context("Invalid PYX_BAN_LINE")?,
            None => defaults.ban_line,
        };

        let session_capacity =
            parse_var::<usize>(&lookup, "PYX_SESSION_CAPACITY")?.unwrap_or(defaults.session_capacity);
        if session_capacity == 0 {
            anyhow::bail!("PYX_SESSION_CAPACITY must be at least 1");
        }

        let max_text_chars =
            parse_var::<usize>(&lookup, "PYX_MAX_TEXT_CHARS")?.unwrap_or(defaults.max_text_chars);

        Ok(Self {
            ban_line,
            db_path: lookup("PYX_DB_PATH").unwrap_or(defaults.db_path),
            session_capacity,
            max_text_chars,
        })
    }

    /// Whether the threshold is the built-in default rather than PYX_BAN_LINE.
    pub fn ban_line_is_default(&self) -> bool {
        self.ban_line.value() == DEFAULT_BAN_LINE
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} is set to {raw:?}, which is not a valid value"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}
