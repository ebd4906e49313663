use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Largest index accepted by a submission.
pub const MAX_INDEX: u32 = 40;

/// Cache value written at submission time, until the worker overwrites it.
pub const PLACEHOLDER: &str = "Nothing yet!";

/// Event channel topic announcing a new submission.
pub const INSERT_TOPIC: &str = "insert";

/// Durable table holding one row per accepted submission.
pub const VALUES_TABLE: &str = "values";

/// A validated submission index, `0..=MAX_INDEX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Index(u32);

impl Index {
    /// Range-check an already parsed integer.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        check_range(value, value.to_string())
    }

    /// Parse the `index` field of a request body.
    ///
    /// Integer numbers and strings holding an integer are accepted. Anything
    /// above [`MAX_INDEX`] is rejected as too high before other checks, so
    /// oversized values never degrade into a generic parse error.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Number(n) => {
                let raw = n.to_string();
                if let Some(i) = n.as_i64() {
                    return check_range(i, raw);
                }
                if n.as_u64().is_some() {
                    return Err(ValidationError::IndexTooHigh { raw });
                }
                match n.as_f64() {
                    Some(f) if f > f64::from(MAX_INDEX) => {
                        Err(ValidationError::IndexTooHigh { raw })
                    }
                    Some(f) if f.is_finite() && f.fract() == 0.0 => check_range(f as i64, raw),
                    _ => Err(ValidationError::NotAnInteger { raw }),
                }
            }
            Value::String(s) => s.parse(),
            other => Err(ValidationError::NotAnInteger {
                raw: other.to_string(),
            }),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Key of this index in the cache projection.
    pub fn cache_key(self) -> String {
        self.0.to_string()
    }
}

impl FromStr for Index {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(i) => check_range(i, s.to_string()),
            // digits only but out of i64 range
            Err(_) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
                Err(ValidationError::IndexTooHigh { raw: s.to_string() })
            }
            Err(_) => Err(ValidationError::NotAnInteger { raw: s.to_string() }),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn check_range(value: i64, raw: String) -> Result<Index, ValidationError> {
    if value > i64::from(MAX_INDEX) {
        return Err(ValidationError::IndexTooHigh { raw });
    }
    if value < 0 {
        return Err(ValidationError::Negative { raw });
    }
    Ok(Index(value as u32))
}

/// One durable row, also the shape of a cache-derived `read_all` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurableRow {
    pub number: i64,
}

impl From<Index> for DurableRow {
    fn from(index: Index) -> Self {
        Self {
            number: i64::from(index.get()),
        }
    }
}
