use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A stored first/last name pair with its store-assigned number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub number: u64,
    pub first: String,
    pub last: String,
}

/// Query filter as handed in by callers: field name to expected value.
pub type Criteria = HashMap<String, String>;

#[derive(Debug)]
pub enum StoreError {
    /// A `number` criterion that is not an integer
    InvalidCriterion { field: String, value: String },
    /// A criterion naming a field records do not have
    UnknownField(String),
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidCriterion { field, value } => {
                write!(f, "invalid criterion {}={:?}", field, value)
            }
            StoreError::UnknownField(field) => write!(f, "unknown field: {}", field),
            StoreError::Io(e) => write!(f, "store IO error: {}", e),
            StoreError::Serialize(e) => write!(f, "store serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// One typed equality constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Criterion {
    /// `None` is an integer no record can carry, such as a negative one
    Number(Option<u64>),
    First(String),
    Last(String),
}

impl Criterion {
    /// Converts raw criteria into typed constraints.
    ///
    /// Empty values place no constraint on their field and are dropped.
    pub(crate) fn from_criteria(criteria: &Criteria) -> Result<Vec<Criterion>, StoreError> {
        criteria
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| match field.as_str() {
                "number" => parse_integer(value)
                    .map(Criterion::Number)
                    .ok_or_else(|| StoreError::InvalidCriterion {
                        field: field.clone(),
                        value: value.clone(),
                    }),
                "first" => Ok(Criterion::First(value.clone())),
                "last" => Ok(Criterion::Last(value.clone())),
                other => Err(StoreError::UnknownField(other.to_string())),
            })
            .collect()
    }

    pub(crate) fn matches(&self, record: &Record) -> bool {
        match self {
            Criterion::Number(n) => Some(record.number) == *n,
            Criterion::First(first) => record.first == *first,
            Criterion::Last(last) => record.last == *last,
        }
    }
}

/// Parses a decimal integer of any size and sign.
///
/// Returns `None` when `value` is not an integer at all, and `Some(None)`
/// when it is one that does not fit a record number. Surrounding whitespace,
/// a leading sign and single underscores between digits are accepted.
fn parse_integer(value: &str) -> Option<Option<u64>> {
    let value = value.trim();
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return None;
    }

    let magnitude = digits.replace('_', "").parse::<u64>().ok();
    Some(match magnitude {
        Some(0) => Some(0),
        Some(_) if negative => None,
        other => other,
    })
}
