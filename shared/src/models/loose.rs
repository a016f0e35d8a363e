//! Loosely-typed scalar values
//!
//! The backend occasionally returns numeric columns (prices, ratings,
//! durations) as strings. [`LooseNumber`] accepts either form and leaves
//! coercion to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

impl LooseNumber {
    /// Finite numeric value, parsing trimmed non-empty strings
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            Self::Other(_) => None,
        }
    }

    /// Numeric value or `fallback` when the input does not coerce
    pub fn or(&self, fallback: f64) -> f64 {
        self.to_f64().unwrap_or(fallback)
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for LooseNumber {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Coerce an optional loose number with a fallback for absent or invalid input
pub fn coerce(value: Option<&LooseNumber>, fallback: f64) -> f64 {
    value.map_or(fallback, |v| v.or(fallback))
}

/// Deserialize `null` as the type's default (used for list fields)
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
