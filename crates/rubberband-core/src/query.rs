#![forbid(unsafe_code)]

//! Media query text and binding keys.
//!
//! [`MediaQuery`] is the condition string handed to a
//! [`MatchSource`](crate::source::MatchSource). Callers may format the same
//! condition in several ways (`"(min-width: 500px)"`, `"min-width:500px"`),
//! so bindings are looked up by a [`BindingKey`] that strips the
//! punctuation and collapses whitespace.
//!
//! # Key normalization
//!
//! 1. `(`, `)` and `:` are removed and act as separators.
//! 2. Runs of whitespace/separators collapse to a single `-`.
//! 3. Leading and trailing separators are dropped.
//! 4. Case is preserved.
//!
//! Normalization is idempotent: `key(key(q)) == key(q)`.

use std::fmt;

use crate::axis::AxisKind;
use crate::error::QueryError;

/// Media types accepted as a leading token and otherwise ignored.
const MEDIA_TYPES: [&str; 2] = ["all", "screen"];

/// A textual media condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaQuery(String);

impl MediaQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalized lookup key for this query.
    #[must_use]
    pub fn key(&self) -> BindingKey {
        BindingKey::normalize(&self.0)
    }

    /// Parse the query as a conjunction of numeric size conditions.
    ///
    /// Accepts an optional leading media type (`all`, `screen`) and any
    /// number of `and`-joined features with or without parentheses.
    pub fn conditions(&self) -> Result<Vec<Condition>, QueryError> {
        let text = self.0.trim();
        if text.is_empty() {
            return Err(QueryError::Empty);
        }

        let mut out = Vec::new();
        for (idx, part) in split_and(text).into_iter().enumerate() {
            let part = part.trim();
            if idx == 0 && MEDIA_TYPES.iter().any(|t| t.eq_ignore_ascii_case(part)) {
                continue;
            }
            out.push(Condition::parse(part)?);
        }
        if out.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(out)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaQuery {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Split on the `and` keyword (ASCII case-insensitive, whitespace-delimited).
fn split_and(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for token in text.split_whitespace() {
        if token.eq_ignore_ascii_case("and") {
            parts.push(std::mem::take(&mut current));
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(token);
    }
    parts.push(current);
    parts
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A single `<axis>: <value><unit>` condition, as the host sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub axis: AxisKind,
    /// Native magnitude (the unbounded sentinel is already translated).
    pub value: f64,
    pub unit: String,
}

impl Condition {
    /// Parse `"(max-width: 900px)"`, `"max-width:900px"` and similar.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let inner = text.trim().trim_start_matches('(').trim_end_matches(')').trim();
        if inner.is_empty() {
            return Err(QueryError::Empty);
        }
        let Some((feature, value)) = inner.split_once(':') else {
            return Err(QueryError::MissingValue {
                feature: inner.to_string(),
            });
        };
        let axis = AxisKind::from_feature_name(feature)
            .ok_or_else(|| QueryError::UnknownFeature(feature.trim().to_string()))?;

        let value = value.trim();
        if value.is_empty() {
            return Err(QueryError::MissingValue {
                feature: feature.trim().to_string(),
            });
        }
        let split = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(value.len());
        let (number, unit) = value.split_at(split);
        let number: f64 = number
            .parse()
            .map_err(|_| QueryError::BadValue(value.to_string()))?;

        Ok(Self {
            axis,
            value: number,
            unit: unit.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Binding keys
// ---------------------------------------------------------------------------

/// Normalized, formatting-insensitive identity of a media query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey(String);

impl BindingKey {
    /// Normalize arbitrary query text into a key.
    #[must_use]
    pub fn normalize(text: &str) -> Self {
        let mut key = String::with_capacity(text.len());
        let mut pending_sep = false;
        for c in text.chars() {
            if c.is_whitespace() || matches!(c, '(' | ')' | ':') {
                pending_sep = true;
                continue;
            }
            if pending_sep && !key.is_empty() {
                key.push('-');
            }
            pending_sep = false;
            key.push(c);
        }
        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
