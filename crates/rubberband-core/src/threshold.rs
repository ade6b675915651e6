#![forbid(unsafe_code)]

//! Thresholds: a bound registered under an axis kind, in a unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::AxisKind;
use crate::bound::Bound;
use crate::error::QueryError;
use crate::query::MediaQuery;

/// Measurement unit applied to every threshold of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    #[must_use]
    pub fn new(unit: impl Into<String>) -> Self {
        Self(unit.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self("px".to_string())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single numeric boundary under one axis kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Threshold {
    pub axis: AxisKind,
    pub bound: Bound,
    pub unit: Unit,
}

impl Threshold {
    #[must_use]
    pub fn new(axis: AxisKind, bound: impl Into<Bound>, unit: Unit) -> Self {
        Self {
            axis,
            bound: bound.into(),
            unit,
        }
    }

    /// Render the condition handed to the match source.
    ///
    /// The unbounded sentinel is written as its native magnitude.
    #[must_use]
    pub fn query(&self) -> MediaQuery {
        MediaQuery::new(format!(
            "({}: {}{})",
            self.axis.feature_name(),
            self.bound.to_native(),
            self.unit
        ))
    }

    /// Read a single-condition query back into a threshold.
    ///
    /// The native magnitude is restored to [`Bound::Unbounded`].
    pub fn from_query(query: &MediaQuery) -> Result<Self, QueryError> {
        let mut conditions = query.conditions()?;
        if conditions.len() != 1 {
            return Err(QueryError::NotSingle(conditions.len()));
        }
        let cond = conditions.remove(0);
        Ok(Self {
            axis: cond.axis,
            bound: Bound::from_native(cond.value),
            unit: Unit::new(cond.unit),
        })
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound {
            Bound::Unbounded => write!(f, "{}: unbounded", self.axis),
            Bound::Finite(v) => write!(f, "{}: {v}{}", self.axis, self.unit),
        }
    }
}
