#![forbid(unsafe_code)]

//! Threshold values and the "unbounded" sentinel.
//!
//! A [`Bound`] is either a finite magnitude or [`Bound::Unbounded`], which
//! compares greater than every finite value. Hosts rarely understand an
//! infinite media condition, so the sentinel is translated to
//! [`NATIVE_UNBOUNDED`] when crossing into a [`MatchSource`] and translated
//! back by [`Bound::from_native`] on readback. Internal logic only ever sees
//! the sentinel.
//!
//! # Invariants
//!
//! 1. `Unbounded > Finite(x)` for every `x`.
//! 2. Finite values are totally ordered via `f64::total_cmp`.
//! 3. `from_native(to_native(b)) == b` for finite `b < NATIVE_UNBOUNDED`.
//!
//! [`MatchSource`]: crate::source::MatchSource

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Magnitude handed to the native match primitive in place of "unbounded".
pub const NATIVE_UNBOUNDED: f64 = 100_000.0;

/// A threshold value.
#[derive(Debug, Clone, Copy)]
pub enum Bound {
    /// A finite magnitude in the configured unit.
    Finite(f64),
    /// No constraint. Compares as +infinity.
    Unbounded,
}

impl Bound {
    /// Build a bound from a raw number; `f64::INFINITY` maps to the sentinel.
    #[must_use]
    pub fn finite(value: f64) -> Self {
        if value == f64::INFINITY {
            Self::Unbounded
        } else {
            Self::Finite(value)
        }
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The magnitude to hand to the host's native match primitive.
    #[must_use]
    pub const fn to_native(self) -> f64 {
        match self {
            Self::Finite(v) => v,
            Self::Unbounded => NATIVE_UNBOUNDED,
        }
    }

    /// Restore a bound read back from the host.
    #[must_use]
    pub fn from_native(value: f64) -> Self {
        if value >= NATIVE_UNBOUNDED {
            Self::Unbounded
        } else {
            Self::Finite(value)
        }
    }

    /// The value as `f64`, with the sentinel mapped to `f64::INFINITY`.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Finite(v) => v,
            Self::Unbounded => f64::INFINITY,
        }
    }
}

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Bound {}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
            (Self::Unbounded, Self::Finite(_)) => Ordering::Greater,
            (Self::Finite(_), Self::Unbounded) => Ordering::Less,
            (Self::Finite(a), Self::Finite(b)) => a.total_cmp(b),
        }
    }
}

impl Hash for Bound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Finite(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Self::Unbounded => 1u8.hash(state),
        }
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Self::finite(value)
    }
}

impl From<u32> for Bound {
    fn from(value: u32) -> Self {
        Self::Finite(f64::from(value))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}"),
            Self::Unbounded => f.write_str("infinity"),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_f64(*v),
            Self::Unbounded => serializer.serialize_str("infinity"),
        }
    }
}

struct BoundVisitor;

impl Visitor<'_> for BoundVisitor {
    type Value = Bound;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or one of \"infinity\", \"inf\", \"unbounded\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Bound, E> {
        Ok(Bound::finite(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Bound, E> {
        Ok(Bound::Finite(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Bound, E> {
        Ok(Bound::Finite(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Bound, E> {
        match v.trim().to_ascii_lowercase().as_str() {
            "infinity" | "inf" | "unbounded" => Ok(Bound::Unbounded),
            other => other
                .parse::<f64>()
                .map(Bound::finite)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoundVisitor)
    }
}
