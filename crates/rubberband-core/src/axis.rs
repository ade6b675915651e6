#![forbid(unsafe_code)]

//! Axis kinds: the four boundary categories a threshold can belong to.
//!
//! Every [`AxisKind`] has a [`Polarity`]. Max-polarity axes describe upper
//! bounds (`max-width`, `max-height`) and prefer the *smallest* satisfied
//! value; min-polarity axes describe lower bounds and prefer the *largest*.
//!
//! # Invariants
//!
//! 1. Each axis kind has exactly one polarity and one dimension.
//! 2. `feature_name()` and `from_feature_name()` round-trip.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bound::Bound;

/// Direction in which an axis kind constrains the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Lower bound: the condition holds when the viewport is at least this size.
    Min,
    /// Upper bound: the condition holds when the viewport is at most this size.
    Max,
}

/// Which viewport dimension an axis kind measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

/// One of the four boundary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisKind {
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
}

impl AxisKind {
    /// All axis kinds, in configuration order.
    pub const ALL: [AxisKind; 4] = [
        AxisKind::MinWidth,
        AxisKind::MaxWidth,
        AxisKind::MinHeight,
        AxisKind::MaxHeight,
    ];

    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::MinWidth | Self::MinHeight => Polarity::Min,
            Self::MaxWidth | Self::MaxHeight => Polarity::Max,
        }
    }

    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::MinWidth | Self::MaxWidth => Dimension::Width,
            Self::MinHeight | Self::MaxHeight => Dimension::Height,
        }
    }

    /// The media feature name used in query text, e.g. `max-width`.
    #[must_use]
    pub const fn feature_name(self) -> &'static str {
        match self {
            Self::MinWidth => "min-width",
            Self::MaxWidth => "max-width",
            Self::MinHeight => "min-height",
            Self::MaxHeight => "max-height",
        }
    }

    /// Parse a media feature name (ASCII case-insensitive).
    #[must_use]
    pub fn from_feature_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.feature_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether `candidate` is a tighter bound than `current` for this axis.
    ///
    /// Max polarity: smaller is tighter. Min polarity: larger is tighter.
    #[must_use]
    pub fn is_tighter(self, candidate: Bound, current: Bound) -> bool {
        match self.polarity() {
            Polarity::Max => candidate < current,
            Polarity::Min => candidate > current,
        }
    }

    /// Ordering that places tighter bounds first.
    ///
    /// Max-polarity lists end up ascending, min-polarity lists descending.
    #[must_use]
    pub fn scan_order(self, a: &Bound, b: &Bound) -> Ordering {
        match self.polarity() {
            Polarity::Max => a.cmp(b),
            Polarity::Min => b.cmp(a),
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feature_name())
    }
}
