#![forbid(unsafe_code)]

//! The aggregated per-axis state.

use serde::{Deserialize, Serialize};

use crate::axis::AxisKind;
use crate::bound::Bound;
use crate::threshold::Unit;

/// Which threshold currently applies on each axis.
///
/// An axis is `None` when no threshold of that kind currently matches.
/// Snapshots are rebuilt from scratch on every aggregation pass; nothing is
/// carried over from the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_width: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_width: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_height: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_height: Option<Bound>,
    pub unit: Unit,
}

impl Snapshot {
    /// An empty snapshot (no axis selected) in the given unit.
    #[must_use]
    pub fn empty(unit: Unit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get(&self, axis: AxisKind) -> Option<Bound> {
        match axis {
            AxisKind::MinWidth => self.min_width,
            AxisKind::MaxWidth => self.max_width,
            AxisKind::MinHeight => self.min_height,
            AxisKind::MaxHeight => self.max_height,
        }
    }

    pub fn set(&mut self, axis: AxisKind, bound: Option<Bound>) {
        let slot = match axis {
            AxisKind::MinWidth => &mut self.min_width,
            AxisKind::MaxWidth => &mut self.max_width,
            AxisKind::MinHeight => &mut self.min_height,
            AxisKind::MaxHeight => &mut self.max_height,
        };
        *slot = bound;
    }

    /// Offer a matching bound; keeps it if it is tighter than the current one.
    pub fn offer(&mut self, axis: AxisKind, bound: Bound) {
        match self.get(axis) {
            Some(current) if !axis.is_tighter(bound, current) => {}
            _ => self.set(axis, Some(bound)),
        }
    }

    /// Iterate over the axes that currently have a selection.
    pub fn selected(&self) -> impl Iterator<Item = (AxisKind, Bound)> + '_ {
        AxisKind::ALL
            .into_iter()
            .filter_map(|axis| self.get(axis).map(|b| (axis, b)))
    }
}
