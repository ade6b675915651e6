#![forbid(unsafe_code)]

//! Threshold and bracket configuration.
//!
//! [`ThresholdConfig`] is what callers hand to the engine. It is never used
//! as-is: [`ThresholdConfig::merge_over`] folds it into the current defaults
//! and yields the effective [`ThresholdSet`].
//!
//! # Union merge
//!
//! For every axis kind, a non-empty caller list is **concatenated** with the
//! default list. Callers can add thresholds but cannot remove the defaults:
//!
//! ```
//! use rubberband_core::{AxisKind, Bound, ThresholdConfig};
//!
//! let effective = ThresholdConfig::empty()
//!     .max_width([600u32])
//!     .merge_over(&ThresholdConfig::default());
//! assert_eq!(
//!     effective.get(AxisKind::MaxWidth),
//!     &[Bound::finite(600.0), Bound::Unbounded]
//! );
//! ```
//!
//! # Ordering
//!
//! After merging, max-polarity lists are ascending and min-polarity lists
//! descending so scans meet tighter bounds first. Identical values collapse
//! to one entry. Aggregation does not depend on this order.
//!
//! # Loading
//!
//! ```toml
//! # rubberband.toml
//! max_width = [500, 900]
//! min_width = [320]
//! unit = "px"
//! ```
//!
//! ```rust,ignore
//! let options = ThresholdConfig::from_toml_file("rubberband.toml")?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::axis::AxisKind;
use crate::bound::Bound;
#[cfg(feature = "config-file")]
use crate::error::ConfigError;
use crate::threshold::{Threshold, Unit};

// ---------------------------------------------------------------------------
// ThresholdConfig
// ---------------------------------------------------------------------------

/// Caller-facing threshold options.
///
/// `Default` yields the built-in defaults (`min_* = [0]`,
/// `max_* = [unbounded]`, unit `px`). Use [`ThresholdConfig::empty`] as the
/// starting point for an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default = "ThresholdConfig::empty")]
pub struct ThresholdConfig {
    #[serde(alias = "minWidth")]
    pub min_width: Vec<Bound>,
    #[serde(alias = "maxWidth")]
    pub max_width: Vec<Bound>,
    #[serde(alias = "minHeight")]
    pub min_height: Vec<Bound>,
    #[serde(alias = "maxHeight")]
    pub max_height: Vec<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_width: vec![Bound::finite(0.0)],
            max_width: vec![Bound::Unbounded],
            min_height: vec![Bound::finite(0.0)],
            max_height: vec![Bound::Unbounded],
            unit: Some(Unit::default()),
        }
    }
}

impl ThresholdConfig {
    /// No thresholds and no unit: an overlay that changes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min_width: Vec::new(),
            max_width: Vec::new(),
            min_height: Vec::new(),
            max_height: Vec::new(),
            unit: None,
        }
    }

    #[must_use]
    pub fn get(&self, axis: AxisKind) -> &[Bound] {
        match axis {
            AxisKind::MinWidth => &self.min_width,
            AxisKind::MaxWidth => &self.max_width,
            AxisKind::MinHeight => &self.min_height,
            AxisKind::MaxHeight => &self.max_height,
        }
    }

    fn get_mut(&mut self, axis: AxisKind) -> &mut Vec<Bound> {
        match axis {
            AxisKind::MinWidth => &mut self.min_width,
            AxisKind::MaxWidth => &mut self.max_width,
            AxisKind::MinHeight => &mut self.min_height,
            AxisKind::MaxHeight => &mut self.max_height,
        }
    }

    /// Replace the list for one axis (builder pattern).
    #[must_use]
    pub fn with(
        mut self,
        axis: AxisKind,
        bounds: impl IntoIterator<Item = impl Into<Bound>>,
    ) -> Self {
        *self.get_mut(axis) = bounds.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn min_width(self, bounds: impl IntoIterator<Item = impl Into<Bound>>) -> Self {
        self.with(AxisKind::MinWidth, bounds)
    }

    #[must_use]
    pub fn max_width(self, bounds: impl IntoIterator<Item = impl Into<Bound>>) -> Self {
        self.with(AxisKind::MaxWidth, bounds)
    }

    #[must_use]
    pub fn min_height(self, bounds: impl IntoIterator<Item = impl Into<Bound>>) -> Self {
        self.with(AxisKind::MinHeight, bounds)
    }

    #[must_use]
    pub fn max_height(self, bounds: impl IntoIterator<Item = impl Into<Bound>>) -> Self {
        self.with(AxisKind::MaxHeight, bounds)
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(Unit::new(unit));
        self
    }

    /// Overlay `other` onto these options key by key.
    ///
    /// Each axis with a non-empty list in `other` replaces the list here;
    /// empty axes leave it untouched. `unit` is replaced only when `other`
    /// sets one.
    pub fn overlay(&mut self, other: &ThresholdConfig) {
        for axis in AxisKind::ALL {
            let bounds = other.get(axis);
            if !bounds.is_empty() {
                *self.get_mut(axis) = bounds.to_vec();
            }
        }
        if let Some(unit) = &other.unit {
            self.unit = Some(unit.clone());
        }
    }

    /// Fold these options into `defaults`, producing the effective set.
    ///
    /// Per axis: caller values followed by default values (union, never
    /// replacement), then sorted tightest-first and deduplicated. The unit
    /// is the caller's if given, else the defaults', else `px`.
    #[must_use]
    pub fn merge_over(&self, defaults: &ThresholdConfig) -> ThresholdSet {
        let mut lists: [Vec<Bound>; 4] = Default::default();
        for (slot, axis) in lists.iter_mut().zip(AxisKind::ALL) {
            let mut merged: Vec<Bound> = self.get(axis).to_vec();
            merged.extend_from_slice(defaults.get(axis));
            merged.sort_by(|a, b| axis.scan_order(a, b));
            merged.dedup();
            *slot = merged;
        }
        let unit = self
            .unit
            .clone()
            .or_else(|| defaults.unit.clone())
            .unwrap_or_default();
        ThresholdSet { lists, unit }
    }

    /// Check every value is usable. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for axis in AxisKind::ALL {
            for bound in self.get(axis) {
                if let Bound::Finite(v) = bound {
                    if v.is_nan() {
                        errors.push(format!("{axis} contains NaN"));
                    } else if *v < 0.0 {
                        errors.push(format!("{axis} contains negative value {v}"));
                    }
                }
            }
        }
        if let Some(unit) = &self.unit {
            if unit.as_str().trim().is_empty() {
                errors.push("unit must not be empty".into());
            }
        }
        errors
    }
}

#[cfg(feature = "config-file")]
impl ThresholdConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        load_checked(toml::from_str::<Self>(s)?, Self::validate)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path.as_ref())?)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        load_checked(serde_json::from_str::<Self>(s)?, Self::validate)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path.as_ref())?)
    }
}

// ---------------------------------------------------------------------------
// ThresholdSet
// ---------------------------------------------------------------------------

/// The effective, merged thresholds an engine subscribes to.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    /// Indexed in `AxisKind::ALL` order.
    lists: [Vec<Bound>; 4],
    unit: Unit,
}

impl ThresholdSet {
    #[must_use]
    pub fn get(&self, axis: AxisKind) -> &[Bound] {
        match axis {
            AxisKind::MinWidth => &self.lists[0],
            AxisKind::MaxWidth => &self.lists[1],
            AxisKind::MinHeight => &self.lists[2],
            AxisKind::MaxHeight => &self.lists[3],
        }
    }

    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Total number of thresholds across all axes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every threshold, axis by axis, tightest first within an axis.
    pub fn thresholds(&self) -> impl Iterator<Item = Threshold> + '_ {
        AxisKind::ALL.into_iter().flat_map(move |axis| {
            self.get(axis)
                .iter()
                .map(move |bound| Threshold::new(axis, *bound, self.unit.clone()))
        })
    }
}

// ---------------------------------------------------------------------------
// BracketConfig
// ---------------------------------------------------------------------------

/// Options for the single-axis width bracket tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    /// Bracket edges. Order does not matter; the tracker sorts descending
    /// and adds an unbounded widest bracket.
    pub breakpoints: Vec<Bound>,
    /// Quiet period before a debounced observation resolves.
    pub debounce_ms: u64,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            breakpoints: [1240u32, 980, 740, 500, 340]
                .into_iter()
                .map(Bound::from)
                .collect(),
            debounce_ms: 5,
        }
    }
}

impl BracketConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for bound in &self.breakpoints {
            if let Bound::Finite(v) = bound {
                if v.is_nan() || *v < 0.0 {
                    errors.push(format!("breakpoint {v} must be a non-negative number"));
                }
            }
        }
        errors
    }
}

#[cfg(feature = "config-file")]
impl BracketConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        load_checked(toml::from_str::<Self>(s)?, Self::validate)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        load_checked(serde_json::from_str::<Self>(s)?, Self::validate)
    }
}

#[cfg(feature = "config-file")]
fn load_checked<T: DeserializeOwned>(
    config: T,
    validate: impl FnOnce(&T) -> Vec<String>,
) -> Result<T, ConfigError> {
    let errors = validate(&config);
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_thresholds() {
        let set = ThresholdConfig::empty().merge_over(&ThresholdConfig::default());
        assert_eq!(set.get(AxisKind::MinWidth), &[Bound::finite(0.0)]);
        assert_eq!(set.get(AxisKind::MaxWidth), &[Bound::Unbounded]);
        assert_eq!(set.get(AxisKind::MinHeight), &[Bound::finite(0.0)]);
        assert_eq!(set.get(AxisKind::MaxHeight), &[Bound::Unbounded]);
        assert_eq!(set.unit().as_str(), "px");
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn caller_values_extend_defaults() {
        let set = ThresholdConfig::empty()
            .max_width([600u32])
            .merge_over(&ThresholdConfig::default());
        assert_eq!(
            set.get(AxisKind::MaxWidth),
            &[Bound::finite(600.0), Bound::Unbounded]
        );
    }

    #[test]
    fn defaults_cannot_be_suppressed() {
        // Supplying only the sentinel still leaves it present exactly once.
        let set = ThresholdConfig::empty()
            .max_width([Bound::Unbounded])
            .min_width([0u32])
            .merge_over(&ThresholdConfig::default());
        assert_eq!(set.get(AxisKind::MaxWidth), &[Bound::Unbounded]);
        assert_eq!(set.get(AxisKind::MinWidth), &[Bound::finite(0.0)]);
    }

    #[test]
    fn merged_lists_are_sorted_tightest_first() {
        let set = ThresholdConfig::empty()
            .max_width([980u32, 500, 1240])
            .min_height([320u32, 800])
            .merge_over(&ThresholdConfig::default());
        assert_eq!(
            set.get(AxisKind::MaxWidth),
            &[
                Bound::finite(500.0),
                Bound::finite(980.0),
                Bound::finite(1240.0),
                Bound::Unbounded
            ]
        );
        assert_eq!(
            set.get(AxisKind::MinHeight),
            &[Bound::finite(800.0), Bound::finite(320.0), Bound::finite(0.0)]
        );
    }

    #[test]
    fn unit_falls_back_to_defaults() {
        let set = ThresholdConfig::empty().merge_over(&ThresholdConfig::default().unit("em"));
        assert_eq!(set.unit().as_str(), "em");
        let set = ThresholdConfig::empty()
            .unit("rem")
            .merge_over(&ThresholdConfig::default());
        assert_eq!(set.unit().as_str(), "rem");
        let set = ThresholdConfig::empty().merge_over(&ThresholdConfig::empty());
        assert_eq!(set.unit().as_str(), "px");
        assert!(set.is_empty());
    }

    #[test]
    fn thresholds_carry_axis_and_unit() {
        let set = ThresholdConfig::empty()
            .max_height([700u32])
            .merge_over(&ThresholdConfig::default());
        let all: Vec<String> = set.thresholds().map(|t| t.to_string()).collect();
        assert_eq!(
            all,
            vec![
                "min-width: 0px",
                "max-width: unbounded",
                "min-height: 0px",
                "max-height: 700px",
                "max-height: unbounded",
            ]
        );
    }

    #[test]
    fn overlay_replaces_only_supplied_keys() {
        let mut defaults = ThresholdConfig::default();
        defaults.overlay(&ThresholdConfig::empty().max_width([1200u32]));
        assert_eq!(defaults.max_width, vec![Bound::finite(1200.0)]);
        assert_eq!(defaults.min_width, vec![Bound::finite(0.0)]);
        assert_eq!(defaults.min_height, vec![Bound::finite(0.0)]);
        assert_eq!(defaults.max_height, vec![Bound::Unbounded]);
        assert_eq!(defaults.unit, Some(Unit::default()));

        defaults.overlay(&ThresholdConfig::empty().unit("em"));
        assert_eq!(defaults.unit, Some(Unit::new("em")));
        assert_eq!(defaults.max_width, vec![Bound::finite(1200.0)]);

        let before = defaults.clone();
        defaults.overlay(&ThresholdConfig::empty());
        assert_eq!(defaults, before);
    }

    #[test]
    fn validate_flags_bad_values() {
        let config = ThresholdConfig::empty()
            .max_width([f64::NAN])
            .min_width([-5.0])
            .unit(" ");
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(ThresholdConfig::default().validate().is_empty());
    }

    #[test]
    fn bracket_defaults() {
        let config = BracketConfig::default();
        assert_eq!(config.breakpoints.len(), 5);
        assert_eq!(config.debounce_ms, 5);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn deserialize_fills_missing_fields_with_empty() {
        let config: ThresholdConfig =
            serde_json::from_str(r#"{"maxWidth": [500, 900]}"#).expect("valid json");
        assert_eq!(config.max_width, vec![Bound::finite(500.0), Bound::finite(900.0)]);
        assert!(config.min_width.is_empty());
        assert_eq!(config.unit, None);
    }
}
