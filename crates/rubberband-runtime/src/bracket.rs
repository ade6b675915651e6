#![forbid(unsafe_code)]

//! Single-axis width brackets with optional debouncing.
//!
//! [`BracketTracker`] classifies a width into the bracket between two
//! adjacent breakpoints and reports a [`BracketTransition`] whenever the
//! bracket changes. It works directly on widths and needs no match source,
//! which makes it usable where only raw resize notifications exist.
//!
//! # Brackets
//!
//! Breakpoints are sorted descending and an unbounded widest edge is added:
//! `[∞, 1240, 980, 740, 500, 340]`. A width `w` falls in bracket
//! `(max = e[i], min = e[i+1])` when `e[i+1] < w <= e[i]`; the narrowest
//! bracket has no `min`.
//!
//! # Debouncing
//!
//! [`observe_at`](BracketTracker::observe_at) records a pending width and
//! [`poll`](BracketTracker::poll) resolves it once the quiet period has
//! elapsed since the *last* observation. A burst of resizes therefore
//! produces at most one transition.
//!
//! # Invariants
//!
//! 1. A transition is reported only when the bracket's `max` changes.
//! 2. `exited` is the previous bracket's `max`, `None` on first observation.
//! 3. NaN widths are ignored.

use std::time::Duration;

use rubberband_core::{Bound, BracketConfig};
use tracing::debug;
use web_time::Instant;

/// The interval between two adjacent breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub max: Bound,
    /// `None` for the narrowest bracket.
    pub min: Option<Bound>,
}

impl Bracket {
    #[must_use]
    pub fn contains(&self, width: f64) -> bool {
        let w = Bound::finite(width);
        w <= self.max && self.min.is_none_or(|min| w > min)
    }
}

/// A change of bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketTransition {
    /// `max` of the bracket that was left.
    pub exited: Option<Bound>,
    /// `max` of the bracket that was entered.
    pub entered: Bound,
    pub bracket: Bracket,
}

/// Tracks which bracket the viewport width is in.
#[derive(Debug, Clone)]
pub struct BracketTracker {
    /// Descending, starting with `Bound::Unbounded`.
    edges: Vec<Bound>,
    debounce: Duration,
    current: Option<Bracket>,
    pending: Option<(f64, Instant)>,
}

impl Default for BracketTracker {
    fn default() -> Self {
        Self::new(&BracketConfig::default())
    }
}

impl BracketTracker {
    #[must_use]
    pub fn new(config: &BracketConfig) -> Self {
        let mut edges = config.breakpoints.clone();
        edges.push(Bound::Unbounded);
        edges.sort_by(|a, b| b.cmp(a));
        edges.dedup();
        Self {
            edges,
            debounce: Duration::from_millis(config.debounce_ms),
            current: None,
            pending: None,
        }
    }

    /// Bracket edges, widest first.
    #[must_use]
    pub fn edges(&self) -> &[Bound] {
        &self.edges
    }

    #[must_use]
    pub fn current(&self) -> Option<Bracket> {
        self.current
    }

    /// Classify a width without changing state.
    #[must_use]
    pub fn bracket_for(&self, width: f64) -> Option<Bracket> {
        if width.is_nan() {
            return None;
        }
        self.edges.iter().enumerate().find_map(|(i, &max)| {
            let bracket = Bracket {
                max,
                min: self.edges.get(i + 1).copied(),
            };
            bracket.contains(width).then_some(bracket)
        })
    }

    /// Observe a width immediately, bypassing the debounce.
    pub fn observe(&mut self, width: f64) -> Option<BracketTransition> {
        self.pending = None;
        let bracket = self.bracket_for(width)?;
        let exited = self.current.map(|c| c.max);
        if exited == Some(bracket.max) {
            return None;
        }
        self.current = Some(bracket);
        debug!(width, ?exited, entered = %bracket.max, "bracket changed");
        Some(BracketTransition {
            exited,
            entered: bracket.max,
            bracket,
        })
    }

    /// Record a width observed at `now`. Resolves at once when the debounce
    /// is zero; otherwise the width waits for [`poll`](Self::poll).
    pub fn observe_at(&mut self, width: f64, now: Instant) -> Option<BracketTransition> {
        if self.debounce.is_zero() {
            return self.observe(width);
        }
        self.pending = Some((width, now));
        None
    }

    /// Resolve the pending width if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<BracketTransition> {
        let (width, at) = self.pending?;
        if now.saturating_duration_since(at) < self.debounce {
            return None;
        }
        self.observe(width)
    }

    /// Whether an observation is waiting for the quiet period.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(v: u32) -> Bound {
        Bound::from(v)
    }

    #[test]
    fn edges_are_sorted_with_unbounded_first() {
        let tracker = BracketTracker::default();
        assert_eq!(
            tracker.edges(),
            &[Bound::Unbounded, b(1240), b(980), b(740), b(500), b(340)]
        );
    }

    fn bracket(max: Bound, min: Option<Bound>) -> Bracket {
        Bracket { max, min }
    }

    #[test]
    fn classifies_widths() {
        let tracker = BracketTracker::default();
        assert_eq!(tracker.bracket_for(1000.0), Some(bracket(b(1240), Some(b(980)))));
        assert_eq!(tracker.bracket_for(980.0), Some(bracket(b(980), Some(b(740)))));
        assert_eq!(
            tracker.bracket_for(5000.0),
            Some(bracket(Bound::Unbounded, Some(b(1240))))
        );
        assert_eq!(tracker.bracket_for(200.0), Some(bracket(b(340), None)));
        assert_eq!(tracker.bracket_for(f64::NAN), None);
    }

    #[test]
    fn transitions_only_on_bracket_change() {
        let mut tracker = BracketTracker::default();
        let first = tracker.observe(1000.0).unwrap();
        assert_eq!(first.exited, None);
        assert_eq!(first.entered, b(1240));

        assert_eq!(tracker.observe(1100.0), None);

        let next = tracker.observe(600.0).unwrap();
        assert_eq!(next.exited, Some(b(1240)));
        assert_eq!(next.entered, b(740));
        assert_eq!(next.bracket.min, Some(b(500)));
        assert_eq!(tracker.current(), Some(next.bracket));
    }

    #[test]
    fn debounce_collapses_bursts() {
        let mut tracker = BracketTracker::new(&BracketConfig {
            debounce_ms: 10,
            ..BracketConfig::default()
        });
        let t0 = Instant::now();
        assert_eq!(tracker.observe_at(1000.0, t0), None);
        assert_eq!(tracker.observe_at(700.0, t0 + Duration::from_millis(4)), None);
        assert_eq!(tracker.observe_at(450.0, t0 + Duration::from_millis(8)), None);

        // Quiet period is measured from the last observation.
        assert_eq!(tracker.poll(t0 + Duration::from_millis(12)), None);
        assert!(tracker.has_pending());

        let t = tracker.poll(t0 + Duration::from_millis(18)).unwrap();
        assert_eq!(t.exited, None);
        assert_eq!(t.entered, b(500));
        assert!(!tracker.has_pending());
        assert_eq!(tracker.poll(t0 + Duration::from_millis(40)), None);
    }

    #[test]
    fn zero_debounce_resolves_immediately() {
        let mut tracker = BracketTracker::new(&BracketConfig {
            breakpoints: vec![b(600)],
            debounce_ms: 0,
        });
        let t = tracker.observe_at(300.0, Instant::now()).unwrap();
        assert_eq!(t.bracket, bracket(b(600), None));
        let t = tracker.observe_at(601.0, Instant::now()).unwrap();
        assert_eq!(t.entered, Bound::Unbounded);
        assert_eq!(t.exited, Some(b(600)));
    }
}
