#![forbid(unsafe_code)]

//! State aggregation: many independent match signals in, one snapshot out.
//!
//! # Algorithm
//!
//! Every pass starts from an empty [`Snapshot`] and offers each matching
//! threshold to its axis:
//!
//! - max polarity keeps the **smallest** matching value,
//! - min polarity keeps the **largest** matching value,
//! - the unbounded sentinel compares as +infinity, so it survives only when
//!   it is the sole match on a max axis.
//!
//! An axis with no matching threshold stays `None`.
//!
//! # Invariants
//!
//! 1. The result depends only on the set of (threshold, signal) pairs, not
//!    on their order.
//! 2. A pass is O(thresholds) and never consults the previous snapshot.
//! 3. Every pass replaces the stored snapshot, even when the result is equal
//!    to it.

use rubberband_core::{ListenerId, MediaQuery, Snapshot, Threshold, ThresholdSet, Unit};
use tracing::{debug_span, trace};

/// Build a snapshot from `(threshold, currently matches)` pairs.
pub fn aggregate<'a>(
    unit: &Unit,
    signals: impl IntoIterator<Item = (&'a Threshold, bool)>,
) -> Snapshot {
    let mut snapshot = Snapshot::empty(unit.clone());
    for (threshold, matches) in signals {
        if matches {
            snapshot.offer(threshold.axis, threshold.bound);
        }
    }
    snapshot
}

/// A threshold the aggregator watches, with its query text and subscription.
#[derive(Debug, Clone)]
struct Tracked {
    threshold: Threshold,
    query: MediaQuery,
    listener: Option<ListenerId>,
}

/// Owns the tracked thresholds and the current snapshot.
#[derive(Debug, Clone, Default)]
pub struct StateAggregator {
    tracked: Vec<Tracked>,
    unit: Unit,
    snapshot: Option<Snapshot>,
    passes: u64,
}

impl StateAggregator {
    /// Track every threshold in `set`. Nothing is subscribed yet.
    #[must_use]
    pub fn from_set(set: &ThresholdSet) -> Self {
        let tracked = set
            .thresholds()
            .map(|threshold| Tracked {
                query: threshold.query(),
                threshold,
                listener: None,
            })
            .collect();
        Self {
            tracked,
            unit: set.unit().clone(),
            snapshot: None,
            passes: 0,
        }
    }

    pub fn thresholds(&self) -> impl Iterator<Item = &Threshold> {
        self.tracked.iter().map(|t| &t.threshold)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Subscribe every tracked threshold through `subscribe`.
    pub fn attach(&mut self, mut subscribe: impl FnMut(&MediaQuery) -> ListenerId) {
        for tracked in &mut self.tracked {
            if tracked.listener.is_none() {
                tracked.listener = Some(subscribe(&tracked.query));
            }
        }
    }

    /// Forget all subscriptions, returning their ids for the caller to release.
    pub fn detach(&mut self) -> Vec<ListenerId> {
        self.tracked
            .iter_mut()
            .filter_map(|t| t.listener.take())
            .collect()
    }

    /// Run a full aggregation pass and store the result.
    pub fn recompute(&mut self, matches: impl Fn(&MediaQuery) -> bool) -> Snapshot {
        self.passes += 1;
        let _span = debug_span!(
            "rubberband.aggregate",
            pass = self.passes,
            thresholds = self.tracked.len()
        )
        .entered();

        let signals: Vec<bool> = self.tracked.iter().map(|t| matches(&t.query)).collect();
        let snapshot = aggregate(
            &self.unit,
            self.tracked
                .iter()
                .zip(signals.iter().copied())
                .map(|(t, m)| (&t.threshold, m)),
        );
        trace!(matched = signals.iter().filter(|m| **m).count(), ?snapshot, "aggregated");
        self.snapshot = Some(snapshot.clone());
        snapshot
    }

    /// The snapshot from the most recent pass, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubberband_core::{AxisKind, Bound, ThresholdConfig};

    fn threshold(axis: AxisKind, bound: impl Into<Bound>) -> Threshold {
        Threshold::new(axis, bound, Unit::default())
    }

    #[test]
    fn max_axis_takes_smallest_match() {
        let a = threshold(AxisKind::MaxWidth, 500u32);
        let b = threshold(AxisKind::MaxWidth, 900u32);
        let c = threshold(AxisKind::MaxWidth, Bound::Unbounded);
        let snap = aggregate(&Unit::default(), [(&a, false), (&b, true), (&c, true)]);
        assert_eq!(snap.max_width, Some(Bound::finite(900.0)));
    }

    #[test]
    fn min_axis_takes_largest_match() {
        let a = threshold(AxisKind::MinHeight, 0u32);
        let b = threshold(AxisKind::MinHeight, 480u32);
        let c = threshold(AxisKind::MinHeight, 720u32);
        let snap = aggregate(&Unit::default(), [(&c, false), (&a, true), (&b, true)]);
        assert_eq!(snap.min_height, Some(Bound::finite(480.0)));
    }

    #[test]
    fn unbounded_only_when_sole_match() {
        let a = threshold(AxisKind::MaxWidth, 500u32);
        let c = threshold(AxisKind::MaxWidth, Bound::Unbounded);
        let snap = aggregate(&Unit::default(), [(&a, false), (&c, true)]);
        assert_eq!(snap.max_width, Some(Bound::Unbounded));
        let snap = aggregate(&Unit::default(), [(&a, true), (&c, true)]);
        assert_eq!(snap.max_width, Some(Bound::finite(500.0)));
    }

    #[test]
    fn no_match_leaves_axis_absent() {
        let a = threshold(AxisKind::MaxHeight, 500u32);
        let snap = aggregate(&Unit::new("em"), [(&a, false)]);
        assert_eq!(snap.max_height, None);
        assert_eq!(snap.selected().count(), 0);
        assert_eq!(snap.unit.as_str(), "em");
    }

    #[test]
    fn recompute_replaces_snapshot_every_pass() {
        let set = ThresholdConfig::empty()
            .max_width([500u32, 900])
            .merge_over(&ThresholdConfig::default());
        let mut agg = StateAggregator::from_set(&set);
        assert_eq!(agg.len(), 6);
        assert!(agg.snapshot().is_none());

        let first = agg.recompute(|q| q.as_str() != "(max-width: 500px)");
        let second = agg.recompute(|q| q.as_str() != "(max-width: 500px)");
        assert_eq!(first, second);
        assert_eq!(agg.passes(), 2);
        assert_eq!(agg.snapshot(), Some(&second));
        assert_eq!(second.max_width, Some(Bound::finite(900.0)));
        assert_eq!(second.min_width, Some(Bound::finite(0.0)));
    }

    #[test]
    fn attach_and_detach_track_listener_ids() {
        let set = ThresholdConfig::empty().merge_over(&ThresholdConfig::default());
        let mut agg = StateAggregator::from_set(&set);
        let mut next = 10;
        let mut seen = Vec::new();
        agg.attach(|q| {
            seen.push(q.clone());
            next += 1;
            ListenerId(next)
        });
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[1].as_str(), "(max-width: 100000px)");

        // Attaching twice does not double-subscribe.
        agg.attach(|_| unreachable!("already attached"));

        let ids = agg.detach();
        assert_eq!(ids, vec![ListenerId(11), ListenerId(12), ListenerId(13), ListenerId(14)]);
        assert!(agg.detach().is_empty());
    }
}
