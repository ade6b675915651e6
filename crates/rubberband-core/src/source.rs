#![forbid(unsafe_code)]

//! The seam to the host's native "does this condition hold" primitive.
//!
//! A [`MatchSource`] owns one boolean signal per subscribed condition and
//! calls the supplied [`ChangeCallback`] whenever that boolean flips. The
//! engine reads signals through [`MatchSource::matches`] and never writes
//! them.
//!
//! # Contract
//!
//! 1. `on_change` is invoked synchronously on the host's thread, with no
//!    internal borrow held, so it may call back into the source.
//! 2. After `unsubscribe(id)` the callback for `id` is never invoked again.
//! 3. `matches` reflects the state at call time, including inside a
//!    change callback.
//! 4. A source that reports `supports_matching() == false` turns every
//!    engine built on it into a no-op.

use std::fmt;
use std::rc::Rc;

use crate::query::MediaQuery;

/// Callback invoked when a subscribed condition flips.
pub type ChangeCallback = Rc<dyn Fn()>;

/// Handle identifying one subscription on a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A host-side provider of boolean media-condition signals.
pub trait MatchSource {
    /// Whether the host has a native match primitive at all.
    fn supports_matching(&self) -> bool {
        true
    }

    /// Watch `condition` and call `on_change` every time its result flips.
    fn subscribe(&self, condition: &MediaQuery, on_change: ChangeCallback) -> ListenerId;

    /// Stop watching. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);

    /// Evaluate `condition` against the current viewport.
    fn matches(&self, condition: &MediaQuery) -> bool;
}

impl<S: MatchSource + ?Sized> MatchSource for Rc<S> {
    fn supports_matching(&self) -> bool {
        (**self).supports_matching()
    }

    fn subscribe(&self, condition: &MediaQuery, on_change: ChangeCallback) -> ListenerId {
        (**self).subscribe(condition, on_change)
    }

    fn unsubscribe(&self, id: ListenerId) {
        (**self).unsubscribe(id);
    }

    fn matches(&self, condition: &MediaQuery) -> bool {
        (**self).matches(condition)
    }
}
