#![forbid(unsafe_code)]

//! The engine: one explicit instance owning thresholds, snapshot and bindings.
//!
//! # Design
//!
//! [`Engine<S>`] is a cheap, clonable handle (`Rc`) over a single engine
//! instance built on a [`MatchSource`]. Any number of engines may share one
//! source; they never see each other's state.
//!
//! Source callbacks hold only a `Weak` reference to the engine, so dropping
//! the last handle ends every reaction and releases every subscription.
//!
//! Caller callbacks are owned by the engine. A callback that captures a
//! strong [`Engine`] clone therefore keeps the engine alive through its own
//! registry, and dropping the outside handles releases nothing. Capture a
//! [`WeakEngine`] from [`Engine::downgrade`] instead, or break the cycle
//! explicitly with [`Engine::shutdown`].
//!
//! # Reactive flow
//!
//! ```text
//! threshold flips ─▶ aggregate all signals ─▶ store snapshot ─▶ snap listeners
//! binding flips   ─▶ latch decision        ─▶ enter/leave callbacks
//! ```
//!
//! All work happens synchronously inside the source's change notification.
//! No engine borrow is held while caller callbacks run, so callbacks may
//! call back into the engine (`register`, `remove`, `current_snapshot`).
//!
//! # Failure Modes
//!
//! - **No native support**: if the source reports
//!   `supports_matching() == false`, every operation is inert: nothing is
//!   subscribed, `current_snapshot()` stays `None`, nothing fires.
//! - **Unknown key**: `remove` of an unregistered query is ignored.
//! - **Dead engine**: [`WeakEngine::upgrade`] returns `None` once the last
//!   strong handle is gone.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rubberband_core::{BindingKey, MatchSource, MediaQuery, Snapshot, ThresholdConfig};
use tracing::{debug, info_span, warn};

use crate::aggregator::StateAggregator;
use crate::registry::{Binding, BindingCallbacks, BindingRegistry, Registration};

type SnapCallback = dyn Fn(&Snapshot);

struct EngineState {
    defaults: ThresholdConfig,
    aggregator: StateAggregator,
    registry: BindingRegistry,
    /// Held weakly; a dropped [`SnapSubscription`] is pruned on the next pass.
    snap_listeners: Vec<Weak<SnapCallback>>,
}

struct EngineInner<S: MatchSource> {
    source: S,
    enabled: bool,
    state: RefCell<EngineState>,
}

impl<S: MatchSource> Drop for EngineInner<S> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let mut released = state.aggregator.detach();
        released.extend(state.registry.drain().iter().filter_map(|b| b.listener()));
        for id in &released {
            self.source.unsubscribe(*id);
        }
        debug!(released = released.len(), "engine dropped");
    }
}

/// A threshold-tracking engine bound to one match source.
pub struct Engine<S: MatchSource + 'static> {
    inner: Rc<EngineInner<S>>,
}

impl<S: MatchSource + 'static> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: MatchSource + 'static> fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Engine")
            .field("enabled", &self.inner.enabled)
            .field("thresholds", &state.aggregator.len())
            .field("bindings", &state.registry.len())
            .field("snapshot", &state.aggregator.snapshot())
            .finish()
    }
}

impl<S: MatchSource + 'static> Engine<S> {
    /// Create an engine with the built-in defaults. Nothing is subscribed
    /// until [`configure`](Self::configure) or [`register`](Self::register).
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_defaults(source, ThresholdConfig::default())
    }

    /// Create an engine whose defaults are `defaults` instead of the built-ins.
    #[must_use]
    pub fn with_defaults(source: S, defaults: ThresholdConfig) -> Self {
        let enabled = source.supports_matching();
        if !enabled {
            warn!("match source has no native support; engine is inert");
        }
        Self {
            inner: Rc::new(EngineInner {
                source,
                enabled,
                state: RefCell::new(EngineState {
                    defaults,
                    aggregator: StateAggregator::default(),
                    registry: BindingRegistry::new(),
                    snap_listeners: Vec::new(),
                }),
            }),
        }
    }

    /// Whether the capability gate is open.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Overlay `defaults` onto the current defaults that later `configure`
    /// calls merge over.
    ///
    /// Only supplied keys change: an axis with an empty list keeps its
    /// current default, and `unit: None` keeps the current unit.
    pub fn set_defaults(&self, defaults: ThresholdConfig) {
        if !self.inner.enabled {
            return;
        }
        self.inner.state.borrow_mut().defaults.overlay(&defaults);
    }

    #[must_use]
    pub fn defaults(&self) -> ThresholdConfig {
        self.inner.state.borrow().defaults.clone()
    }

    /// Merge `options` over the defaults, (re)subscribe every threshold and
    /// run an initial aggregation pass, which emits one snap notification.
    ///
    /// Thresholds from an earlier `configure` are unsubscribed first.
    pub fn configure(&self, options: &ThresholdConfig) {
        if !self.inner.enabled {
            return;
        }
        let (set, stale) = {
            let mut state = self.inner.state.borrow_mut();
            (options.merge_over(&state.defaults), state.aggregator.detach())
        };
        for id in stale {
            self.inner.source.unsubscribe(id);
        }

        let mut aggregator = StateAggregator::from_set(&set);
        aggregator.attach(|query| {
            let weak = Rc::downgrade(&self.inner);
            self.inner.source.subscribe(
                query,
                Rc::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        Self::respond(&inner);
                    }
                }),
            )
        });
        debug!(
            thresholds = aggregator.len(),
            unit = %aggregator.unit(),
            "thresholds configured"
        );
        self.inner.state.borrow_mut().aggregator = aggregator;

        Self::respond(&self.inner);
    }

    /// The snapshot from the latest aggregation pass, if any has run.
    #[must_use]
    pub fn current_snapshot(&self) -> Option<Snapshot> {
        self.inner.state.borrow().aggregator.snapshot().cloned()
    }

    /// Listen for snap notifications. Dropping the returned guard detaches
    /// the listener.
    pub fn on_snap(&self, listener: impl Fn(&Snapshot) + 'static) -> SnapSubscription {
        let strong: Rc<SnapCallback> = Rc::new(listener);
        if self.inner.enabled {
            self.inner
                .state
                .borrow_mut()
                .snap_listeners
                .push(Rc::downgrade(&strong));
        }
        SnapSubscription {
            _guard: Box::new(strong),
        }
    }

    /// Attach enter/leave callbacks to `query`, then dispatch once so the new
    /// callbacks observe the current state.
    pub fn register(&self, query: impl Into<MediaQuery>, callbacks: BindingCallbacks) {
        if !self.inner.enabled {
            return;
        }
        let query = query.into();
        let key = query.key();
        let outcome = self
            .inner
            .state
            .borrow_mut()
            .registry
            .add(query.clone(), callbacks);

        if outcome == Registration::Created {
            let weak = Rc::downgrade(&self.inner);
            let watched = key.clone();
            let id = self.inner.source.subscribe(
                &query,
                Rc::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        Self::dispatch(&inner, &watched);
                    }
                }),
            );
            self.inner.state.borrow_mut().registry.set_listener(&key, id);
        }
        debug!(%key, ?outcome, "binding registered");

        Self::dispatch(&self.inner, &key);
    }

    /// Detach and delete the binding for `query`. Unknown queries are ignored.
    pub fn remove(&self, query: impl Into<MediaQuery>) {
        if !self.inner.enabled {
            return;
        }
        let key = query.into().key();
        let removed = self.inner.state.borrow_mut().registry.remove(&key);
        let Some(binding) = removed else {
            return;
        };
        if let Some(id) = binding.listener() {
            self.inner.source.unsubscribe(id);
        }
        debug!(%key, "binding removed");
    }

    /// A handle that does not keep the engine alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakEngine<S> {
        WeakEngine {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Detach everything: unsubscribe every threshold and binding, forget
    /// the snapshot and drop every caller callback.
    ///
    /// The engine stays usable; a later `configure` or `register` starts
    /// from scratch with the current defaults.
    pub fn shutdown(&self) {
        let (released, bindings, listeners) = {
            let mut state = self.inner.state.borrow_mut();
            let mut aggregator = std::mem::take(&mut state.aggregator);
            let mut released = aggregator.detach();
            let bindings = state.registry.drain();
            released.extend(bindings.iter().filter_map(Binding::listener));
            let listeners = std::mem::take(&mut state.snap_listeners);
            (released, bindings, listeners)
        };
        for id in &released {
            self.inner.source.unsubscribe(*id);
        }
        debug!(
            released = released.len(),
            bindings = bindings.len(),
            snap_listeners = listeners.len(),
            "engine shut down"
        );
        // Callbacks may own engine handles; drop them with no borrow held.
        drop(bindings);
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.inner.state.borrow().registry.len()
    }

    #[must_use]
    pub fn is_registered(&self, query: impl Into<MediaQuery>) -> bool {
        let key = query.into().key();
        self.inner.state.borrow().registry.contains(&key)
    }

    // -----------------------------------------------------------------------
    // Reactions
    // -----------------------------------------------------------------------

    /// Threshold signal flipped: aggregate, store, emit.
    fn respond(inner: &Rc<EngineInner<S>>) {
        let (snapshot, listeners) = {
            let mut state = inner.state.borrow_mut();
            let source = &inner.source;
            let snapshot = state.aggregator.recompute(|q| source.matches(q));
            state.snap_listeners.retain(|w| w.strong_count() > 0);
            let listeners: Vec<Rc<SnapCallback>> = state
                .snap_listeners
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (snapshot, listeners)
        };

        let _span = info_span!("rubberband.snap", listeners = listeners.len()).entered();
        for listener in &listeners {
            listener(&snapshot);
        }
    }

    /// Binding signal flipped (or just registered): latch decision, fire.
    fn dispatch(inner: &Rc<EngineInner<S>>, key: &BindingKey) {
        let plan = {
            let mut state = inner.state.borrow_mut();
            let Some(binding) = state.registry.get_mut(key) else {
                return;
            };
            let matches = inner.source.matches(binding.query());
            binding.plan(matches)
        };
        let Some(plan) = plan else {
            return;
        };

        let _span = info_span!(
            "rubberband.dispatch",
            key = %key,
            transition = ?plan.transition,
            callbacks = plan.len()
        )
        .entered();
        plan.run();
    }
}

/// Non-owning engine handle, safe to capture in the engine's own callbacks.
pub struct WeakEngine<S: MatchSource + 'static> {
    inner: Weak<EngineInner<S>>,
}

impl<S: MatchSource + 'static> WeakEngine<S> {
    /// The engine, if any strong handle is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Engine<S>> {
        self.inner.upgrade().map(|inner| Engine { inner })
    }
}

impl<S: MatchSource + 'static> Clone for WeakEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: MatchSource + 'static> fmt::Debug for WeakEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEngine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// RAII guard for a snap listener.
///
/// Dropping it makes the listener unreachable; the engine prunes the dead
/// entry on its next aggregation pass.
pub struct SnapSubscription {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for SnapSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapSubscription").finish_non_exhaustive()
    }
}
