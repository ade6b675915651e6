#![forbid(unsafe_code)]

//! Rubberband Runtime
//!
//! The reactive half of Rubberband: turns boolean viewport-condition signals
//! from a [`MatchSource`](rubberband_core::MatchSource) into snapshots and
//! enter/leave callbacks.
//!
//! # Key Components
//!
//! - [`Engine`] - explicit engine instance: `configure`, `current_snapshot`,
//!   `register`, `remove`, `on_snap`, `shutdown`
//! - [`WeakEngine`] - non-owning handle for callbacks that re-enter the engine
//! - [`StateAggregator`] - tightest-bound snapshot per axis kind
//! - [`BindingRegistry`] - enter/leave callbacks keyed by normalized query
//! - [`BracketTracker`] - debounced single-axis width brackets
//!
//! # Execution model
//!
//! Single-threaded and synchronous. Engines are `!Send`; all callbacks for
//! one change run, in registration order, before the change notification
//! returns.

pub mod aggregator;
pub mod bracket;
pub mod engine;
pub mod registry;

pub use aggregator::{StateAggregator, aggregate};
pub use bracket::{Bracket, BracketTracker, BracketTransition};
pub use engine::{Engine, SnapSubscription, WeakEngine};
pub use registry::{
    Binding, BindingCallback, BindingCallbacks, BindingRegistry, Dispatch, Latch, Registration,
    Transition,
};
