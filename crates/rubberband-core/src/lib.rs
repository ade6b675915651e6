#![forbid(unsafe_code)]

//! Core: axis kinds, thresholds, snapshots, query text and configuration.
//!
//! # Role in Rubberband
//! `rubberband-core` is the vocabulary layer. It defines the data model the
//! engine aggregates over and the [`MatchSource`] seam through which a host
//! supplies boolean viewport-condition signals.
//!
//! # Primary responsibilities
//! - **AxisKind / Bound / Threshold**: the four boundary categories, the
//!   unbounded sentinel and its native translation.
//! - **Snapshot**: the per-axis tightest-bound state.
//! - **MediaQuery / BindingKey**: condition text and formatting-insensitive keys.
//! - **ThresholdConfig**: union-merge options and file loading.
//!
//! # How it fits in the system
//! The runtime (`rubberband-runtime`) owns engine instances built on these
//! types; the harness (`rubberband-harness`) implements [`MatchSource`] for
//! deterministic tests.

pub mod axis;
pub mod bound;
pub mod config;
pub mod error;
pub mod query;
pub mod snapshot;
pub mod source;
pub mod threshold;

pub use axis::{AxisKind, Dimension, Polarity};
pub use bound::{Bound, NATIVE_UNBOUNDED};
pub use config::{BracketConfig, ThresholdConfig, ThresholdSet};
pub use error::{ConfigError, QueryError};
pub use query::{BindingKey, Condition, MediaQuery};
pub use snapshot::Snapshot;
pub use source::{ChangeCallback, ListenerId, MatchSource};
pub use threshold::{Threshold, Unit};
