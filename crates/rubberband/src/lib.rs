#![forbid(unsafe_code)]

//! Rubberband public facade crate.
//!
//! Re-exports the vocabulary types from `rubberband-core` and the engine from
//! `rubberband-runtime`, and offers a prelude for day-to-day usage.
//!
//! ```ignore
//! use rubberband::prelude::*;
//!
//! let engine = Engine::new(source);
//! let _snap = engine.on_snap(|snap| println!("{snap:?}"));
//! engine.configure(&ThresholdConfig::empty().max_width([500u32, 900]));
//! engine.register(
//!     "(min-width: 500px)",
//!     BindingCallbacks::new().on_enter(|q| println!("entered {q}")),
//! );
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use rubberband_core::{
    AxisKind, BindingKey, Bound, BracketConfig, ChangeCallback, Condition, ConfigError, Dimension,
    ListenerId, MatchSource, MediaQuery, NATIVE_UNBOUNDED, Polarity, QueryError, Snapshot,
    Threshold, ThresholdConfig, ThresholdSet, Unit,
};

// --- Runtime re-exports ----------------------------------------------------

pub use rubberband_runtime::{
    Bracket, BracketTracker, BracketTransition, Engine, Latch, SnapSubscription, Transition,
    WeakEngine, aggregate,
};
pub use rubberband_runtime::registry::{BindingCallback, BindingCallbacks};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for the fallible edges of Rubberband.
#[derive(Debug)]
pub enum Error {
    /// Query or threshold text could not be parsed.
    Query(QueryError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Rubberband APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Convenience ------------------------------------------------------------

/// Parse a single-condition query back into a threshold.
///
/// `"(max-width: 100000px)"` yields an unbounded max-width threshold.
pub fn parse_threshold(text: &str) -> Result<Threshold> {
    Ok(Threshold::from_query(&MediaQuery::new(text))?)
}

/// Build an engine and configure it from a TOML or JSON options file.
///
/// The format is chosen by extension: `.json` is read as JSON, anything else
/// as TOML.
#[cfg(feature = "config-file")]
pub fn engine_from_file<S: MatchSource + 'static>(
    source: S,
    path: impl AsRef<std::path::Path>,
) -> Result<Engine<S>> {
    let path = path.as_ref();
    let options = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ThresholdConfig::from_json_file(path)?,
        _ => ThresholdConfig::from_toml_file(path)?,
    };
    let engine = Engine::new(source);
    engine.configure(&options);
    Ok(engine)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AxisKind, BindingCallbacks, Bound, Engine, Error, MatchSource, MediaQuery, Result,
        SnapSubscription, Snapshot, Threshold, ThresholdConfig, Unit, WeakEngine,
    };

    pub use crate::{core, runtime};
}

pub use rubberband_core as core;
pub use rubberband_runtime as runtime;
