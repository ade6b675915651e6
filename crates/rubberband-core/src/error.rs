#![forbid(unsafe_code)]

//! Error types for the parsing and loading edges.
//!
//! The reactive engine itself never fails; only text that enters from the
//! outside (query strings, configuration files) can be rejected.

use thiserror::Error;

/// A query or threshold string that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty media query")]
    Empty,
    #[error("unsupported media feature `{0}`")]
    UnknownFeature(String),
    #[error("media feature `{feature}` has no value")]
    MissingValue { feature: String },
    #[error("cannot parse `{0}` as a numeric threshold")]
    BadValue(String),
    #[error("expected exactly one condition, found {0}")]
    NotSingle(usize),
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
