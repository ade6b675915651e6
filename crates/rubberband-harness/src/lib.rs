#![forbid(unsafe_code)]

//! Test harness for Rubberband.
//!
//! - [`SimulatedViewport`]: a deterministic [`MatchSource`] that evaluates
//!   size conditions against a width and height set by the test.
//! - [`CallLog`]: an ordered recorder for callback invocations.
//!
//! [`MatchSource`]: rubberband_core::MatchSource

pub mod call_log;
pub mod viewport;

pub use call_log::CallLog;
pub use viewport::SimulatedViewport;
