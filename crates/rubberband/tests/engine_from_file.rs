//! Building a configured engine straight from an options file.
//!
//! Run:
//!   cargo test -p rubberband --features config-file --test engine_from_file

use std::fs;

use rubberband::prelude::*;
use rubberband::{ConfigError, engine_from_file};
use rubberband_harness::SimulatedViewport;

#[test]
fn json_file_configures_the_engine() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rubberband.json");
    fs::write(&path, r#"{"maxWidth": [500, 900], "unit": "px"}"#).expect("write");

    let viewport = SimulatedViewport::new(800.0, 600.0);
    let engine = engine_from_file(viewport.clone(), &path).expect("valid json options");

    let snap = engine.current_snapshot().expect("configured");
    assert_eq!(snap.max_width, Some(Bound::finite(900.0)));
    assert_eq!(snap.min_width, Some(Bound::finite(0.0)));
    assert_eq!(viewport.listener_count(), 6);
}

#[test]
fn toml_file_configures_the_engine() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rubberband.toml");
    fs::write(&path, "min_height = [320, 480]\nunit = \"px\"\n").expect("write");

    let viewport = SimulatedViewport::new(800.0, 400.0);
    let engine = engine_from_file(viewport, &path).expect("valid toml options");

    let snap = engine.current_snapshot().expect("configured");
    assert_eq!(snap.min_height, Some(Bound::finite(320.0)));
    assert_eq!(snap.max_width, Some(Bound::Unbounded));
}

#[test]
fn files_without_json_extension_are_read_as_toml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rubberband.conf");
    fs::write(&path, r#"{"maxWidth": [500]}"#).expect("write");

    let err = engine_from_file(SimulatedViewport::new(800.0, 600.0), &path).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Toml(_))), "{err}");
}

#[test]
fn invalid_values_and_missing_files_are_config_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"minWidth": [-10]}"#).expect("write");

    let err = engine_from_file(SimulatedViewport::new(800.0, 600.0), &path).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Validation(_))));

    let missing = dir.path().join("missing.toml");
    let err = engine_from_file(SimulatedViewport::new(800.0, 600.0), &missing).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Io(_))));
}
