//! End-to-end use through the facade prelude.

use std::cell::RefCell;
use std::rc::Rc;

use rubberband::prelude::*;
use rubberband_harness::{CallLog, SimulatedViewport};

#[test]
fn configure_register_and_resize_through_prelude() {
    let viewport = SimulatedViewport::new(1000.0, 700.0);
    let engine = Engine::new(viewport.clone());

    let snaps: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&snaps);
    let _sub = engine.on_snap(move |snap| sink.borrow_mut().push(snap.clone()));

    engine.configure(&ThresholdConfig::empty().max_width([500u32, 900]));
    assert_eq!(snaps.borrow().len(), 1);
    assert_eq!(
        engine.current_snapshot().unwrap().max_width,
        Some(Bound::Unbounded)
    );

    let log = CallLog::new();
    engine.register(
        "(max-width: 900px)",
        BindingCallbacks::new()
            .on_enter(log.recorder("narrow"))
            .on_leave(log.recorder("wide")),
    );
    assert!(log.is_empty());

    viewport.resize_width(800.0);
    viewport.resize_width(1200.0);
    assert_eq!(log.entries(), vec!["narrow", "wide"]);
    assert_eq!(
        engine.current_snapshot().unwrap().max_width,
        Some(Bound::Unbounded)
    );
    assert_eq!(snaps.borrow().len(), 3);
}

#[test]
fn facade_error_displays_inner_message() {
    let err = rubberband::parse_threshold("").unwrap_err();
    assert_eq!(err.to_string(), "empty media query");
}
