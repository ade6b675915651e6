#![forbid(unsafe_code)]

//! A deterministic, in-memory viewport implementing [`MatchSource`].
//!
//! Tests set the viewport size with [`SimulatedViewport::resize`]; every
//! subscribed condition whose result flips has its callback invoked
//! synchronously, in subscription order, before `resize` returns.
//!
//! # Evaluation
//!
//! Conditions are parsed with [`MediaQuery::conditions`]. `px` and unitless
//! values compare directly; `em` and `rem` are scaled by 16. Queries that do
//! not parse never match.
//!
//! # Invariants
//!
//! 1. A callback fires only when its condition's result actually flips.
//! 2. No internal borrow is held while callbacks run.
//! 3. A listener removed by an earlier callback in the same pass is skipped.
//! 4. A callback may resize again. Flips from the outer pass that the nested
//!    resize already reversed are skipped, so every invocation sees the
//!    condition in the state it flipped to.

use std::cell::RefCell;
use std::rc::Rc;

use rubberband_core::{AxisKind, ChangeCallback, ListenerId, MatchSource, MediaQuery};
use tracing::{debug, trace};

const EM_PX: f64 = 16.0;

struct Listener {
    id: ListenerId,
    condition: MediaQuery,
    last: bool,
    on_change: ChangeCallback,
}

struct ViewportInner {
    width: f64,
    height: f64,
    supported: bool,
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Shared handle to a simulated viewport.
#[derive(Clone)]
pub struct SimulatedViewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl std::fmt::Debug for SimulatedViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SimulatedViewport")
            .field("width", &inner.width)
            .field("height", &inner.height)
            .field("supported", &inner.supported)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl SimulatedViewport {
    /// A viewport of the given size with native match support.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewportInner {
                width,
                height,
                supported: true,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// A viewport whose host lacks the native match primitive.
    #[must_use]
    pub fn without_native_support(width: f64, height: f64) -> Self {
        let viewport = Self::new(width, height);
        viewport.inner.borrow_mut().supported = false;
        viewport
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.inner.borrow().width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.inner.borrow().height
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Change the width only.
    pub fn resize_width(&self, width: f64) {
        let height = self.height();
        self.resize(width, height);
    }

    /// Change the height only.
    pub fn resize_height(&self, height: f64) {
        let width = self.width();
        self.resize(width, height);
    }

    /// Change the size and notify every listener whose result flipped.
    pub fn resize(&self, width: f64, height: f64) {
        let flipped: Vec<(ListenerId, bool, ChangeCallback)> = {
            let mut inner = self.inner.borrow_mut();
            inner.width = width;
            inner.height = height;
            let mut flipped = Vec::new();
            for listener in &mut inner.listeners {
                let now = evaluate(&listener.condition, width, height);
                if now != listener.last {
                    listener.last = now;
                    flipped.push((listener.id, now, Rc::clone(&listener.on_change)));
                }
            }
            flipped
        };

        debug!(width, height, flipped = flipped.len(), "viewport resized");

        for (id, now, on_change) in flipped {
            match self.last_result(id) {
                Some(last) if last == now => on_change(),
                Some(_) => trace!(%id, "skipping flip reversed by a nested resize"),
                None => trace!(%id, "skipping listener removed mid-pass"),
            }
        }
    }

    /// Last evaluated result for a live subscription.
    fn last_result(&self, id: ListenerId) -> Option<bool> {
        self.inner
            .borrow()
            .listeners
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.last)
    }
}

impl MatchSource for SimulatedViewport {
    fn supports_matching(&self) -> bool {
        self.inner.borrow().supported
    }

    fn subscribe(&self, condition: &MediaQuery, on_change: ChangeCallback) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        let last = evaluate(condition, inner.width, inner.height);
        inner.listeners.push(Listener {
            id,
            condition: condition.clone(),
            last,
            on_change,
        });
        trace!(%id, condition = %condition, last, "subscribed");
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|l| l.id != id);
        trace!(%id, "unsubscribed");
    }

    fn matches(&self, condition: &MediaQuery) -> bool {
        let inner = self.inner.borrow();
        evaluate(condition, inner.width, inner.height)
    }
}

fn evaluate(condition: &MediaQuery, width: f64, height: f64) -> bool {
    let Ok(conditions) = condition.conditions() else {
        return false;
    };
    conditions.iter().all(|cond| {
        let scale = match cond.unit.as_str() {
            "em" | "rem" => EM_PX,
            _ => 1.0,
        };
        let limit = cond.value * scale;
        match cond.axis {
            AxisKind::MinWidth => width >= limit,
            AxisKind::MaxWidth => width <= limit,
            AxisKind::MinHeight => height >= limit,
            AxisKind::MaxHeight => height <= limit,
        }
    })
}
