#![forbid(unsafe_code)]

//! Ordered recording of callback invocations.

use std::cell::RefCell;
use std::rc::Rc;

use rubberband_core::MediaQuery;

/// Shared, append-only log of labelled events.
///
/// Cloning yields another handle to the same log, so a clone can be moved
/// into a callback while the test keeps its own handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// A binding callback that records `label` each time it runs.
    pub fn recorder(&self, label: &str) -> impl Fn(&MediaQuery) + use<> {
        let log = self.clone();
        let label = label.to_string();
        move |_| log.push(label.clone())
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Return all entries and clear the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}
