#![forbid(unsafe_code)]

//! Binding registry: enter/leave callbacks attached to arbitrary queries.
//!
//! Bindings are keyed by [`BindingKey`], so `"(min-width: 500px)"` and
//! `"min-width:500px"` share one entry and one callback list.
//!
//! # Latch
//!
//! Each binding carries a one-way [`Latch`]. While `Unarmed`, a binding only
//! reacts to its condition *matching*; a non-matching signal is ignored.
//! The first dispatch arms it, after which every transition dispatches.
//! This guarantees that no binding fires a leave callback before it has
//! fired an enter callback.
//!
//! | latch    | matches | fires        | latch after |
//! |----------|---------|--------------|-------------|
//! | Unarmed  | false   | nothing      | Unarmed     |
//! | Unarmed  | true    | enter list   | Armed       |
//! | Armed    | true    | enter list   | Armed       |
//! | Armed    | false   | leave list   | Armed       |

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use rubberband_core::{BindingKey, ListenerId, MediaQuery};
use tracing::trace;

/// A caller-supplied enter or leave callback. Receives the bound query.
pub type BindingCallback = Rc<dyn Fn(&MediaQuery)>;

/// The callbacks supplied with one `register` call. Either may be absent.
#[derive(Clone, Default)]
pub struct BindingCallbacks {
    enter: Option<BindingCallback>,
    leave: Option<BindingCallback>,
}

impl BindingCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_enter(mut self, f: impl Fn(&MediaQuery) + 'static) -> Self {
        self.enter = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_leave(mut self, f: impl Fn(&MediaQuery) + 'static) -> Self {
        self.leave = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for BindingCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCallbacks")
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}

/// One-way activation state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latch {
    /// Never dispatched; leave transitions are suppressed.
    #[default]
    Unarmed,
    /// Dispatched at least once; every transition dispatches.
    Armed,
}

/// Direction of a dispatched transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Enter,
    Leave,
}

/// Callbacks selected for one dispatch, ready to run with no borrows held.
pub struct Dispatch {
    pub transition: Transition,
    pub query: MediaQuery,
    callbacks: Vec<BindingCallback>,
}

impl Dispatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invoke every callback in registration order.
    pub fn run(self) {
        for cb in &self.callbacks {
            cb(&self.query);
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("transition", &self.transition)
            .field("query", &self.query)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// A registered query with its latch and callback lists.
pub struct Binding {
    key: BindingKey,
    query: MediaQuery,
    latch: Latch,
    listener: Option<ListenerId>,
    enter: Vec<BindingCallback>,
    leave: Vec<BindingCallback>,
}

impl Binding {
    fn new(query: MediaQuery) -> Self {
        Self {
            key: query.key(),
            query,
            latch: Latch::Unarmed,
            listener: None,
            enter: Vec::new(),
            leave: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    /// The query text from the registration that created this binding.
    #[must_use]
    pub fn query(&self) -> &MediaQuery {
        &self.query
    }

    #[must_use]
    pub fn latch(&self) -> Latch {
        self.latch
    }

    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    #[must_use]
    pub fn enter_count(&self) -> usize {
        self.enter.len()
    }

    #[must_use]
    pub fn leave_count(&self) -> usize {
        self.leave.len()
    }

    fn extend(&mut self, callbacks: BindingCallbacks) {
        if let Some(enter) = callbacks.enter {
            self.enter.push(enter);
        }
        if let Some(leave) = callbacks.leave {
            self.leave.push(leave);
        }
    }

    /// Decide what a signal of `matches` dispatches, arming the latch.
    ///
    /// Returns `None` when the binding is unarmed and the condition does not
    /// match.
    pub fn plan(&mut self, matches: bool) -> Option<Dispatch> {
        if self.latch == Latch::Unarmed && !matches {
            return None;
        }
        let (transition, list) = if matches {
            (Transition::Enter, &self.enter)
        } else {
            (Transition::Leave, &self.leave)
        };
        let dispatch = Dispatch {
            transition,
            query: self.query.clone(),
            callbacks: list.clone(),
        };
        if self.latch == Latch::Unarmed {
            trace!(key = %self.key, "binding armed");
        }
        self.latch = Latch::Armed;
        Some(dispatch)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("query", &self.query)
            .field("latch", &self.latch)
            .field("listener", &self.listener)
            .field("enter", &self.enter.len())
            .field("leave", &self.leave.len())
            .finish()
    }
}

/// Outcome of adding callbacks to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new binding was created; it still needs a source subscription.
    Created,
    /// Callbacks were appended to an existing binding.
    Extended,
}

/// All bindings of one engine, at most one per key.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: AHashMap<BindingKey, Binding>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callbacks` to the binding for `query`, creating it if needed.
    pub fn add(&mut self, query: MediaQuery, callbacks: BindingCallbacks) -> Registration {
        let key = query.key();
        let mut outcome = Registration::Extended;
        let binding = self.bindings.entry(key).or_insert_with(|| {
            outcome = Registration::Created;
            Binding::new(query)
        });
        binding.extend(callbacks);
        outcome
    }

    /// Record the source subscription backing a binding.
    pub fn set_listener(&mut self, key: &BindingKey, id: ListenerId) {
        if let Some(binding) = self.bindings.get_mut(key) {
            binding.listener = Some(id);
        }
    }

    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn get_mut(&mut self, key: &BindingKey) -> Option<&mut Binding> {
        self.bindings.get_mut(key)
    }

    /// Delete a binding. Unknown keys return `None`.
    pub fn remove(&mut self, key: &BindingKey) -> Option<Binding> {
        self.bindings.remove(key)
    }

    /// Remove every binding, returning them.
    pub fn drain(&mut self) -> Vec<Binding> {
        self.bindings.drain().map(|(_, b)| b).collect()
    }

    #[must_use]
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
