//! Store - Shallow-merge state container with subscribers.
//!
//! # API
//!
//! - `get()` - Snapshot of the current state (`Rc<S>`, read-only)
//! - `set(patch)` - Shallow-merge `patch` into a new state, then notify
//! - `set_with(f)` - Same, with the patch computed from the current state
//! - `subscribe(fn)` - Append a subscriber (there is no unsubscribe)
//!
//! Notification is synchronous and in subscription order. A subscriber that
//! calls `set` unconditionally recurses without bound; nothing guards it.
//!
//! # Example
//!
//! ```ignore
//! use kindling::state::Store;
//! use serde_json::json;
//!
//! let store = Store::new(State::new());
//! store.subscribe(|| { println!("changed"); Ok(()) });
//! store.set_json(json!({ "todos": [], "editingId": null }))?;
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{Result, RuntimeError};

// =============================================================================
// Merge
// =============================================================================

/// Shallow merge: keys in the patch replace, all other keys are kept.
/// No recursion into nested values.
pub trait Merge: Clone {
    type Patch;

    /// Produce the merged value, leaving `self` untouched.
    fn merge(&self, patch: Self::Patch) -> Self;
}

/// Application state held by a runtime: an opaque JSON object.
pub type State = Map<String, Value>;

impl Merge for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn merge(&self, patch: Self::Patch) -> Self {
        let mut next = self.clone();
        for (key, value) in patch {
            next.insert(key, value);
        }
        next
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Merge for HashMap<K, V> {
    type Patch = HashMap<K, V>;

    fn merge(&self, patch: Self::Patch) -> Self {
        let mut next = self.clone();
        next.extend(patch);
        next
    }
}

impl<K: Ord + Clone, V: Clone> Merge for BTreeMap<K, V> {
    type Patch = BTreeMap<K, V>;

    fn merge(&self, patch: Self::Patch) -> Self {
        let mut next = self.clone();
        next.extend(patch);
        next
    }
}

// =============================================================================
// Store
// =============================================================================

/// Subscriber callback. An error aborts the notification cycle.
pub type Subscriber = Rc<dyn Fn() -> Result<()>>;

struct StoreInner<S> {
    state: RefCell<Rc<S>>,
    subscribers: RefCell<Vec<Subscriber>>,
    notifications: Cell<u64>,
}

/// Shared handle to one state container. Clones refer to the same store.
pub struct Store<S> {
    inner: Rc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<S: Merge + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Merge> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial)),
                subscribers: RefCell::new(Vec::new()),
                notifications: Cell::new(0),
            }),
        }
    }

    /// Current state. The snapshot never changes; later `set`s swap in a
    /// new value.
    pub fn get(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Merge `patch` into a new state, store it, and notify subscribers.
    pub fn set(&self, patch: S::Patch) -> Result<()> {
        let next = self.get().merge(patch);
        self.install(next)
    }

    /// Like [`set`](Self::set), with the patch computed from the current state.
    pub fn set_with<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&S) -> S::Patch,
    {
        let current = self.get();
        let next = current.merge(f(&current));
        self.install(next)
    }

    /// Replace the whole state (no merge), then notify.
    pub fn replace(&self, state: S) -> Result<()> {
        self.install(state)
    }

    fn install(&self, next: S) -> Result<()> {
        *self.inner.state.borrow_mut() = Rc::new(next);
        self.notify()
    }

    /// Append a subscriber.
    pub fn subscribe<F>(&self, f: F)
    where
        F: Fn() -> Result<()> + 'static,
    {
        self.inner.subscribers.borrow_mut().push(Rc::new(f));
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Number of notification cycles started so far.
    pub fn notification_count(&self) -> u64 {
        self.inner.notifications.get()
    }

    /// Call every subscriber once, in order. Stops at the first error.
    ///
    /// The list is snapshotted first so subscribers may call `set` or
    /// `subscribe` without hitting an outstanding borrow.
    fn notify(&self) -> Result<()> {
        self.inner.notifications.set(self.inner.notifications.get() + 1);
        let subscribers: Vec<Subscriber> = self.inner.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber()?;
        }
        Ok(())
    }
}

impl Store<State> {
    /// Merge a JSON object literal into the state.
    pub fn set_json(&self, patch: Value) -> Result<()> {
        match patch {
            Value::Object(map) => self.set(map),
            other => Err(RuntimeError::handler(format!(
                "state patch must be a JSON object, got {other}"
            ))),
        }
    }

    /// Read one top-level key (cloned).
    pub fn get_key(&self, key: &str) -> Option<Value> {
        self.get().get(key).cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================
