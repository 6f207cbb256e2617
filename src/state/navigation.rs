//! Navigation - URL fragment and hash-change listeners.
//!
//! The fragment is deliberately not part of the store. Root functions read
//! it straight from the [`Location`] at render time; the runtime only
//! guarantees that a fragment change triggers a fresh render.
//!
//! # API
//!
//! - `hash()` - Current fragment ("" or "#/...")
//! - `route(default)` - Fragment, or `default` when empty
//! - `set_hash(hash)` - Navigate; listeners fire only on an actual change
//! - `on_hash_change(fn)` - Append a listener

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// Hash-change listener. An error aborts the notification cycle.
pub type HashListener = Rc<dyn Fn() -> Result<()>>;

struct LocationInner {
    hash: RefCell<String>,
    listeners: RefCell<Vec<HashListener>>,
}

/// Shared handle to the current location fragment.
#[derive(Clone)]
pub struct Location {
    inner: Rc<LocationInner>,
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("hash", &*self.inner.hash.borrow())
            .finish()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("")
    }
}

/// Normalize a fragment: empty stays empty, otherwise it starts with `#`.
pub fn normalize_hash(hash: &str) -> String {
    if hash.is_empty() || hash == "#" {
        String::new()
    } else if hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{hash}")
    }
}

impl Location {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Rc::new(LocationInner {
                hash: RefCell::new(normalize_hash(initial)),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Current fragment including the leading `#`, or "".
    pub fn hash(&self) -> String {
        self.inner.hash.borrow().clone()
    }

    /// Current fragment, or `default` if there is none.
    pub fn route(&self, default: &str) -> String {
        let hash = self.hash();
        if hash.is_empty() {
            default.to_string()
        } else {
            hash
        }
    }

    /// Navigate to `hash`. Returns whether the fragment changed.
    pub fn set_hash(&self, hash: &str) -> Result<bool> {
        let next = normalize_hash(hash);
        if *self.inner.hash.borrow() == next {
            return Ok(false);
        }
        tracing::debug!(hash = %next, "hash changed");
        *self.inner.hash.borrow_mut() = next;

        let listeners: Vec<HashListener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener()?;
        }
        Ok(true)
    }

    /// Append a hash-change listener.
    pub fn on_hash_change<F>(&self, f: F)
    where
        F: Fn() -> Result<()> + 'static,
    {
        self.inner.listeners.borrow_mut().push(Rc::new(f));
    }
}
