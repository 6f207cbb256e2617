//! Mount API - Runtime context, render loop and delegated dispatch.
//!
//! A [`Runtime`] owns everything one UI needs: the document, the handler
//! registry, the store, the location, and the mount binding (root function +
//! target element). It is a cheap handle; clones share the same runtime, and
//! independent runtimes never see each other's state.
//!
//! # Render loop
//!
//! Every trigger (store `set`, hash change, explicit [`Runtime::rerender`])
//! runs the same pass:
//! 1. drop the previous tree's handlers and remove everything under the target
//! 2. call the root function to get a fresh node tree
//! 3. materialize it and attach it under the target, then apply autofocus
//!
//! There is no diffing. Each pass costs O(tree size), which is fine for
//! small screens and the wrong tool for large interactive surfaces.
//!
//! Autofocus is applied on every pass, so after a rebuild focus sits on the
//! autofocus element (if any) rather than where it was. Hosts that want to
//! keep the user's position can compare [`Runtime::autofocused`] across
//! passes; the terminal host does.
//!
//! # Borrowing
//!
//! A handler may hold a [`Runtime::document`] borrow while it calls `set`.
//! The render that `set` triggers is then deferred until the handler returns
//! and runs before `dispatch` does. Outside dispatch, a render attempted
//! while the document is borrowed fails with [`RuntimeError::DocumentBusy`].
//!
//! # Example
//!
//! ```ignore
//! use kindling::{Props, Runtime, RuntimeConfig, h};
//! use serde_json::json;
//!
//! let rt = Runtime::new(RuntimeConfig::default());
//! let target = rt.create_mount_point()?;
//! rt.mount(|rt| h("p", Props::new(), rt.route()), target)?;
//!
//! // Re-renders synchronously before returning
//! rt.set(json!({ "todos": [] }))?;
//! ```

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::config::RuntimeConfig;
use crate::engine::{Document, EventRegistry};
use crate::error::{DomError, Result, RuntimeError};
use crate::primitives::{Handler, Node};
use crate::state::{Location, State, Store};
use crate::types::{Event, EventKind, NodeId};
use super::materialize::materialize;

// =============================================================================
// Mount Binding
// =============================================================================

/// Function producing the whole screen from current state.
pub type RootFn = Rc<dyn Fn(&Runtime) -> Node>;

struct MountBinding {
    root: RootFn,
    target: NodeId,
}

// =============================================================================
// Runtime
// =============================================================================

struct RuntimeInner {
    config: RuntimeConfig,
    document: RefCell<Document>,
    registry: RefCell<EventRegistry>,
    store: Store<State>,
    location: Location,
    binding: RefCell<Option<MountBinding>>,
    renders: Cell<u64>,
    autofocused: Cell<Option<NodeId>>,
    /// Nesting depth of handler invocations.
    dispatching: Cell<u32>,
    /// A render was skipped because a handler held the document.
    pending_render: Cell<bool>,
}

/// Handle to one UI runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("mounted", &self.is_mounted())
            .field("renders", &self.render_count())
            .field("hash", &self.inner.location.hash())
            .finish()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

/// Re-render through a weak handle; a dropped runtime is a no-op.
fn rerender_weak(weak: &Weak<RuntimeInner>) -> Result<()> {
    match weak.upgrade() {
        Some(inner) => Runtime { inner }.rerender(),
        None => Ok(()),
    }
}

impl Runtime {
    /// Create a runtime with an empty state.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_state(config, State::new())
    }

    /// Create a runtime with an initial state.
    ///
    /// The store and the location get one subscriber each: the re-render.
    pub fn with_state(config: RuntimeConfig, initial: State) -> Self {
        let location = Location::new(&config.initial_hash);
        let inner = Rc::new(RuntimeInner {
            config,
            document: RefCell::new(Document::new()),
            registry: RefCell::new(EventRegistry::new()),
            store: Store::new(initial),
            location,
            binding: RefCell::new(None),
            renders: Cell::new(0),
            autofocused: Cell::new(None),
            dispatching: Cell::new(0),
            pending_render: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        inner.store.subscribe({
            let weak = weak.clone();
            move || rerender_weak(&weak)
        });
        inner.location.on_hash_change(move || rerender_weak(&weak));

        Self { inner }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Store<State> {
        &self.inner.store
    }

    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    /// Current fragment, or the configured default route.
    pub fn route(&self) -> String {
        self.inner.location.route(&self.inner.config.default_route)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Rc<State> {
        self.inner.store.get()
    }

    /// Merge a JSON object into the state. Re-renders before returning.
    pub fn set(&self, patch: Value) -> Result<()> {
        self.inner.store.set_json(patch)
    }

    // -------------------------------------------------------------------------
    // Document access
    // -------------------------------------------------------------------------

    /// Read the document.
    ///
    /// Do not call back into the runtime from `f`; the document is borrowed.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.inner.document.borrow())
    }

    /// Mutate the document (hosts use this for live edits and focus).
    ///
    /// Fails with [`RuntimeError::DocumentBusy`] while a borrow is held.
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Result<R> {
        let mut document = self
            .inner
            .document
            .try_borrow_mut()
            .map_err(|_| RuntimeError::DocumentBusy)?;
        Ok(f(&mut document))
    }

    /// Borrow the document directly.
    ///
    /// Drop the borrow before mutating through the runtime; see the
    /// module docs for what happens to renders triggered meanwhile.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Live value of an element.
    pub fn value_of(&self, id: NodeId) -> Option<String> {
        self.with_document(|doc| doc.value(id).map(str::to_string))
    }

    /// Live checked state of an element.
    pub fn checked_of(&self, id: NodeId) -> bool {
        self.with_document(|doc| doc.checked(id))
    }

    /// Create an empty mount element under `body`.
    pub fn create_mount_point(&self) -> Result<NodeId> {
        let tag = self.inner.config.mount_tag.clone();
        let created = self.with_document_mut(|doc| -> Result<NodeId, DomError> {
            let id = doc.create_element(&tag)?;
            let body = doc.body();
            doc.append_child(body, id)?;
            Ok(id)
        })?;
        Ok(created?)
    }

    // -------------------------------------------------------------------------
    // Mounting & rendering
    // -------------------------------------------------------------------------

    /// Bind `root` to `target` and render once.
    ///
    /// Replaces any previous binding. Content the previous binding left in
    /// its own target stays until that target is rendered into again.
    pub fn mount<F>(&self, root: F, target: NodeId) -> Result<()>
    where
        F: Fn(&Runtime) -> Node + 'static,
    {
        *self.inner.binding.borrow_mut() = Some(MountBinding {
            root: Rc::new(root),
            target,
        });
        tracing::debug!("mounted root");
        self.rerender()
    }

    /// Drop the binding and clear the target.
    pub fn unmount(&self) -> Result<()> {
        let mut document = self
            .inner
            .document
            .try_borrow_mut()
            .map_err(|_| RuntimeError::DocumentBusy)?;
        let Some(binding) = self.inner.binding.borrow_mut().take() else {
            return Ok(());
        };
        self.inner.registry.borrow_mut().clear();
        document.remove_children(binding.target);
        self.inner.autofocused.set(None);
        tracing::debug!("unmounted root");
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.binding.borrow().is_some()
    }

    /// Current mount target.
    pub fn mount_target(&self) -> Option<NodeId> {
        self.inner.binding.borrow().as_ref().map(|binding| binding.target)
    }

    /// Tear down and rebuild everything under the mount target.
    ///
    /// No-op without a binding. A materialization failure aborts the pass
    /// (the target stays empty, the partial tree is freed) and is returned
    /// to whoever triggered it.
    pub fn rerender(&self) -> Result<()> {
        let Some((root, target)) = self
            .inner
            .binding
            .borrow()
            .as_ref()
            .map(|binding| (Rc::clone(&binding.root), binding.target))
        else {
            return Ok(());
        };

        {
            let Ok(mut document) = self.inner.document.try_borrow_mut() else {
                return self.defer_render();
            };
            if self.inner.config.prune_handlers {
                self.inner.registry.borrow_mut().clear();
            }
            document.remove_children(target);
        }
        self.inner.autofocused.set(None);

        // User code runs with nothing borrowed
        let tree = root(self);

        let Ok(mut document) = self.inner.document.try_borrow_mut() else {
            return self.defer_render();
        };
        let result = {
            let mut registry = self.inner.registry.borrow_mut();
            materialize(&mut document, &mut registry, &tree)
        };
        let materialized = match result {
            Ok(materialized) => materialized,
            Err(err) => {
                tracing::warn!(error = %err, "render failed");
                return Err(err.into());
            }
        };

        if let Err(err) = document.append_child(target, materialized.root) {
            document.remove(materialized.root);
            tracing::warn!(error = %err, "render failed");
            return Err(err.into());
        }
        if let Some(id) = materialized.autofocus {
            document.focus(id);
        }
        self.inner.autofocused.set(materialized.autofocus);
        drop(document);

        let renders = self.inner.renders.get() + 1;
        self.inner.renders.set(renders);
        tracing::debug!(
            render = renders,
            nodes = materialized.created,
            handlers = self.handler_count(),
            "rendered"
        );
        Ok(())
    }

    /// Skip a render because the document is borrowed.
    ///
    /// Inside dispatch the render is replayed once the handler returns.
    fn defer_render(&self) -> Result<()> {
        if self.inner.dispatching.get() == 0 {
            return Err(RuntimeError::DocumentBusy);
        }
        tracing::debug!("document borrowed, render deferred until the handler returns");
        self.inner.pending_render.set(true);
        Ok(())
    }

    /// Element the last render focused through autofocus.
    pub fn autofocused(&self) -> Option<NodeId> {
        self.inner.autofocused.get()
    }

    /// Completed render passes.
    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    /// Live handler entries.
    pub fn handler_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Deliver an event through the root listener.
    ///
    /// The closest element at or above the target with a live handler for
    /// the event's kind gets it; nothing else does. A click inside an `a`
    /// whose `href` is a fragment also navigates there afterwards.
    ///
    /// Returns whether a handler ran or navigation happened. Kinds outside
    /// the configured listen set and targets without handlers are ignored.
    pub fn dispatch(&self, event: Event) -> Result<bool> {
        if !self.inner.config.listen.accepts(event.kind) {
            tracing::trace!(kind = %event.kind, "event kind not listened for");
            return Ok(false);
        }

        let (resolved, link) = {
            let document = self
                .inner
                .document
                .try_borrow()
                .map_err(|_| RuntimeError::DocumentBusy)?;
            let registry = self.inner.registry.borrow();
            let link = if event.kind == EventKind::Click {
                fragment_link(&document, event.target)
            } else {
                None
            };
            (registry.resolve(&document, &event), link)
        };

        let depth = self.inner.dispatching.get();
        self.inner.dispatching.set(depth + 1);
        let outcome = self.deliver(event, resolved, link);
        self.inner.dispatching.set(depth);

        // Replay a render the handler blocked by holding the document
        let replayed = if depth == 0 && self.inner.pending_render.replace(false) {
            self.rerender()
        } else {
            Ok(())
        };
        let handled = outcome?;
        replayed?;
        Ok(handled)
    }

    fn deliver(
        &self,
        mut event: Event,
        resolved: Option<(NodeId, Handler)>,
        link: Option<String>,
    ) -> Result<bool> {
        let mut handled = false;
        if let Some((current_target, handler)) = resolved {
            event.current_target = Some(current_target);
            handler(&event, self)?;
            handled = true;
        }
        if let Some(href) = link {
            self.inner.location.set_hash(&href)?;
            handled = true;
        }
        Ok(handled)
    }

    /// Dispatch a click on `target`.
    pub fn click(&self, target: NodeId) -> Result<bool> {
        self.dispatch(Event::click(target))
    }

    /// Dispatch a key press on `target`.
    pub fn key_down(&self, target: NodeId, key: &str) -> Result<bool> {
        self.dispatch(Event::key_down(target, key))
    }
}

/// `href` of the closest `a` at or above `id`, if it is a fragment link.
fn fragment_link(document: &Document, id: NodeId) -> Option<String> {
    document
        .ancestors(id)
        .into_iter()
        .find(|node| document.tag(*node) == Some("a"))
        .and_then(|anchor| document.attribute(anchor, "href"))
        .filter(|href| href.starts_with('#'))
        .map(str::to_string)
}

// =============================================================================
// TESTS
// =============================================================================
