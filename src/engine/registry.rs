//! Handler Registry - Opaque handler ids for delegated dispatch.
//!
//! The materializer registers every event-bearing prop here and records the
//! returned id on the element as a `data-on<kind>` attribute. Dispatch walks
//! from the event target up through its ancestors and resolves the first id
//! that is still registered.
//!
//! Entries are scoped to one materialized tree: the render loop clears the
//! registry before building the next tree. Ids come from a monotonically
//! increasing counter and are never reissued, so an id left on a stale
//! element can never resolve to a newer handler.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::engine::Document;
use crate::primitives::Handler;
use crate::types::{Event, NodeId};

// =============================================================================
// Handler Id
// =============================================================================

/// Opaque handler identifier, rendered as `h<n>` in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

impl FromStr for HandlerId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('h')
            .and_then(|digits| digits.parse().ok())
            .map(HandlerId)
            .ok_or(())
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Table of live handler ids.
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<HandlerId, Handler>,
    next_id: u64,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("live", &self.handlers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` under a fresh id.
    pub fn register(&mut self, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, handler);
        tracing::trace!(handler = %id, "registered handler");
        id
    }

    /// Live handler for `id`.
    pub fn get(&self, id: HandlerId) -> Option<Handler> {
        self.handlers.get(&id).cloned()
    }

    /// Whether `id` is live.
    pub fn is_registered(&self, id: HandlerId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Drop every entry. Issued ids stay retired.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Find the handler an event resolves to.
    ///
    /// Starts at the event target and walks up. The first element carrying a
    /// live id for the event's kind wins; farther ancestors are never
    /// consulted. Returns the element the handler sits on together with the
    /// handler, or `None` when nothing matches (including stale targets).
    ///
    /// Resolution is separate from invocation so callers can release their
    /// borrows of the document and the registry before running user code.
    pub fn resolve(&self, document: &Document, event: &Event) -> Option<(NodeId, Handler)> {
        let attribute = event.kind.handler_attribute();
        for node in document.ancestors(event.target) {
            let Some(raw) = document.attribute(node, &attribute) else {
                continue;
            };
            let Ok(id) = raw.parse::<HandlerId>() else {
                continue;
            };
            if let Some(handler) = self.get(id) {
                return Some((node, handler));
            }
        }
        tracing::trace!(kind = %event.kind, "no handler for event");
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::primitives::handler;
    use crate::types::EventKind;

    fn counting_handler(count: &Rc<Cell<u32>>) -> Handler {
        let count = count.clone();
        handler(move |_event, _runtime| {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    /// body > div(outer) > div(middle) > span(target)
    fn nested(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
        let outer = doc.create_element("div").unwrap();
        let middle = doc.create_element("div").unwrap();
        let target = doc.create_element("span").unwrap();
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, middle).unwrap();
        doc.append_child(middle, target).unwrap();
        (outer, middle, target)
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut registry = EventRegistry::new();
        let count = Rc::new(Cell::new(0));
        let a = registry.register(counting_handler(&count));
        let b = registry.register(counting_handler(&count));
        assert_ne!(a, b);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.is_registered(a));

        let c = registry.register(counting_handler(&count));
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn test_handler_id_round_trips_through_attribute_text() {
        let id = HandlerId(42);
        assert_eq!(id.to_string(), "h42");
        assert_eq!("h42".parse::<HandlerId>(), Ok(id));
        assert!("42".parse::<HandlerId>().is_err());
        assert!("hx".parse::<HandlerId>().is_err());
    }

    #[test]
    fn test_no_handler_resolves_to_none() {
        let mut doc = Document::new();
        let (_, _, target) = nested(&mut doc);
        let registry = EventRegistry::new();
        assert!(registry.resolve(&doc, &Event::click(target)).is_none());
    }

    #[test]
    fn test_closest_ancestor_wins() {
        let mut doc = Document::new();
        let (outer, _middle, target) = nested(&mut doc);
        let mut registry = EventRegistry::new();

        let near = Rc::new(Cell::new(0));
        let far = Rc::new(Cell::new(0));
        let far_id = registry.register(counting_handler(&far));
        let near_id = registry.register(counting_handler(&near));

        let attribute = EventKind::Click.handler_attribute();
        doc.set_attribute(doc.body(), &attribute, &far_id.to_string()).unwrap();
        doc.set_attribute(outer, &attribute, &near_id.to_string()).unwrap();

        // Handler is two levels above the target
        let (found, _) = registry.resolve(&doc, &Event::click(target)).unwrap();
        assert_eq!(found, outer);
    }

    #[test]
    fn test_stale_id_is_skipped() {
        let mut doc = Document::new();
        let (outer, middle, target) = nested(&mut doc);
        let mut registry = EventRegistry::new();
        let count = Rc::new(Cell::new(0));

        let attribute = EventKind::Click.handler_attribute();
        doc.set_attribute(middle, &attribute, "h999").unwrap();
        let live = registry.register(counting_handler(&count));
        doc.set_attribute(outer, &attribute, &live.to_string()).unwrap();

        let (found, _) = registry.resolve(&doc, &Event::click(target)).unwrap();
        assert_eq!(found, outer);
    }

    #[test]
    fn test_kind_must_match() {
        let mut doc = Document::new();
        let (outer, _, target) = nested(&mut doc);
        let mut registry = EventRegistry::new();
        let count = Rc::new(Cell::new(0));
        let id = registry.register(counting_handler(&count));
        let attribute = EventKind::KeyDown.handler_attribute();
        doc.set_attribute(outer, &attribute, &id.to_string()).unwrap();

        assert!(registry.resolve(&doc, &Event::click(target)).is_none());
        assert!(registry.resolve(&doc, &Event::key_down(target, "Enter")).is_some());
    }
}
