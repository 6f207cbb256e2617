//! Materializer - Turns a node tree into document nodes.
//!
//! Per node:
//! - `Empty` becomes an empty text node, so it still occupies a sibling slot
//! - `Text` becomes a text node with the literal content
//! - `Element` becomes a new element; props are applied in order:
//!   1. handlers are registered and their id recorded as `data-on<kind>`
//!   2. `value` is assigned as a live property
//!   3. `checked` is assigned as a live property
//!   4. `autofocus(true)` marks the element for focus once attached
//!   5. everything else is a plain attribute
//!
//! Children are materialized and appended in order. Bad tag or attribute
//! names fail with a [`DomError`] from the document; nothing is validated
//! ahead of time. On failure the partially built subtree is freed, so a
//! failing render leaves no nodes behind.

use crate::engine::{Document, EventRegistry};
use crate::error::DomError;
use crate::primitives::{Element, Node, Prop};
use crate::types::NodeId;

/// Result of materializing one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materialized {
    /// Detached root of the new subtree.
    pub root: NodeId,
    /// First element that asked for autofocus, in document order.
    pub autofocus: Option<NodeId>,
    /// Number of document nodes created.
    pub created: usize,
}

/// Builds document nodes for one render pass.
pub struct Materializer<'a> {
    document: &'a mut Document,
    registry: &'a mut EventRegistry,
    autofocus: Option<NodeId>,
    created: usize,
}

impl<'a> Materializer<'a> {
    pub fn new(document: &'a mut Document, registry: &'a mut EventRegistry) -> Self {
        Self {
            document,
            registry,
            autofocus: None,
            created: 0,
        }
    }

    /// Materialize `node` and everything under it.
    pub fn materialize(&mut self, node: &Node) -> Result<NodeId, DomError> {
        self.created += 1;
        let element = match node {
            Node::Empty => return Ok(self.document.create_text("")),
            Node::Text(text) => return Ok(self.document.create_text(text.as_str())),
            Node::Element(element) => element,
        };

        let id = self.document.create_element(element.tag())?;
        if let Err(err) = self.fill(id, element) {
            self.document.remove(id);
            if self.autofocus.is_some_and(|focus| !self.document.contains(focus)) {
                self.autofocus = None;
            }
            return Err(err);
        }
        Ok(id)
    }

    fn fill(&mut self, id: NodeId, element: &Element) -> Result<(), DomError> {
        for prop in element.props().iter() {
            self.apply(id, prop)?;
        }
        for child in element.children() {
            let child_id = self.materialize(child)?;
            if let Err(err) = self.document.append_child(id, child_id) {
                self.document.remove(child_id);
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply(&mut self, id: NodeId, prop: &Prop) -> Result<(), DomError> {
        match prop {
            Prop::On(kind, handler) => {
                let handler_id = self.registry.register(handler.clone());
                self.document
                    .set_attribute(id, &kind.handler_attribute(), &handler_id.to_string())
            }
            Prop::Value(value) => self.document.set_value(id, value.as_str()),
            Prop::Checked(checked) => self.document.set_checked(id, *checked),
            Prop::Autofocus(true) => {
                self.autofocus.get_or_insert(id);
                Ok(())
            }
            Prop::Autofocus(false) => Ok(()),
            Prop::Attr(name, value) => self.document.set_attribute(id, name, value),
        }
    }

    pub fn finish(self, root: NodeId) -> Materialized {
        Materialized {
            root,
            autofocus: self.autofocus,
            created: self.created,
        }
    }
}

/// Materialize `node` into `document`, registering handlers in `registry`.
pub fn materialize(
    document: &mut Document,
    registry: &mut EventRegistry,
    node: &Node,
) -> Result<Materialized, DomError> {
    let mut materializer = Materializer::new(document, registry);
    let root = materializer.materialize(node)?;
    Ok(materializer.finish(root))
}

// =============================================================================
// TESTS
// =============================================================================
