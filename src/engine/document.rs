//! Document - Arena-backed element tree the materializer builds into.
//!
//! This is the "platform" side of the runtime: elements with attributes and
//! live properties (`value`, `checked`), text nodes, a permanent `body`
//! element, and a single focus slot. Hosts (terminal, tests) read it back
//! through the query helpers at the bottom of this file.
//!
//! Node ids that pointed into a removed subtree are stale; every query on a
//! stale id reports "absent" instead of panicking.

use indextree::Arena;

use crate::error::DomError;
use crate::types::NodeId;

// =============================================================================
// Node Data
// =============================================================================

/// Payload of one document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

/// Element payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    /// Markup attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Live `value` property. `None` falls back to the `value` attribute.
    pub value: Option<String>,
    /// Live `checked` property.
    pub checked: bool,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

// =============================================================================
// Name Validation
// =============================================================================

const FORBIDDEN_NAME_CHARS: [char; 6] = ['<', '>', '/', '"', '\'', '='];

/// Element names must start with an ASCII letter and contain no
/// whitespace or markup delimiters.
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| !c.is_whitespace() && !c.is_control() && !FORBIDDEN_NAME_CHARS.contains(&c))
}

/// Attribute names must be non-empty with no whitespace or markup delimiters.
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !FORBIDDEN_NAME_CHARS.contains(&c))
}

// =============================================================================
// Document
// =============================================================================

/// In-memory document tree.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeData>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `body` element.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let body = arena.new_node(NodeData::Element(ElementData::new("body")));
        Self {
            arena,
            body,
            focused: None,
        }
    }

    /// The permanent `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Whether `id` refers to a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some() && !id.is_removed(&self.arena)
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id).map(|node| node.get())
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        if !self.contains(id) {
            return Err(DomError::StaleNode);
        }
        match self.arena.get_mut(id).map(|node| node.get_mut()) {
            Some(NodeData::Element(element)) => Ok(element),
            Some(NodeData::Text(_)) => Err(DomError::NotAnElement),
            None => Err(DomError::StaleNode),
        }
    }

    // -------------------------------------------------------------------------
    // Creation & structure
    // -------------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if !is_valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }
        Ok(self.arena.new_node(NodeData::Element(ElementData::new(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.arena.new_node(NodeData::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::StaleNode);
        }
        if !matches!(self.data(parent), Some(NodeData::Element(_))) {
            return Err(DomError::NotAnElement);
        }
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|_| DomError::HierarchyRequest)
    }

    /// Remove and free every child subtree of `parent`.
    ///
    /// Returns the number of direct children removed.
    pub fn remove_children(&mut self, parent: NodeId) -> usize {
        let children = self.children(parent);
        for child in &children {
            child.remove_subtree(&mut self.arena);
        }
        if self.focused.is_some_and(|id| !self.contains(id)) {
            self.focused = None;
        }
        children.len()
    }

    /// Remove and free `id` with its whole subtree. No-op for stale ids.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        id.remove_subtree(&mut self.arena);
        if self.focused.is_some_and(|focused| !self.contains(focused)) {
            self.focused = None;
        }
    }

    /// Number of live nodes, attached or not (including `body`).
    pub fn live_nodes(&self) -> usize {
        self.arena.iter().filter(|node| !node.is_removed()).count()
    }

    /// Ordered children of `id`. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    /// Parent of `id`, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) {
            return None;
        }
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// `id` followed by its ancestors, closest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.ancestors(&self.arena).collect()
    }

    /// `id` and all of its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        id.descendants(&self.arena).collect()
    }

    // -------------------------------------------------------------------------
    // Attributes & properties
    // -------------------------------------------------------------------------

    /// Element payload of `id`.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Tag of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    /// Set (or replace) a markup attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidAttributeName(name.to_string()));
        }
        let element = self.element_mut(id)?;
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Read a markup attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attribute(name))
    }

    /// Assign the live `value` property.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        self.element_mut(id)?.value = Some(value.into());
        Ok(())
    }

    /// Live `value` of an element, falling back to its `value` attribute.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        let element = self.element(id)?;
        element.value.as_deref().or_else(|| element.attribute("value"))
    }

    /// Assign the live `checked` property.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        self.element_mut(id)?.checked = checked;
        Ok(())
    }

    /// Live `checked` property (false for stale ids and text nodes).
    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|element| element.checked)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Give focus to an element. Returns false if `id` is not a live element.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.contains(*id))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// Elements under (and including) `root` with the given tag.
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    /// Elements under (and including) `root` carrying `class`.
    pub fn find_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|element| element.has_class(class)))
            .collect()
    }

    /// Serialize `id` as markup. Live properties are not serialized.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(text)) => out.push_str(&escape(text, false)),
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&element.tag) {
                    return;
                }
                for child in self.children(id) {
                    self.write_markup(child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
            None => {}
        }
    }
}

fn is_void_element(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
