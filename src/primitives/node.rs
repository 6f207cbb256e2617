//! Node - Immutable description of one piece of UI.
//!
//! A tree of [`Node`]s is what an application's root function returns on
//! every render. Nodes are never mutated after construction; an update is a
//! new tree. Elements sit behind an `Rc` so subtrees can be shared between
//! trees cheaply.
//!
//! No validation happens here: a bad tag or attribute name only fails when
//! the tree is materialized.

use std::rc::Rc;

use super::types::{Prop, Props};

// =============================================================================
// Node
// =============================================================================

/// One node of a UI description.
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Element with a tag, props and ordered children.
    Element(Rc<Element>),
    /// Plain text content.
    Text(String),
    /// Nothing. Materializes to an empty text node.
    #[default]
    Empty,
}

/// Element payload of a [`Node`].
#[derive(Debug)]
pub struct Element {
    tag: String,
    props: Props,
    children: Vec<Node>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl Node {
    /// Element payload, if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// Number of nodes in this tree, counting text and empty nodes.
    pub fn size(&self) -> usize {
        match self {
            Node::Element(element) => 1 + element.children.iter().map(Node::size).sum::<usize>(),
            Node::Text(_) | Node::Empty => 1,
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Build an element node.
///
/// `children` accepts a single node, text, a `Vec`, an array, an `Option`
/// or `()`. A lone child is wrapped into a one-element list.
///
/// ```ignore
/// h("li", Props::new().class("completed"), vec![
///     h("label", Props::new(), todo.text.as_str()),
///     h("button", Props::new().class("destroy"), "×"),
/// ])
/// ```
pub fn h(tag: impl Into<String>, props: Props, children: impl Into<Children>) -> Node {
    Node::Element(Rc::new(Element {
        tag: tag.into(),
        props,
        children: children.into().0,
    }))
}

/// Text node.
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<Option<Node>> for Node {
    fn from(value: Option<Node>) -> Self {
        value.unwrap_or(Node::Empty)
    }
}

// =============================================================================
// Children
// =============================================================================

/// Normalized, ordered child list.
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<Node>);

impl From<Vec<Node>> for Children {
    fn from(value: Vec<Node>) -> Self {
        Children(value)
    }
}

impl<const N: usize> From<[Node; N]> for Children {
    fn from(value: [Node; N]) -> Self {
        Children(value.into())
    }
}

impl From<Node> for Children {
    fn from(value: Node) -> Self {
        Children(vec![value])
    }
}

impl From<Option<Node>> for Children {
    fn from(value: Option<Node>) -> Self {
        Children(vec![Node::from(value)])
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Children(vec![Node::from(value)])
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Children(vec![Node::from(value)])
    }
}

impl From<()> for Children {
    fn from(_: ()) -> Self {
        Children::default()
    }
}

impl FromIterator<Node> for Children {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Children(iter.into_iter().collect())
    }
}

/// Shorthand for an element with only a `class` attribute.
pub fn el(tag: &str, class: &str, children: impl Into<Children>) -> Node {
    let props = if class.is_empty() {
        Props::new()
    } else {
        Props::new().with(Prop::Attr("class".into(), class.into()))
    };
    h(tag, props, children)
}
