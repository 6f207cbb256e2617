//! Primitive types - Props and handler callbacks.
//!
//! A node's property bag is a list of tagged [`Prop`]s. The four properties
//! the materializer treats specially (`value`, `checked`, `autofocus`, and
//! event handlers) each get their own variant; everything else is a generic
//! attribute.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::pipeline::Runtime;
use crate::types::{Event, EventKind};

// =============================================================================
// Handler Types
// =============================================================================

/// Event handler callback.
///
/// Receives the dispatched event and the runtime that owns the document, so
/// handlers can read live values and update the store. Errors propagate out
/// of [`Runtime::dispatch`].
pub type Handler = Rc<dyn Fn(&Event, &Runtime) -> Result<()>>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Event, &Runtime) -> Result<()> + 'static,
{
    Rc::new(f)
}

// =============================================================================
// Prop
// =============================================================================

/// One entry of a node's property bag.
#[derive(Clone)]
pub enum Prop {
    /// Live `value` property of an input-like element.
    Value(String),
    /// Live `checked` property of a toggle-like element.
    Checked(bool),
    /// Focus the element once it is attached. `false` is a no-op.
    Autofocus(bool),
    /// Event handler for one event kind.
    On(EventKind, Handler),
    /// Generic markup attribute.
    Attr(String, String),
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Prop::Checked(checked) => f.debug_tuple("Checked").field(checked).finish(),
            Prop::Autofocus(autofocus) => f.debug_tuple("Autofocus").field(autofocus).finish(),
            Prop::On(kind, _) => f.debug_tuple("On").field(kind).field(&"<handler>").finish(),
            Prop::Attr(name, value) => f.debug_tuple("Attr").field(name).field(value).finish(),
        }
    }
}

/// Untyped property value, for building props by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    Str(String),
    Bool(bool),
}

impl PropValue {
    /// Empty strings and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Str(s) => !s.is_empty(),
            PropValue::Bool(b) => *b,
        }
    }

    fn into_string(self) -> String {
        match self {
            PropValue::Str(s) => s,
            PropValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl Prop {
    /// Classify a named property.
    ///
    /// `value`, `checked` and `autofocus` get direct-property semantics;
    /// every other name becomes a generic attribute. Handlers are not
    /// expressible by name; use [`Props::on`].
    pub fn named(name: &str, value: impl Into<PropValue>) -> Prop {
        let value = value.into();
        match name {
            "value" => Prop::Value(value.into_string()),
            "checked" => Prop::Checked(value.is_truthy()),
            "autofocus" => Prop::Autofocus(value.is_truthy()),
            _ => Prop::Attr(name.to_string(), value.into_string()),
        }
    }
}

// =============================================================================
// Props Builder
// =============================================================================

/// Ordered property bag.
///
/// ```ignore
/// let props = Props::new()
///     .class("toggle")
///     .attr("type", "checkbox")
///     .checked(todo.done)
///     .on_click(move |_, rt| toggle(rt, &id));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Props(Vec<Prop>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any prop.
    pub fn with(mut self, prop: Prop) -> Self {
        self.0.push(prop);
        self
    }

    /// Append a prop classified by name (see [`Prop::named`]).
    pub fn set(self, name: &str, value: impl Into<PropValue>) -> Self {
        self.with(Prop::named(name, value))
    }

    /// Generic attribute.
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(Prop::Attr(name.into(), value.into()))
    }

    /// `class` attribute.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Live `value` property.
    pub fn value(self, value: impl Into<String>) -> Self {
        self.with(Prop::Value(value.into()))
    }

    /// Live `checked` property.
    pub fn checked(self, checked: bool) -> Self {
        self.with(Prop::Checked(checked))
    }

    /// Request focus on attach.
    pub fn autofocus(self, autofocus: bool) -> Self {
        self.with(Prop::Autofocus(autofocus))
    }

    /// Event handler for `kind`.
    pub fn on<F>(self, kind: EventKind, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.with(Prop::On(kind, handler(f)))
    }

    pub fn on_click<F>(self, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.on(EventKind::Click, f)
    }

    pub fn on_double_click<F>(self, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.on(EventKind::DoubleClick, f)
    }

    pub fn on_key_down<F>(self, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.on(EventKind::KeyDown, f)
    }

    pub fn on_input<F>(self, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.on(EventKind::Input, f)
    }

    pub fn on_change<F>(self, f: F) -> Self
    where
        F: Fn(&Event, &Runtime) -> Result<()> + 'static,
    {
        self.on(EventKind::Change, f)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prop> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Prop> for Props {
    fn from_iter<I: IntoIterator<Item = Prop>>(iter: I) -> Self {
        Props(iter.into_iter().collect())
    }
}
