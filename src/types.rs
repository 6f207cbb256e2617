//! Core types for kindling.
//!
//! Event kinds, the listen set, and the event value handed to handlers.
//! These flow from the host (terminal, tests) through the runtime's
//! delegated dispatch into application callbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a node in a [`Document`](crate::engine::Document).
pub type NodeId = indextree::NodeId;

// =============================================================================
// Event Kind
// =============================================================================

/// Kind of interaction event.
///
/// Each kind maps to one handler attribute (`data-onclick`, `data-onkeydown`, ...)
/// so an element can carry one handler per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    DoubleClick,
    KeyDown,
    Input,
    Change,
}

impl EventKind {
    /// All event kinds, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Click,
        EventKind::DoubleClick,
        EventKind::KeyDown,
        EventKind::Input,
        EventKind::Change,
    ];

    /// DOM-style event name ("click", "dblclick", "keydown", ...).
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DoubleClick => "dblclick",
            EventKind::KeyDown => "keydown",
            EventKind::Input => "input",
            EventKind::Change => "change",
        }
    }

    /// Attribute the materializer records the handler id under.
    pub fn handler_attribute(self) -> String {
        format!("data-on{}", self.name())
    }

    /// Flag for this kind inside a [`Listen`] set.
    pub const fn flag(self) -> Listen {
        match self {
            EventKind::Click => Listen::CLICK,
            EventKind::DoubleClick => Listen::DOUBLE_CLICK,
            EventKind::KeyDown => Listen::KEY_DOWN,
            EventKind::Input => Listen::INPUT,
            EventKind::Change => Listen::CHANGE,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind: {0:?}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

// =============================================================================
// Listen Set (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Set of event kinds the root listener accepts.
    ///
    /// Events whose kind is not in the set are ignored by
    /// [`Runtime::dispatch`](crate::Runtime::dispatch), like a DOM event
    /// nobody listens for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Listen: u8 {
        const CLICK = 1 << 0;
        const DOUBLE_CLICK = 1 << 1;
        const KEY_DOWN = 1 << 2;
        const INPUT = 1 << 3;
        const CHANGE = 1 << 4;
    }
}

impl Default for Listen {
    fn default() -> Self {
        Listen::all()
    }
}

impl Listen {
    /// Whether events of `kind` are accepted.
    pub fn accepts(self, kind: EventKind) -> bool {
        self.contains(kind.flag())
    }
}

// =============================================================================
// Event
// =============================================================================

/// An interaction event on a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Node the interaction originated on.
    pub target: NodeId,
    /// Element whose handler is running. Set by dispatch.
    pub current_target: Option<NodeId>,
    /// Key name for key events ("Enter", "a", "Escape").
    pub key: Option<String>,
}

impl Event {
    /// Create an event without a key.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            key: None,
        }
    }

    /// Click on `target`.
    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target)
    }

    /// Double click on `target`.
    pub fn double_click(target: NodeId) -> Self {
        Self::new(EventKind::DoubleClick, target)
    }

    /// Key press on `target`.
    pub fn key_down(target: NodeId, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    /// Whether this is a key event for `key`.
    pub fn is_key(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}
