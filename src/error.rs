//! Error types.
//!
//! `DomError` is what the document reports for malformed input (the
//! platform-level failures). `RuntimeError` is what every fallible runtime
//! operation returns: render passes, dispatch, store updates, config loading.

use std::io;

use thiserror::Error;

/// Failures raised by the in-memory document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),

    #[error("node is not part of this document")]
    StaleNode,

    #[error("text nodes cannot have children")]
    NotAnElement,

    #[error("cannot insert a node into its own subtree")]
    HierarchyRequest,
}

/// Errors surfaced by the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid runtime config: {0}")]
    Config(#[from] toml::de::Error),

    /// The document was borrowed when the runtime needed to change it.
    #[error("document is borrowed; release it before updating the runtime")]
    DocumentBusy,

    /// Failure reported by application code (a handler or root function).
    #[error("{0}")]
    Handler(String),
}

impl RuntimeError {
    /// Wrap an application-level failure.
    pub fn handler(message: impl Into<String>) -> Self {
        RuntimeError::Handler(message.into())
    }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
