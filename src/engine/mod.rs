//! Engine - The document and the handler registry.
//!
//! - [`Document`]: arena-backed element tree (elements, text, focus)
//! - [`EventRegistry`]: opaque handler ids resolved by walking ancestors
//!
//! Neither knows about nodes or state; the pipeline ties them together.

mod document;
mod registry;

pub use document::*;
pub use registry::*;
