//! State Module - Application state and its change signals
//!
//! - **Store** - Shallow-merge state container; every `set` notifies subscribers
//! - **Navigation** - URL fragment with hash-change listeners
//! - **Input** - Terminal key events converted to key names
//!
//! The runtime subscribes its re-render to both the store and the location.

pub mod input;
mod navigation;
mod store;

pub use navigation::*;
pub use store::*;
