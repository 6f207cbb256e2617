//! Render Pipeline
//!
//! Connects the node model to the document.
//!
//! ```text
//! trigger (set / hash change) → root fn → Node tree → materialize → mount target
//! ```
//!
//! - [`materialize`] - Node tree → document nodes, handlers → registry
//! - [`mount`] - Runtime context: binding, full rebuild, delegated dispatch

pub mod materialize;
pub mod mount;

pub use materialize::{Materialized, Materializer, materialize};
pub use mount::{RootFn, Runtime};
