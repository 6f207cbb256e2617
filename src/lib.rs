//! # kindling
//!
//! A minimal UI runtime that rebuilds the whole screen on every change.
//!
//! ## Architecture
//!
//! Applications describe the screen as a plain node tree produced by one
//! root function. Any change (a store `set`, a hash change) throws away
//! everything under the mount target and builds it again:
//!
//! ```text
//! Store::set / Location::set_hash → root fn → Node tree → materialize → Document
//!                                                              ↑
//!                            Runtime::dispatch ← host events ←─┘
//! ```
//!
//! Handlers are never attached to individual elements. The materializer
//! registers them under opaque ids recorded as `data-on<kind>` attributes, and
//! one root listener resolves the nearest id at or above an event's target.
//!
//! ## Modules
//!
//! - [`types`] - Event kinds, listen set, events
//! - [`primitives`] - Node model (`h`, `text`, `Props`)
//! - [`engine`] - In-memory document and handler registry
//! - [`pipeline`] - Materializer and the [`Runtime`] context
//! - [`state`] - Store, location, terminal key input
//! - [`renderer`] - Text projection and the crossterm host
//! - [`config`] - TOML-loadable runtime settings
//!
//! ## Example
//!
//! ```ignore
//! use kindling::{Props, Runtime, RuntimeConfig, el, h};
//! use serde_json::json;
//!
//! let rt = Runtime::new(RuntimeConfig::default());
//! let target = rt.create_mount_point()?;
//! rt.mount(|rt| {
//!     let n = rt.store().get_key("n").and_then(|v| v.as_i64()).unwrap_or(0);
//!     h("button", Props::new().on_click(move |_, rt| rt.set(json!({ "n": n + 1 }))), n.to_string())
//! }, target)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

pub use config::RuntimeConfig;
pub use engine::{Document, EventRegistry, HandlerId};
pub use error::{DomError, Result, RuntimeError};
pub use pipeline::Runtime;
pub use primitives::{
    Children, Element, Handler, Node, Prop, PropValue, Props, el, h, handler, text,
};
pub use renderer::{HostFlow, TerminalHost};
pub use state::{Location, Merge, State, Store};
pub use types::{Event, EventKind, Listen, NodeId};
