//! Primitives - The node model applications build screens from.
//!
//! - [`h`] - Element constructor (tag, props, children)
//! - [`text`] - Text node
//! - [`Props`] - Ordered, typed property bag
//!
//! # Props
//!
//! Four property kinds are special at materialization time:
//! - `value` / `checked` - assigned as live element properties
//! - `autofocus` - focuses the element once attached (false is a no-op)
//! - handlers - registered in the event registry, id recorded on the element
//!
//! Everything else is a plain attribute.
//!
//! ```ignore
//! h("input", Props::new()
//!     .class("new-todo")
//!     .attr("placeholder", "What needs to be done?")
//!     .autofocus(true)
//!     .on_key_down(add_todo), ())
//! ```

mod node;
mod types;

pub use node::*;
pub use types::*;
