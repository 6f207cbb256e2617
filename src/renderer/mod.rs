//! Renderer - Showing a document outside a browser.
//!
//! - [`text`] - Projects a subtree to indented plain lines
//! - [`terminal`] - crossterm host: paints lines, maps keys to events

pub mod terminal;
pub mod text;

pub use terminal::{HostFlow, TerminalHost};
pub use text::{Line, render_lines, render_to_string};
