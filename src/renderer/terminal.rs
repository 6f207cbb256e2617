//! Terminal host - Paints the document and feeds key presses back in.
//!
//! The host plays the part a browser plays for a web page: it owns focus
//! traversal and the default actions of controls, and turns terminal keys
//! into runtime events.
//!
//! | Key              | Focused element      | Effect                                   |
//! |------------------|----------------------|------------------------------------------|
//! | Tab / Shift-Tab  | any                  | move focus                               |
//! | printable, Bksp  | text entry           | keydown, edit live value, input          |
//! | Enter, Escape    | text entry           | keydown                                  |
//! | Space            | checkbox             | toggle live checked, click, change       |
//! | Enter / Space    | button, link, other  | click                                    |
//! | F2               | any                  | dblclick                                 |
//! | Ctrl-C           |                      | exit                                     |
//!
//! After an event that rebuilt the screen, focus returns to the element at
//! the same position in tab order, unless the new screen autofocuses an
//! element at a different position than the old one did.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::error::Result;
use crate::pipeline::Runtime;
use crate::state::input::{KeyInput, read_key};
use crate::types::{Event, EventKind, NodeId};
use super::text::{is_text_entry, is_toggle, render_lines};

/// What the event loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFlow {
    Continue,
    Exit,
}

const FOCUSABLE_TAGS: &[&str] = &["input", "button", "a", "textarea", "select"];

const HELP: &str = "Tab: next  Space/Enter: activate  F2: edit  Ctrl-C: quit";

/// Terminal host for one runtime.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    runtime: Runtime,
}

impl TerminalHost {
    pub fn new(runtime: Runtime) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Focusable elements under `body`, in document order.
    ///
    /// Form controls and links, plus any element carrying a handler.
    pub fn focusables(&self) -> Vec<NodeId> {
        self.runtime.with_document(|doc| {
            doc.descendants(doc.body())
                .into_iter()
                .filter(|id| {
                    let Some(element) = doc.element(*id) else {
                        return false;
                    };
                    if element.attribute("hidden").is_some() {
                        return false;
                    }
                    FOCUSABLE_TAGS.contains(&element.tag.as_str())
                        || element
                            .attributes
                            .iter()
                            .any(|(name, _)| name.starts_with("data-on"))
                })
                .collect()
        })
    }

    /// Move focus forward (or backward), wrapping around.
    pub fn cycle_focus(&self, backwards: bool) -> Result<Option<NodeId>> {
        let focusables = self.focusables();
        if focusables.is_empty() {
            return Ok(None);
        }
        let current = self
            .runtime
            .with_document(|doc| doc.focused())
            .and_then(|id| focusables.iter().position(|f| *f == id));
        let len = focusables.len();
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
        };
        let id = focusables[next];
        self.runtime.with_document_mut(|doc| doc.focus(id))?;
        Ok(Some(id))
    }

    /// Position of the last render's autofocus element in tab order.
    fn autofocus_position(&self, focusables: &[NodeId]) -> Option<usize> {
        let id = self.runtime.autofocused()?;
        focusables.iter().position(|f| *f == id)
    }

    /// Put focus back where the key was pressed after a rebuild.
    ///
    /// Every render re-applies autofocus, which would drag focus to the same
    /// element after each key. Autofocus only keeps focus when it moved to a
    /// new position (an edit field that just appeared).
    fn restore_focus(
        &self,
        target: NodeId,
        position: Option<usize>,
        autofocus_before: Option<usize>,
    ) -> Result<()> {
        if self.runtime.with_document(|doc| doc.contains(target)) {
            return Ok(());
        }
        let focusables = self.focusables();
        let autofocus_after = self.autofocus_position(&focusables);
        if autofocus_after.is_some() && autofocus_after != autofocus_before {
            return Ok(());
        }
        if let (Some(position), Some(last)) = (position, focusables.len().checked_sub(1)) {
            let id = focusables[position.min(last)];
            self.runtime.with_document_mut(|doc| doc.focus(id))?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Key handling
    // -------------------------------------------------------------------------

    /// Apply one key press.
    pub fn handle_key(&self, input: &KeyInput) -> Result<HostFlow> {
        if !input.is_press() {
            return Ok(HostFlow::Continue);
        }
        if input.modifiers.ctrl && input.key == "c" {
            return Ok(HostFlow::Exit);
        }
        if input.key == "Tab" {
            self.cycle_focus(input.modifiers.shift)?;
            return Ok(HostFlow::Continue);
        }

        let Some(target) = self.runtime.with_document(|doc| doc.focused()) else {
            return Ok(HostFlow::Continue);
        };
        let focusables = self.focusables();
        let position = focusables.iter().position(|id| *id == target);
        let autofocus_before = self.autofocus_position(&focusables);

        self.activate(target, input)?;
        self.restore_focus(target, position, autofocus_before)?;
        Ok(HostFlow::Continue)
    }

    fn activate(&self, target: NodeId, input: &KeyInput) -> Result<()> {
        let rt = &self.runtime;
        let (text_entry, toggle) =
            rt.with_document(|doc| (is_text_entry(doc, target), is_toggle(doc, target)));

        if input.key == "F2" {
            rt.dispatch(Event::double_click(target))?;
            return Ok(());
        }

        if text_entry {
            rt.dispatch(Event::key_down(target, input.key.as_str()))?;
            self.edit_value(target, input)?;
            return Ok(());
        }

        match input.key.as_str() {
            " " if toggle => {
                let live = rt.with_document_mut(|doc| {
                    let next = !doc.checked(target);
                    doc.set_checked(target, next).is_ok()
                })?;
                if live {
                    rt.dispatch(Event::click(target))?;
                    rt.dispatch(Event::new(EventKind::Change, target))?;
                }
            }
            " " | "Enter" => {
                rt.dispatch(Event::click(target))?;
            }
            _ => {
                rt.dispatch(Event::key_down(target, input.key.as_str()))?;
            }
        }
        Ok(())
    }

    /// Edit a text entry after its keydown ran, if it survived the keydown.
    fn edit_value(&self, target: NodeId, input: &KeyInput) -> Result<()> {
        let edited = self.runtime.with_document_mut(|doc| {
            if !doc.contains(target) {
                return false;
            }
            let mut value = doc.value(target).unwrap_or_default().to_string();
            if let Some(c) = input.printable() {
                value.push(c);
            } else if input.key == "Backspace" {
                if value.pop().is_none() {
                    return false;
                }
            } else {
                return false;
            }
            doc.set_value(target, value).is_ok()
        })?;
        if edited {
            self.runtime.dispatch(Event::new(EventKind::Input, target))?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Painting & event loop
    // -------------------------------------------------------------------------

    /// Paint the whole document.
    pub fn paint<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let lines = self.runtime.with_document(|doc| render_lines(doc, doc.body()));
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

        let mut row: u16 = 0;
        for line in &lines {
            queue!(out, MoveTo(column(line.indent), row))?;
            if line.focused {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(out, Print(&line.text), SetAttribute(Attribute::Reset))?;
            row = row.saturating_add(1);
        }
        queue!(
            out,
            MoveTo(0, row.saturating_add(1)),
            SetAttribute(Attribute::Dim),
            Print(HELP),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }

    /// Run the interactive loop until Ctrl-C or an error.
    pub fn run(&self) -> Result<()> {
        let mut stdout = io::stdout();
        let _guard = TerminalGuard::enter(&mut stdout)?;

        if self.runtime.with_document(|doc| doc.focused()).is_none() {
            self.cycle_focus(false)?;
        }

        loop {
            self.paint(&mut stdout)?;
            let Some(input) = read_key()? else {
                continue;
            };
            if self.handle_key(&input)? == HostFlow::Exit {
                tracing::debug!("terminal host exiting");
                return Ok(());
            }
        }
    }
}

/// Terminal column for an indent, clamped to the last addressable one.
fn column(indent: usize) -> u16 {
    u16::try_from(indent).unwrap_or(u16::MAX)
}

/// Raw mode + alternate screen for the guard's lifetime.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// =============================================================================
// TESTS
// =============================================================================
