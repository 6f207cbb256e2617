//! Text projection - Document subtree to plain lines.
//!
//! Block elements (`div`, `section`, `li`, headings, ...) start and end a
//! line; everything else flows inline. Lists indent their items. Controls
//! get a compact textual form:
//!
//! ```text
//! [x] buy milk (×)        checkbox, label, button
//! [What needs to be done?] text input showing its placeholder
//! ```
//!
//! Elements with a `hidden` attribute are skipped. The line holding the
//! focused element is flagged so painters can highlight it.

use crate::engine::Document;
use crate::types::NodeId;

/// One projected line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub indent: usize,
    pub text: String,
    /// Contains the focused element.
    pub focused: bool,
}

const BLOCK_TAGS: &[&str] = &[
    "body", "div", "section", "header", "footer", "main", "nav", "article", "aside", "form",
    "ul", "ol", "li", "p", "h1", "h2", "h3", "h4", "h5", "h6",
];

const LIST_INDENT: usize = 2;

pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Whether an input renders as a toggle.
pub fn is_toggle(document: &Document, id: NodeId) -> bool {
    document.tag(id) == Some("input")
        && matches!(document.attribute(id, "type"), Some("checkbox" | "radio"))
}

/// Whether an element accepts typed text.
pub fn is_text_entry(document: &Document, id: NodeId) -> bool {
    match document.tag(id) {
        Some("textarea") => true,
        Some("input") => !matches!(
            document.attribute(id, "type"),
            Some("checkbox" | "radio" | "button" | "submit" | "hidden")
        ),
        _ => false,
    }
}

struct Projector<'a> {
    document: &'a Document,
    focused: Option<NodeId>,
    lines: Vec<Line>,
    current: String,
    current_focused: bool,
    indent: usize,
}

impl Projector<'_> {
    fn flush(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.lines.push(Line {
                indent: self.indent,
                text: text.to_string(),
                focused: self.current_focused,
            });
        }
        self.current.clear();
        self.current_focused = false;
    }

    fn mark_focus(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.current_focused = true;
        }
    }

    fn walk(&mut self, id: NodeId) {
        if let Some(text) = self.document.text(id) {
            self.current.push_str(text);
            return;
        }
        let Some(tag) = self.document.tag(id) else {
            return;
        };
        if self.document.attribute(id, "hidden").is_some() {
            return;
        }

        if tag == "input" || tag == "textarea" {
            self.mark_focus(id);
            self.control(id);
            return;
        }

        if is_block(tag) {
            self.flush();
            let saved = self.indent;
            if tag == "ul" || tag == "ol" {
                self.indent += LIST_INDENT;
            }
            self.mark_focus(id);
            self.children(id);
            self.flush();
            self.indent = saved;
            return;
        }

        self.mark_focus(id);
        if tag == "button" {
            self.current.push_str(" (");
            self.children(id);
            self.current.push_str(") ");
        } else {
            self.children(id);
        }
    }

    fn children(&mut self, id: NodeId) {
        for child in self.document.children(id) {
            self.walk(child);
        }
    }

    fn control(&mut self, id: NodeId) {
        if is_toggle(self.document, id) {
            let mark = if self.document.checked(id) { "[x] " } else { "[ ] " };
            self.current.push_str(mark);
            return;
        }
        let value = self.document.value(id).unwrap_or_default();
        let shown = if value.is_empty() {
            self.document.attribute(id, "placeholder").unwrap_or_default()
        } else {
            value
        };
        self.current.push('[');
        self.current.push_str(shown);
        self.current.push_str("] ");
    }
}

/// Project `root` and its descendants into lines.
pub fn render_lines(document: &Document, root: NodeId) -> Vec<Line> {
    let mut projector = Projector {
        document,
        focused: document.focused(),
        lines: Vec::new(),
        current: String::new(),
        current_focused: false,
        indent: 0,
    };
    projector.walk(root);
    projector.flush();
    projector.lines
}

/// Project `root` into a newline-joined string with indentation.
pub fn render_to_string(document: &Document, root: NodeId) -> String {
    render_lines(document, root)
        .iter()
        .map(|line| format!("{}{}", " ".repeat(line.indent), line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventRegistry;
    use crate::pipeline::materialize;
    use crate::primitives::{Node, Props, el, h};

    fn project(node: &Node) -> (Document, NodeId) {
        let mut document = Document::new();
        let mut registry = EventRegistry::new();
        let root = materialize(&mut document, &mut registry, node).unwrap().root;
        let body = document.body();
        document.append_child(body, root).unwrap();
        (document, root)
    }

    #[test]
    fn test_blocks_and_inline() {
        let node = el(
            "section",
            "todoapp",
            vec![
                el("h1", "", "TO DOs !"),
                el(
                    "ul",
                    "todo-list",
                    el(
                        "li",
                        "",
                        vec![
                            h("input", Props::new().attr("type", "checkbox").checked(true), ()),
                            el("label", "", "buy milk"),
                            el("button", "destroy", "×"),
                        ],
                    ),
                ),
            ],
        );
        let (doc, root) = project(&node);
        assert_eq!(render_to_string(&doc, root), "TO DOs !\n  [x] buy milk (×)");
    }

    #[test]
    fn test_text_input_shows_value_or_placeholder() {
        let node = el(
            "div",
            "",
            vec![
                h("input", Props::new().attr("placeholder", "What needs to be done?"), ()),
                el("br", "", ()),
                h("input", Props::new().value("typed"), ()),
            ],
        );
        let (doc, root) = project(&node);
        assert_eq!(render_to_string(&doc, root), "[What needs to be done?] [typed]");
    }

    #[test]
    fn test_hidden_is_skipped_and_focus_flagged() {
        let node = el(
            "div",
            "",
            vec![
                h("p", Props::new().attr("hidden", ""), "secret"),
                el("p", "", h("a", Props::new().attr("href", "#/all"), "All")),
            ],
        );
        let (mut doc, root) = project(&node);
        let anchor = doc.find_by_tag(root, "a")[0];
        doc.focus(anchor);

        let lines = render_lines(&doc, root);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "All");
        assert!(lines[0].focused);
    }

    #[test]
    fn test_control_kinds() {
        let (doc, root) = project(&el(
            "div",
            "",
            vec![
                h("input", Props::new().attr("type", "checkbox"), ()),
                h("input", Props::new().attr("type", "text"), ()),
            ],
        ));
        let inputs = doc.find_by_tag(root, "input");
        assert!(is_toggle(&doc, inputs[0]));
        assert!(!is_text_entry(&doc, inputs[0]));
        assert!(is_text_entry(&doc, inputs[1]));
    }
}
