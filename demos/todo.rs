//! Todo Example - TodoMVC in the terminal
//!
//! Demonstrates:
//! - One root function rebuilding the whole screen from store state
//! - Delegated click, double-click and keydown handlers
//! - Hash routing for the All / Active / Completed filters
//!
//! Keys: Tab moves focus, type + Enter adds a todo, Space toggles,
//! F2 edits the focused todo, Enter on a filter link switches the route.
//!
//! Run with: cargo run --example todo

use kindling::{Event, Node, Props, Runtime, RuntimeConfig, TerminalHost, el, h, text};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Todo {
    id: u64,
    text: String,
    done: bool,
}

// =============================================================================
// State access
// =============================================================================

fn todos(rt: &Runtime) -> Vec<Todo> {
    rt.store()
        .get_key("todos")
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

fn editing_id(rt: &Runtime) -> Option<u64> {
    rt.store().get_key("editingId").and_then(|value| value.as_u64())
}

fn update_todos(rt: &Runtime, f: impl FnOnce(Vec<Todo>) -> Vec<Todo>) -> kindling::Result<()> {
    rt.set(json!({ "todos": f(todos(rt)) }))
}

// =============================================================================
// Actions
// =============================================================================

fn add_todo(event: &Event, rt: &Runtime) -> kindling::Result<()> {
    if !event.is_key("Enter") {
        return Ok(());
    }
    let entered = rt.value_of(event.target).unwrap_or_default();
    let entered = entered.trim();
    if entered.is_empty() {
        return Ok(());
    }

    let id = rt.store().get_key("nextId").and_then(|v| v.as_u64()).unwrap_or(1);
    let mut next = todos(rt);
    next.push(Todo {
        id,
        text: entered.to_string(),
        done: false,
    });
    rt.set(json!({ "todos": next, "nextId": id + 1 }))
}

fn toggle_todo(rt: &Runtime, id: u64) -> kindling::Result<()> {
    update_todos(rt, |all| {
        all.into_iter()
            .map(|t| if t.id == id { Todo { done: !t.done, ..t } } else { t })
            .collect()
    })
}

fn remove_todo(rt: &Runtime, id: u64) -> kindling::Result<()> {
    update_todos(rt, |all| all.into_iter().filter(|t| t.id != id).collect())
}

fn clear_completed(rt: &Runtime) -> kindling::Result<()> {
    update_todos(rt, |all| all.into_iter().filter(|t| !t.done).collect())
}

fn finish_edit(event: &Event, rt: &Runtime, id: u64) -> kindling::Result<()> {
    if event.is_key("Escape") {
        return rt.set(json!({ "editingId": null }));
    }
    if !event.is_key("Enter") {
        return Ok(());
    }
    let edited = rt.value_of(event.target).unwrap_or_default();
    let edited = edited.trim();
    if edited.is_empty() {
        return Ok(());
    }
    let next: Vec<Todo> = todos(rt)
        .into_iter()
        .map(|t| if t.id == id { Todo { text: edited.to_string(), ..t } } else { t })
        .collect();
    rt.set(json!({ "todos": next, "editingId": null }))
}

// =============================================================================
// View
// =============================================================================

fn todo_app(rt: &Runtime) -> Node {
    let all = todos(rt);
    let editing = editing_id(rt);
    let route = rt.route();

    let filtered = all.iter().filter(|t| match route.as_str() {
        "#/active" => !t.done,
        "#/completed" => t.done,
        _ => true,
    });
    let remaining = all.iter().filter(|t| !t.done).count();
    let any_done = all.iter().any(|t| t.done);

    let header = el(
        "header",
        "header",
        vec![
            el("h1", "", "TO DOs !"),
            h(
                "input",
                Props::new()
                    .class("new-todo")
                    .attr("placeholder", "What needs to be done?")
                    .autofocus(editing.is_none())
                    .on_key_down(add_todo),
                (),
            ),
        ],
    );

    let main = (!all.is_empty()).then(|| {
        el(
            "section",
            "main",
            el(
                "ul",
                "todo-list",
                filtered
                    .map(|t| todo_item(t, editing == Some(t.id)))
                    .collect::<Vec<_>>(),
            ),
        )
    });

    let footer = (!all.is_empty()).then(|| {
        let link = |href: &str, label: &str| {
            let class = if route == href { "selected" } else { "" };
            el("li", "", h("a", Props::new().attr("href", href).class(class), label))
        };
        el(
            "footer",
            "footer",
            vec![
                el(
                    "span",
                    "todo-count",
                    vec![
                        el("strong", "", remaining.to_string()),
                        text(format!(" item{} left", if remaining == 1 { "" } else { "s" })),
                    ],
                ),
                el(
                    "ul",
                    "filters",
                    vec![
                        link("#/all", "All"),
                        link("#/active", "Active"),
                        link("#/completed", "Completed"),
                    ],
                ),
                any_done
                    .then(|| {
                        h(
                            "button",
                            Props::new()
                                .class("clear-completed")
                                .on_click(|_, rt| clear_completed(rt)),
                            "Clear completed",
                        )
                    })
                    .into(),
            ],
        )
    });

    el("section", "todoapp", vec![header, main.into(), footer.into()])
}

fn todo_item(todo: &Todo, editing: bool) -> Node {
    let id = todo.id;
    let mut class = String::new();
    if todo.done {
        class.push_str("completed ");
    }
    if editing {
        class.push_str("editing");
    }

    let body = if editing {
        h(
            "input",
            Props::new()
                .class("edit")
                .value(todo.text.as_str())
                .autofocus(true)
                .on_key_down(move |event, rt| finish_edit(event, rt, id)),
            (),
        )
    } else {
        el(
            "div",
            "view",
            vec![
                h(
                    "input",
                    Props::new()
                        .class("toggle")
                        .attr("type", "checkbox")
                        .checked(todo.done)
                        .on_click(move |_, rt| toggle_todo(rt, id)),
                    (),
                ),
                h(
                    "label",
                    Props::new().on_double_click(move |_, rt| rt.set(json!({ "editingId": id }))),
                    todo.text.as_str(),
                ),
                h(
                    "button",
                    Props::new().class("destroy").on_click(move |_, rt| remove_todo(rt, id)),
                    "×",
                ),
            ],
        )
    };

    h("li", Props::new().class(class), body)
}

// =============================================================================
// Start
// =============================================================================

fn main() -> kindling::Result<()> {
    let rt = Runtime::new(RuntimeConfig::default());
    rt.set(json!({ "todos": [], "editingId": null, "nextId": 1 }))?;

    let target = rt.create_mount_point()?;
    rt.mount(todo_app, target)?;

    TerminalHost::new(rt).run()
}
