//! Todo list scenarios driven through a mounted runtime.
//!
//! The view mirrors a TodoMVC screen: header with the new-todo input, the
//! filtered list, and a footer with the counter, filter links and
//! "Clear completed".

use std::cell::Cell;
use std::rc::Rc;

use kindling::state::input::KeyInput;
use kindling::{Event, Node, NodeId, Props, Runtime, RuntimeConfig, TerminalHost, el, h, text};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Todo {
    id: String,
    text: String,
    done: bool,
}

fn todos(rt: &Runtime) -> Vec<Todo> {
    rt.store()
        .get_key("todos")
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

fn editing_id(rt: &Runtime) -> Option<String> {
    rt.store()
        .get_key("editingId")
        .and_then(|value| value.as_str().map(str::to_string))
}

fn set_todos(rt: &Runtime, todos: Vec<Todo>) -> kindling::Result<()> {
    rt.set(json!({ "todos": todos }))
}

fn todo_app(rt: &Runtime) -> Node {
    let all = todos(rt);
    let editing = editing_id(rt);
    let route = rt.route();

    let remaining = all.iter().filter(|todo| !todo.done).count();
    let any_done = all.iter().any(|todo| todo.done);

    let items: Vec<Node> = all
        .iter()
        .filter(|todo| match route.as_str() {
            "#/active" => !todo.done,
            "#/completed" => todo.done,
            _ => true,
        })
        .map(|todo| todo_item(todo, editing.as_deref() == Some(todo.id.as_str())))
        .collect();

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
                    .autofocus(true)
                    .on_key_down(add_todo),
                (),
            ),
        ],
    );

    let main = (!all.is_empty()).then(|| el("section", "main", el("ul", "todo-list", items)));

    let footer = (!all.is_empty()).then(|| {
        let filter = |href: &str, label: &str| {
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
                        filter("#/all", "All"),
                        filter("#/active", "Active"),
                        filter("#/completed", "Completed"),
                    ],
                ),
                any_done
                    .then(|| {
                        h(
                            "button",
                            Props::new().class("clear-completed").on_click(|_, rt| {
                                let left = todos(rt).into_iter().filter(|todo| !todo.done).collect();
                                set_todos(rt, left)
                            }),
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
    let class = format!(
        "{}{}",
        if todo.done { "completed " } else { "" },
        if editing { "editing" } else { "" }
    );

    let body = if editing {
        let id = todo.id.clone();
        h(
            "input",
            Props::new()
                .class("edit")
                .value(todo.text.as_str())
                .on_key_down(move |event, rt| finish_edit(event, rt, &id)),
            (),
        )
    } else {
        let (toggle_id, edit_id, remove_id) = (todo.id.clone(), todo.id.clone(), todo.id.clone());
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
                        .on_click(move |_, rt| {
                            let next = todos(rt)
                                .into_iter()
                                .map(|t| if t.id == toggle_id { Todo { done: !t.done, ..t } } else { t })
                                .collect();
                            set_todos(rt, next)
                        }),
                    (),
                ),
                h(
                    "label",
                    Props::new().on_double_click(move |_, rt| rt.set(json!({ "editingId": edit_id }))),
                    todo.text.as_str(),
                ),
                h(
                    "button",
                    Props::new().class("destroy").on_click(move |_, rt| {
                        let left = todos(rt).into_iter().filter(|t| t.id != remove_id).collect();
                        set_todos(rt, left)
                    }),
                    "×",
                ),
            ],
        )
    };

    h("li", Props::new().class(class), body)
}

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
        id: format!("t{id}"),
        text: entered.to_string(),
        done: false,
    });
    rt.set(json!({ "todos": next, "nextId": id + 1 }))
}

fn finish_edit(event: &Event, rt: &Runtime, id: &str) -> kindling::Result<()> {
    if !event.is_key("Enter") {
        return Ok(());
    }
    let edited = rt.value_of(event.target).unwrap_or_default();
    let edited = edited.trim().to_string();
    if edited.is_empty() {
        return Ok(());
    }
    let next: Vec<Todo> = todos(rt)
        .into_iter()
        .map(|t| if t.id == id { Todo { text: edited.clone(), ..t } } else { t })
        .collect();
    rt.set(json!({ "todos": next, "editingId": null }))
}

// =============================================================================
// Helpers
// =============================================================================

fn start() -> (Runtime, NodeId) {
    let rt = Runtime::new(RuntimeConfig::default());
    let target = rt.create_mount_point().unwrap();
    rt.set(json!({ "todos": [], "editingId": null, "nextId": 1 })).unwrap();
    rt.mount(todo_app, target).unwrap();
    (rt, target)
}

fn todo(id: &str, text: &str, done: bool) -> Todo {
    Todo {
        id: id.to_string(),
        text: text.to_string(),
        done,
    }
}

fn by_class(rt: &Runtime, target: NodeId, class: &str) -> Vec<NodeId> {
    rt.document().find_by_class(target, class)
}

fn labels(rt: &Runtime, target: NodeId) -> Vec<String> {
    let doc = rt.document();
    doc.find_by_tag(target, "label")
        .into_iter()
        .map(|id| doc.text_content(id))
        .collect()
}

fn enter_todo(rt: &Runtime, target: NodeId, entered: &str) {
    let input = by_class(rt, target, "new-todo")[0];
    rt.with_document_mut(|doc| doc.set_value(input, entered)).unwrap().unwrap();
    rt.key_down(input, "Enter").unwrap();
}

fn toggle_of(rt: &Runtime, target: NodeId, index: usize) -> NodeId {
    by_class(rt, target, "toggle")[index]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn single_todo_renders_one_unchecked_entry() {
    let (rt, target) = start();
    assert!(rt.document().find_by_tag(target, "li").is_empty());

    set_todos(&rt, vec![todo("1", "buy milk", false)]).unwrap();

    let doc = rt.document();
    let list = doc.find_by_class(target, "todo-list");
    assert_eq!(list.len(), 1);
    let entries = doc.find_by_tag(list[0], "li");
    assert_eq!(entries.len(), 1);
    assert_eq!(labels_in(&doc, entries[0]), vec!["buy milk"]);

    let toggles = doc.find_by_class(entries[0], "toggle");
    assert_eq!(toggles.len(), 1);
    assert!(!doc.checked(toggles[0]));
}

fn labels_in(doc: &kindling::Document, root: NodeId) -> Vec<String> {
    doc.find_by_tag(root, "label")
        .into_iter()
        .map(|id| doc.text_content(id))
        .collect()
}

#[test]
fn toggle_flips_only_its_own_entry() {
    let (rt, target) = start();
    set_todos(&rt, vec![todo("1", "buy milk", false), todo("2", "walk dog", false)]).unwrap();

    let toggle = toggle_of(&rt, target, 0);
    assert!(rt.click(toggle).unwrap());

    assert_eq!(
        todos(&rt),
        vec![todo("1", "buy milk", true), todo("2", "walk dog", false)]
    );
    assert!(rt.document().checked(toggle_of(&rt, target, 0)));
    assert!(!rt.document().checked(toggle_of(&rt, target, 1)));
    assert_eq!(by_class(&rt, target, "completed").len(), 1);
}

#[test]
fn ids_stay_unique_after_a_destroy() {
    let (rt, target) = start();
    enter_todo(&rt, target, "buy milk");
    enter_todo(&rt, target, "walk dog");

    let destroy = by_class(&rt, target, "destroy")[0];
    rt.click(destroy).unwrap();
    enter_todo(&rt, target, "call mom");

    let ids: Vec<String> = todos(&rt).into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["t2", "t3"]);

    rt.click(toggle_of(&rt, target, 1)).unwrap();
    assert_eq!(
        todos(&rt),
        vec![todo("t2", "walk dog", false), todo("t3", "call mom", true)]
    );
    assert_eq!(by_class(&rt, target, "completed").len(), 1);
}

#[test]
fn two_sets_merge_and_notify_twice() {
    let rt = Runtime::default();
    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    rt.store().subscribe(move || {
        counter.set(counter.get() + 1);
        Ok(())
    });

    rt.set(json!({ "a": 1 })).unwrap();
    rt.set(json!({ "b": 2 })).unwrap();

    assert_eq!(serde_json::Value::Object((*rt.state()).clone()), json!({ "a": 1, "b": 2 }));
    assert_eq!(notified.get(), 2);
    assert_eq!(rt.store().notification_count(), 2);
}

#[test]
fn enter_adds_todo_from_input_value() {
    let (rt, target) = start();
    let input = by_class(&rt, target, "new-todo")[0];
    rt.with_document_mut(|doc| doc.set_value(input, "  buy milk  ")).unwrap().unwrap();

    // Non-Enter keys do nothing
    rt.key_down(input, "a").unwrap();
    assert!(todos(&rt).is_empty());

    rt.key_down(input, "Enter").unwrap();
    assert_eq!(labels(&rt, target), vec!["buy milk"]);

    // The rebuilt input is empty and focused again
    let input = by_class(&rt, target, "new-todo")[0];
    assert_eq!(rt.value_of(input).unwrap_or_default(), "");
    assert_eq!(rt.document().focused(), Some(input));

    // Blank entries are ignored
    rt.with_document_mut(|doc| doc.set_value(input, "   ")).unwrap().unwrap();
    rt.key_down(input, "Enter").unwrap();
    assert_eq!(todos(&rt).len(), 1);
}

#[test]
fn filter_links_follow_the_hash() {
    let (rt, target) = start();
    set_todos(&rt, vec![todo("1", "buy milk", true), todo("2", "walk dog", false)]).unwrap();
    assert_eq!(labels(&rt, target), vec!["buy milk", "walk dog"]);

    let active_link = rt.document().find_by_tag(target, "a")[1];
    assert!(rt.click(active_link).unwrap());
    assert_eq!(rt.location().hash(), "#/active");
    assert_eq!(labels(&rt, target), vec!["walk dog"]);

    let selected = by_class(&rt, target, "selected");
    assert_eq!(selected.len(), 1);
    assert_eq!(rt.document().text_content(selected[0]), "Active");

    rt.location().set_hash("#/completed").unwrap();
    assert_eq!(labels(&rt, target), vec!["buy milk"]);
}

#[test]
fn double_click_edits_and_enter_commits() {
    let (rt, target) = start();
    set_todos(&rt, vec![todo("1", "buy milk", false)]).unwrap();

    let label = rt.document().find_by_tag(target, "label")[0];
    assert!(rt.dispatch(Event::double_click(label)).unwrap());
    assert_eq!(editing_id(&rt).as_deref(), Some("1"));

    let edit = by_class(&rt, target, "edit")[0];
    assert_eq!(rt.value_of(edit).as_deref(), Some("buy milk"));
    assert_eq!(by_class(&rt, target, "editing").len(), 1);

    rt.with_document_mut(|doc| doc.set_value(edit, "buy oat milk")).unwrap().unwrap();
    rt.key_down(edit, "Enter").unwrap();

    assert_eq!(editing_id(&rt), None);
    assert_eq!(labels(&rt, target), vec!["buy oat milk"]);
}

#[test]
fn clear_completed_and_counter() {
    let (rt, target) = start();
    set_todos(
        &rt,
        vec![
            todo("1", "buy milk", true),
            todo("2", "walk dog", false),
            todo("3", "call mom", true),
        ],
    )
    .unwrap();

    let count = by_class(&rt, target, "todo-count")[0];
    assert_eq!(rt.document().text_content(count), "1 item left");

    let clear = by_class(&rt, target, "clear-completed")[0];
    rt.click(clear).unwrap();

    assert_eq!(labels(&rt, target), vec!["walk dog"]);
    assert!(by_class(&rt, target, "clear-completed").is_empty());
}

#[test]
fn destroy_removes_entry_and_empty_list_hides_footer() {
    let (rt, target) = start();
    set_todos(&rt, vec![todo("1", "buy milk", false)]).unwrap();

    let destroy = by_class(&rt, target, "destroy")[0];
    rt.click(destroy).unwrap();

    assert!(todos(&rt).is_empty());
    assert!(by_class(&rt, target, "footer").is_empty());
    assert!(by_class(&rt, target, "main").is_empty());
}

#[test]
fn handlers_do_not_accumulate_across_renders() {
    let (rt, _) = start();
    set_todos(&rt, vec![todo("1", "buy milk", false)]).unwrap();
    let per_render = rt.handler_count();
    for _ in 0..5 {
        rt.rerender().unwrap();
    }
    assert_eq!(rt.handler_count(), per_render);
}

#[test]
fn terminal_host_types_and_submits() {
    let (rt, target) = start();
    let host = TerminalHost::new(rt.clone());

    for key in ["b", "u", "y", " ", "m", "i", "l", "k"] {
        host.handle_key(&KeyInput::new(key)).unwrap();
    }
    host.handle_key(&KeyInput::new("Enter")).unwrap();
    assert_eq!(labels(&rt, target), vec!["buy milk"]);

    // Tab to the toggle and press space
    host.handle_key(&KeyInput::new("Tab")).unwrap();
    host.handle_key(&KeyInput::new(" ")).unwrap();
    assert!(todos(&rt)[0].done);
}
