//! `TodoMVC` markup.
//!
//! Every pass rebuilds the whole page from the store. Per-element handlers
//! cover inputs; item buttons and checkboxes are handled by delegated
//! listeners installed once in [`crate::install`], which find the item
//! through its `data-id` attribute.

use miniframe::{Child, Component, Dom, DomError, Props, RenderError, build};

use crate::model::{Filter, Todo, Todos};

/// Resolver for the page under `filter`.
pub fn page<D: Dom>(
    dom: &D,
    todos: &Todos,
    filter: Filter,
) -> impl Fn() -> Result<Component<D::Node>, RenderError> + 'static {
    let dom = dom.clone();
    let todos = todos.clone();
    move || Ok(Component::Node(app(&dom, &todos, filter)?))
}

fn app<D: Dom>(dom: &D, todos: &Todos, filter: Filter) -> Result<D::Node, DomError> {
    let items = todos.list();
    let mut sections = vec![Child::Node(header(dom, todos)?)];
    if !items.is_empty() {
        sections.push(Child::Node(main_section(dom, todos, &items, filter)?));
        sections.push(Child::Node(footer(dom, &items, filter)?));
    }
    build(dom, "section", Props::new().class("todoapp"), sections)
}

fn header<D: Dom>(dom: &D, todos: &Todos) -> Result<D::Node, DomError> {
    let title = build(dom, "h1", Props::new(), "todos")?;
    let adder = todos.clone();
    let reader = dom.clone();
    let input = build(
        dom,
        "input",
        Props::new()
            .class("new-todo")
            .with("placeholder", "What needs to be done?")
            .with("autofocus", true)
            .handler("onKeydown", move |event| {
                if event.key() == Some("Enter") {
                    let title = reader.value(event.target()).unwrap_or_default();
                    reader.set_value(event.target(), "");
                    adder.add(&title);
                }
            }),
        (),
    )?;
    build(
        dom,
        "header",
        Props::new().class("header"),
        vec![Child::Node(title), Child::Node(input)],
    )
}

fn main_section<D: Dom>(
    dom: &D,
    todos: &Todos,
    items: &[Todo],
    filter: Filter,
) -> Result<D::Node, DomError> {
    let all_completed = items.iter().all(|todo| todo.completed);
    let toggler = todos.clone();
    let toggle_all = build(
        dom,
        "input",
        Props::new()
            .with("id", "toggle-all")
            .class("toggle-all")
            .with("type", "checkbox")
            .with("checked", all_completed)
            .handler("onChange", move |_| toggler.toggle_all(!all_completed)),
        (),
    )?;
    let label = build(
        dom,
        "label",
        Props::new().with("for", "toggle-all"),
        "Mark all as complete",
    )?;

    let editing = todos.editing();
    let rows = items
        .iter()
        .filter(|todo| filter.shows(todo))
        .map(|todo| item(dom, todos, todo, editing == Some(todo.id)).map(Child::Node))
        .collect::<Result<Vec<_>, _>>()?;
    let list = build(dom, "ul", Props::new().class("todo-list"), rows)?;

    build(
        dom,
        "section",
        Props::new().class("main"),
        vec![Child::Node(toggle_all), Child::Node(label), Child::Node(list)],
    )
}

fn item<D: Dom>(dom: &D, todos: &Todos, todo: &Todo, editing: bool) -> Result<D::Node, DomError> {
    let id = todo.id.to_string();
    let toggle = build(
        dom,
        "input",
        Props::new()
            .class("toggle")
            .with("type", "checkbox")
            .with("data-id", &id)
            .with("checked", todo.completed),
        (),
    )?;
    let editor = todos.clone();
    let todo_id = todo.id;
    let label = build(
        dom,
        "label",
        Props::new().handler("onDblclick", move |_| editor.start_editing(todo_id)),
        &todo.title,
    )?;
    let destroy = build(
        dom,
        "button",
        Props::new().class("destroy").with("data-id", &id),
        (),
    )?;
    let view = build(
        dom,
        "div",
        Props::new().class("view"),
        vec![Child::Node(toggle), Child::Node(label), Child::Node(destroy)],
    )?;

    let edit = if editing {
        let editor = todos.clone();
        let reader = dom.clone();
        Some(build(
            dom,
            "input",
            Props::new()
                .class("edit")
                .with("value", &todo.title)
                .with("autofocus", true)
                .handler("onKeydown", move |event| match event.key() {
                    Some("Enter") => {
                        let title = reader.value(event.target()).unwrap_or_default();
                        editor.commit_edit(todo_id, &title);
                    }
                    Some("Escape") => editor.cancel_editing(),
                    _ => {}
                }),
            (),
        )?)
    } else {
        None
    };

    let class = match (todo.completed, editing) {
        (true, true) => "completed editing",
        (true, false) => "completed",
        (false, true) => "editing",
        (false, false) => "",
    };
    build(
        dom,
        "li",
        Props::new().class(class).with("data-id", &id),
        vec![Child::Node(view), edit.map_or(Child::Empty, Child::Node)],
    )
}

fn footer<D: Dom>(dom: &D, items: &[Todo], filter: Filter) -> Result<D::Node, DomError> {
    let remaining = items.iter().filter(|todo| !todo.completed).count();
    let strong = build(dom, "strong", Props::new(), remaining)?;
    let noun = if remaining == 1 { "item" } else { "items" };
    let count = build(
        dom,
        "span",
        Props::new().class("todo-count"),
        vec![Child::Node(strong), Child::Text(format!(" {noun} left"))],
    )?;

    let links = Filter::ALL
        .iter()
        .map(|&option| {
            let class = if option == filter { "selected" } else { "" };
            let link = build(
                dom,
                "a",
                Props::new()
                    .class(class)
                    .with("href", format!("#{}", option.path())),
                option.label(),
            )?;
            build(dom, "li", Props::new(), vec![Child::Node(link)]).map(Child::Node)
        })
        .collect::<Result<Vec<_>, DomError>>()?;
    let filters = build(dom, "ul", Props::new().class("filters"), links)?;

    let mut parts = vec![Child::Node(count), Child::Node(filters)];
    if items.iter().any(|todo| todo.completed) {
        parts.push(Child::Node(build(
            dom,
            "button",
            Props::new().class("clear-completed"),
            "Clear completed",
        )?));
    }
    build(dom, "footer", Props::new().class("footer"), parts)
}
