use miniframe::{
    Dom, RenderLoop, Store,
    headless::{HeadlessDom, NodeId},
    init,
};
use miniframe_todomvc::{TodoMvc, install};

struct Harness {
    dom: HeadlessDom,
    app: TodoMvc<HeadlessDom>,
    render_loop: RenderLoop<HeadlessDom>,
}

impl Harness {
    fn new() -> Self {
        let (dom, _root) = HeadlessDom::with_mount_point("app");
        let store = Store::new();
        let app = install(&dom, &store);
        let render_loop = init(dom.clone(), &store, app.config("#app")).unwrap();
        Self {
            dom,
            app,
            render_loop,
        }
    }

    fn one(&self, selector: &str) -> NodeId {
        self.dom
            .query_selector(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("nothing matches {selector}"))
    }

    fn all(&self, selector: &str) -> Vec<NodeId> {
        self.dom.query_selector_all(selector).unwrap()
    }

    fn titles(&self) -> Vec<String> {
        self.all(".todo-list li label")
            .iter()
            .map(|label| self.dom.text_content(label))
            .collect()
    }

    fn add(&self, title: &str) {
        let input = self.one(".new-todo");
        self.dom.focus(&input);
        self.dom.type_text(&input, title);
        self.dom.press_key(&input, "Enter");
    }
}

#[test]
fn empty_list_hides_main_and_footer() {
    let h = Harness::new();
    assert!(h.all(".main").is_empty());
    assert!(h.all(".footer").is_empty());
    assert_eq!(h.dom.text_content(&h.one("h1")), "todos");
}

#[test]
fn enter_adds_a_todo_and_clears_the_input() {
    let h = Harness::new();
    h.add("Buy milk");
    h.add("   ");

    assert_eq!(h.titles(), ["Buy milk"]);
    assert_eq!(h.dom.text_content(&h.one(".todo-count")), "1 item left");
    let input = h.one(".new-todo");
    assert_eq!(h.dom.value(&input).as_deref(), Some(""));
    assert_eq!(h.dom.active_element(), Some(input));
}

#[test]
fn typing_survives_unrelated_rerenders() {
    let h = Harness::new();
    h.add("a");
    let input = h.one(".new-todo");
    h.dom.focus(&input);
    h.dom.type_text(&input, "half typed");

    h.app.todos().toggle(1);

    let input = h.one(".new-todo");
    assert_eq!(h.dom.value(&input).as_deref(), Some("half typed"));
    assert_eq!(h.dom.active_element(), Some(input));
}

#[test]
fn toggling_and_clearing_completed_items() {
    let h = Harness::new();
    h.add("a");
    h.add("b");

    h.dom.fire(&h.all(".toggle")[0], "change");
    assert_eq!(h.all("li.completed").len(), 1);
    assert_eq!(h.dom.text_content(&h.one(".todo-count")), "1 item left");
    assert!(h.dom.checked(&h.all(".toggle")[0]));

    h.dom.fire(&h.one(".clear-completed"), "click");
    assert_eq!(h.titles(), ["b"]);
    assert!(h.all(".clear-completed").is_empty());
}

#[test]
fn toggle_all_flips_every_item() {
    let h = Harness::new();
    h.add("a");
    h.add("b");

    h.dom.fire(&h.one(".toggle-all"), "change");
    assert_eq!(h.all("li.completed").len(), 2);
    assert!(h.dom.checked(&h.one(".toggle-all")));

    h.dom.fire(&h.one(".toggle-all"), "change");
    assert!(h.all("li.completed").is_empty());
}

#[test]
fn destroy_button_removes_its_item() {
    let h = Harness::new();
    h.add("a");
    h.add("b");
    h.add("c");

    h.dom.fire(&h.one(r#"button.destroy[data-id="2"]"#), "click");
    assert_eq!(h.titles(), ["a", "c"]);
}

#[test]
fn filters_follow_the_hash() {
    let h = Harness::new();
    h.add("a");
    h.add("b");
    h.app.todos().toggle(2);

    h.dom.set_hash("#/active");
    assert_eq!(h.titles(), ["a"]);
    assert_eq!(h.dom.text_content(&h.one(".filters a.selected")), "Active");

    h.dom.set_hash("#/completed");
    assert_eq!(h.titles(), ["b"]);

    h.dom.set_hash("#/nowhere");
    assert_eq!(h.titles(), ["a", "b"]);
    assert_eq!(h.dom.text_content(&h.one(".filters a.selected")), "All");
}

#[test]
fn editing_commits_on_enter_and_cancels_on_escape() {
    let h = Harness::new();
    h.add("draft");

    h.dom.fire(&h.one(".todo-list label"), "dblclick");
    let edit = h.one("li.editing .edit");
    assert_eq!(h.dom.active_element(), Some(edit));
    assert_eq!(h.dom.value(&edit).as_deref(), Some("draft"));

    h.dom.type_text(&edit, "final");
    h.dom.press_key(&edit, "Enter");
    assert_eq!(h.titles(), ["final"]);
    assert!(h.all(".edit").is_empty());

    h.dom.fire(&h.one(".todo-list label"), "dblclick");
    let edit = h.one(".edit");
    h.dom.type_text(&edit, "discarded");
    h.dom.press_key(&edit, "Escape");
    assert_eq!(h.titles(), ["final"]);
}

#[test]
fn every_action_is_one_pass() {
    let h = Harness::new();
    let start = h.render_loop.generation();
    h.add("a");
    h.dom.fire(&h.one(".toggle"), "change");
    h.dom.fire(&h.one(".destroy"), "click");
    assert_eq!(h.render_loop.generation(), start + 3);
}

#[test]
fn uninstall_detaches_item_buttons() {
    let h = Harness::new();
    h.add("a");
    let Harness { dom, app, .. } = h;
    let destroy = dom.query_selector(".destroy").unwrap().unwrap();

    app.uninstall();
    dom.fire(&destroy, "click");
    assert_eq!(dom.query_selector_all(".todo-list li").unwrap().len(), 1);
}
