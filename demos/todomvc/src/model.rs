//! Todo items kept in the shared [`Store`].
//!
//! The store holds three keys: `todos` (array of items), `next_id` and
//! `editing` (id of the item being edited, or `null`). Every action writes
//! all the keys it touches in one `set_state`, so it costs a single pass.

use miniframe::{Partial, Store};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// One todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique within one store, never reused.
    pub id: u64,
    /// Trimmed, never empty.
    pub title: String,
    /// Whether the item is done.
    pub completed: bool,
}

impl Todo {
    fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "completed": self.completed,
        })
    }
}

/// Which items the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every item.
    #[default]
    All,
    /// Items still to do.
    Active,
    /// Finished items.
    Completed,
}

impl Filter {
    /// All filters in footer order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Route path of the filter.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::All => "/",
            Self::Active => "/active",
            Self::Completed => "/completed",
        }
    }

    /// Label in the footer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether `todo` is visible under this filter.
    #[must_use]
    pub const fn shows(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

/// Typed actions over the store.
#[derive(Debug, Clone)]
pub struct Todos {
    store: Store,
}

impl Todos {
    /// Wraps `store`. Existing keys are kept.
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Current items, oldest first. Entries that fail to parse are skipped.
    #[must_use]
    pub fn list(&self) -> Vec<Todo> {
        match self.store.get("todos") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Id of the item in edit mode.
    #[must_use]
    pub fn editing(&self) -> Option<u64> {
        self.store.get("editing").as_ref().and_then(Value::as_u64)
    }

    /// Number of items not yet completed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.list().iter().filter(|todo| !todo.completed).count()
    }

    /// Appends an item. Blank titles are ignored.
    pub fn add(&self, title: &str) -> Option<u64> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self
            .store
            .get("next_id")
            .as_ref().and_then(Value::as_u64)
            .unwrap_or(1);
        let mut todos = self.list();
        todos.push(Todo {
            id,
            title: title.to_owned(),
            completed: false,
        });
        debug!(id, "todo added");
        self.save(todos, Partial::new().set("next_id", id + 1));
        Some(id)
    }

    /// Flips the completed flag of one item.
    pub fn toggle(&self, id: u64) {
        self.update(|todos| {
            for todo in todos.iter_mut().filter(|todo| todo.id == id) {
                todo.completed = !todo.completed;
            }
        });
    }

    /// Marks every item as `completed`.
    pub fn toggle_all(&self, completed: bool) {
        self.update(|todos| {
            for todo in todos {
                todo.completed = completed;
            }
        });
    }

    /// Deletes one item.
    pub fn remove(&self, id: u64) {
        self.update(|todos| todos.retain(|todo| todo.id != id));
    }

    /// Deletes every completed item.
    pub fn clear_completed(&self) {
        self.update(|todos| todos.retain(|todo| !todo.completed));
    }

    /// Enters edit mode for `id`.
    pub fn start_editing(&self, id: u64) {
        self.store.set_state(Partial::new().set("editing", id));
    }

    /// Leaves edit mode without saving.
    pub fn cancel_editing(&self) {
        self.store.set_state(Partial::new().set("editing", Value::Null));
    }

    /// Saves the edited title and leaves edit mode. A blank title removes
    /// the item.
    pub fn commit_edit(&self, id: u64, title: &str) {
        let title = title.trim();
        let mut todos = self.list();
        if title.is_empty() {
            todos.retain(|todo| todo.id != id);
        } else {
            for todo in todos.iter_mut().filter(|todo| todo.id == id) {
                title.clone_into(&mut todo.title);
            }
        }
        self.save(todos, Partial::new().set("editing", Value::Null));
    }

    fn update(&self, change: impl FnOnce(&mut Vec<Todo>)) {
        let mut todos = self.list();
        change(&mut todos);
        self.save(todos, Partial::new());
    }

    fn save(&self, todos: Vec<Todo>, partial: Partial) {
        let items: Vec<Value> = todos.iter().map(Todo::to_value).collect();
        self.store.set_state(partial.set("todos", items));
    }
}
