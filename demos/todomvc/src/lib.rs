//! `TodoMVC` on `MiniFrame`.
//!
//! The app only uses the public API: state lives in a [`Store`], the three
//! filters are routes (`#/`, `#/active`, `#/completed`), item buttons use
//! delegated listeners and focus survives re-renders through render hooks.
//!
//! ```
//! use miniframe::{headless::HeadlessDom, init, Store};
//!
//! let (dom, _root) = HeadlessDom::with_mount_point("app");
//! let store = Store::new();
//! let app = miniframe_todomvc::install(&dom, &store);
//! init(dom.clone(), &store, app.config("#app")).unwrap();
//!
//! app.todos().add("Write docs");
//! assert_eq!(dom.query_selector_all(".todo-list li").unwrap().len(), 1);
//! ```

mod focus;
pub mod model;
mod view;

use miniframe::{
    AppConfig, Dom, Store,
    events::{self, Delegated},
};
use tracing::debug;

pub use focus::FocusKeeper;
pub use model::{Filter, Todo, Todos};

/// An installed `TodoMVC` app.
#[derive(Debug)]
pub struct TodoMvc<D: Dom> {
    dom: D,
    todos: Todos,
    focus: FocusKeeper<D>,
    delegated: Vec<Delegated>,
}

/// Registers the delegated listeners for item actions on `dom`.
///
/// Pass [`TodoMvc::config`] to `init` to start rendering.
#[must_use]
pub fn install<D: Dom>(dom: &D, store: &Store) -> TodoMvc<D> {
    let todos = Todos::new(store.clone());
    let delegated = vec![
        item_action(dom, "click", ".destroy", &todos, Todos::remove),
        item_action(dom, "change", ".toggle", &todos, Todos::toggle),
        {
            let todos = todos.clone();
            events::on(dom, "click", ".clear-completed", move |_| {
                todos.clear_completed();
            })
        },
    ];
    debug!(listeners = delegated.len(), "todomvc installed");
    TodoMvc {
        dom: dom.clone(),
        todos,
        focus: FocusKeeper::new(dom),
        delegated,
    }
}

fn item_action<D: Dom>(
    dom: &D,
    event: &str,
    selector: &str,
    todos: &Todos,
    action: fn(&Todos, u64),
) -> Delegated {
    let reader = dom.clone();
    let todos = todos.clone();
    events::on(dom, event, selector, move |event| {
        let id = reader
            .attribute(event.target(), "data-id")
            .and_then(|id| id.parse().ok());
        if let Some(id) = id {
            action(&todos, id);
        }
    })
}

impl<D: Dom> TodoMvc<D> {
    /// Routes and hooks for mounting into `root`.
    ///
    /// Unknown paths show every item.
    #[must_use]
    pub fn config(&self, root: &str) -> AppConfig<D::Node> {
        let (before, after) = (self.focus.clone(), self.focus.clone());
        Filter::ALL
            .into_iter()
            .fold(AppConfig::new(root), |config, filter| {
                config.route(filter.path(), view::page(&self.dom, &self.todos, filter))
            })
            .route("*", view::page(&self.dom, &self.todos, Filter::All))
            .before_render(move || before.capture())
            .after_render(move || after.restore())
    }

    /// Actions over the items.
    #[must_use]
    pub const fn todos(&self) -> &Todos {
        &self.todos
    }

    /// Removes the delegated listeners. The page stops reacting to item
    /// buttons; the render loop keeps running.
    pub fn uninstall(self) {
        for delegated in self.delegated {
            events::off(&self.dom, delegated);
        }
    }
}

/// Mounts `TodoMVC` on the current page's `#app` element.
///
/// # Errors
///
/// Fails outside of a browser or when the page has no `#app` element.
#[cfg(feature = "web")]
pub fn mount_web(store: &Store) -> Result<miniframe::web::WebApp, miniframe::web::WebError> {
    let dom = miniframe::web::WebDom::new()?;
    let app = install(&dom, store);
    miniframe::web::WebApp::mount(store, app.config("#app"))
}

/// Browser entry point run by the generated `pkg/miniframe_todomvc.js`.
///
/// # Errors
///
/// Returns the mount failure as a JavaScript error.
#[cfg(feature = "web")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    mount_web(&Store::new())?;
    Ok(())
}
