//! Application configuration passed to [`init`](crate::init).

use std::rc::Rc;

use serde::Deserialize;

use crate::{
    component::Component,
    error::RenderError,
    hooks::Hooks,
    route::{Route, RouteTable},
};

/// Default text shown in place of a failed component.
pub const DEFAULT_FALLBACK: &str = "Error loading component";

/// Tunables of the render loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Text node mounted when a pass fails.
    pub fallback_message: String,
    /// Drop the result of a pass that a newer pass has overtaken.
    ///
    /// Off by default: overlapping passes race and the last one to finish
    /// mounting wins.
    pub discard_stale: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK.to_owned(),
            discard_stale: false,
        }
    }
}

impl RenderOptions {
    /// Parses options from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Root selector, route table, hooks and options for one application.
#[derive(Debug)]
pub struct AppConfig<N> {
    pub(crate) root: String,
    pub(crate) routes: Vec<Route<N>>,
    pub(crate) hooks: Hooks,
    pub(crate) options: RenderOptions,
}

impl<N> AppConfig<N> {
    /// Starts a configuration mounting into the element matched by `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            routes: Vec::new(),
            hooks: Hooks::default(),
            options: RenderOptions::default(),
        }
    }

    /// Appends a route. Order matters for lookup.
    #[must_use]
    pub fn route(
        mut self,
        path: impl Into<String>,
        component: impl Fn() -> Result<Component<N>, RenderError> + 'static,
    ) -> Self {
        self.routes.push(Route::new(path, component));
        self
    }

    /// Appends already constructed routes.
    #[must_use]
    pub fn routes(mut self, routes: impl IntoIterator<Item = Route<N>>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Runs `hook` before each pass clears the root.
    #[must_use]
    pub fn before_render(mut self, hook: impl Fn() + 'static) -> Self {
        self.hooks.push_before(Rc::new(hook));
        self
    }

    /// Runs `hook` after each pass has mounted its content.
    #[must_use]
    pub fn after_render(mut self, hook: impl Fn() + 'static) -> Self {
        self.hooks.push_after(Rc::new(hook));
        self
    }

    /// Runs `hook` for every failed pass.
    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&RenderError) + 'static) -> Self {
        self.hooks.push_error(Rc::new(hook));
        self
    }

    /// Replaces the render options.
    #[must_use]
    pub fn options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// The root selector.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn into_parts(self) -> (String, RouteTable<N>, Hooks, RenderOptions) {
        (
            self.root,
            RouteTable::new(self.routes),
            self.hooks,
            self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_from_partial_json() {
        let options = RenderOptions::from_json(r#"{"discard_stale": true}"#).unwrap();
        assert!(options.discard_stale);
        assert_eq!(options.fallback_message, DEFAULT_FALLBACK);
    }

    #[test]
    fn routes_keep_insertion_order() {
        let config = AppConfig::<()>::new("#app")
            .route("/", || Ok(Component::Empty))
            .routes([Route::new("*", || Ok(Component::Empty))]);
        let paths: Vec<_> = config.routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/", "*"]);
        assert_eq!(config.root(), "#app");
    }
}
