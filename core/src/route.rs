//! Hash routes.

use core::fmt;
use std::rc::Rc;

use crate::{
    component::{Component, Resolver},
    error::RenderError,
};

/// Pattern matching any path.
pub const WILDCARD: &str = "*";

/// One entry of the route table.
pub struct Route<N> {
    /// Exact path, or [`WILDCARD`].
    pub path: String,
    /// Invoked on every pass that selects this route.
    pub component: Resolver<N>,
}

impl<N> Route<N> {
    /// Creates a route.
    pub fn new(
        path: impl Into<String>,
        component: impl Fn() -> Result<Component<N>, RenderError> + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            component: Rc::new(component),
        }
    }

    /// Whether this is the catch-all route.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.path == WILDCARD
    }
}

impl<N> Clone for Route<N> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            component: Rc::clone(&self.component),
        }
    }
}

impl<N> fmt::Debug for Route<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable route table.
pub struct RouteTable<N> {
    routes: Vec<Route<N>>,
}

impl<N> RouteTable<N> {
    /// Wraps routes in lookup order.
    #[must_use]
    pub const fn new(routes: Vec<Route<N>>) -> Self {
        Self { routes }
    }

    /// Selects the route for `path`: the first exact match, else the first
    /// wildcard, else the first entry. `None` only for an empty table.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Route<N>> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .or_else(|| self.routes.iter().find(|route| route.is_wildcard()))
            .or_else(|| self.routes.first())
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<N>> {
        self.routes.iter()
    }
}

impl<N> fmt::Debug for RouteTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.routes).finish()
    }
}

/// Turns a raw hash fragment into a route path.
///
/// The leading `#` is stripped; an empty fragment means `/`.
#[must_use]
pub fn hash_path(hash: &str) -> String {
    match hash.strip_prefix('#').unwrap_or(hash) {
        "" => "/".to_owned(),
        path => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(paths: &[&str]) -> RouteTable<()> {
        RouteTable::new(
            paths
                .iter()
                .map(|path| Route::new(*path, || Ok(Component::Empty)))
                .collect(),
        )
    }

    fn selected(table: &RouteTable<()>, hash: &str) -> Option<String> {
        table.resolve(&hash_path(hash)).map(|route| route.path.clone())
    }

    #[test]
    fn unknown_path_selects_wildcard() {
        let routes = table(&["/", "*"]);
        assert_eq!(selected(&routes, "#/missing").as_deref(), Some("*"));
    }

    #[test]
    fn root_and_empty_hash_select_exact_root() {
        let routes = table(&["*", "/"]);
        assert_eq!(selected(&routes, "#/").as_deref(), Some("/"));
        assert_eq!(selected(&routes, "").as_deref(), Some("/"));
        assert_eq!(selected(&routes, "#").as_deref(), Some("/"));
    }

    #[test]
    fn falls_back_to_first_entry() {
        let routes = table(&["/home", "/about"]);
        assert_eq!(selected(&routes, "#/nowhere").as_deref(), Some("/home"));
    }

    #[test]
    fn first_exact_match_wins() {
        let routes = RouteTable::new(vec![
            Route::new("/a", || Ok(Component::Node(1))),
            Route::new("/a", || Ok(Component::Node(2))),
        ]);
        let route = routes.resolve("/a").unwrap();
        assert!(matches!((route.component)(), Ok(Component::Node(1))));
    }

    #[test]
    fn empty_table_has_no_route() {
        assert!(table(&[]).resolve("/").is_none());
    }

    #[test]
    fn hash_path_strips_the_marker_only() {
        assert_eq!(hash_path("#/active"), "/active");
        assert_eq!(hash_path("/raw"), "/raw");
    }
}
