//! An in-memory document implementing [`Dom`] and [`Host`].
//!
//! [`HeadlessDom`] keeps every node in an arena owned by the document. Nodes
//! removed from the tree stay in the arena, detached, until the document is
//! dropped, so a document grows with every render pass. It is meant for tests
//! and other short-lived documents, not for long-running hosts.
//!
//! The document starts with a `<body>` element; everything reachable from it
//! is "connected" and visible to [`Dom::query_selector`].
//!
//! Deferred work spawned through [`Host::spawn_local`] runs on a
//! [`LocalPool`] owned by the document and only makes progress inside
//! [`HeadlessDom::run_until_stalled`].

mod selector;

use core::{
    cell::{Cell, RefCell},
    fmt::{self, Write as _},
};
use std::rc::Rc;

use futures::{
    executor::{LocalPool, LocalSpawner},
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};
use tracing::{trace, warn};

use crate::{
    dom::{Dom, Event, Host, Listener, ListenerId},
    error::DomError,
};

use self::selector::{Complex, Compound, SelectorList};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Handle to a node of a [`HeadlessDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

enum NodeKind {
    Element(Box<ElementData>),
    Text(String),
}

#[derive(Default)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    value: Option<String>,
    checked: bool,
    autofocus: bool,
    listeners: Vec<(String, Listener<NodeId>)>,
}

impl ElementData {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.attributes.push((name.to_owned(), value.to_owned())),
        }
    }
}

struct Inner {
    nodes: RefCell<Vec<NodeData>>,
    body: NodeId,
    active: Cell<Option<NodeId>>,
    hash: RefCell<String>,
    hash_listeners: RefCell<Vec<Rc<dyn Fn()>>>,
    document_listeners: RefCell<Vec<(ListenerId, String, Listener<NodeId>)>>,
    next_listener: Cell<u64>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

/// In-memory document used by tests and by hosts without a browser.
#[derive(Clone)]
pub struct HeadlessDom {
    inner: Rc<Inner>,
}

impl fmt::Debug for HeadlessDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessDom")
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("hash", &self.inner.hash.borrow())
            .field("body", &self.outer_html(&self.inner.body))
            .finish_non_exhaustive()
    }
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    /// Creates a document containing an empty `<body>` and no hash fragment.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeData {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element(Box::new(ElementData {
                tag: "body".to_owned(),
                ..ElementData::default()
            })),
        };
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            inner: Rc::new(Inner {
                nodes: RefCell::new(vec![body]),
                body: NodeId(0),
                active: Cell::new(None),
                hash: RefCell::new(String::new()),
                hash_listeners: RefCell::new(Vec::new()),
                document_listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(1),
                pool: RefCell::new(pool),
                spawner,
            }),
        }
    }

    /// Creates a document whose body holds a single `<div id="{id}">`.
    ///
    /// Returns the document together with that element.
    #[must_use]
    pub fn with_mount_point(id: &str) -> (Self, NodeId) {
        let dom = Self::new();
        let node = dom.push_node(NodeKind::Element(Box::new(ElementData {
            tag: "div".to_owned(),
            attributes: vec![("id".to_owned(), id.to_owned())],
            ..ElementData::default()
        })));
        dom.attach(dom.inner.body, node);
        (dom, node)
    }

    /// Number of nodes allocated so far, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.inner.body
    }

    /// Changes the hash fragment and notifies hash-change callbacks synchronously.
    ///
    /// A missing leading `#` is added. Setting the current value again does
    /// not notify, matching browsers.
    pub fn set_hash(&self, hash: &str) {
        let hash = if hash.is_empty() || hash.starts_with('#') {
            hash.to_owned()
        } else {
            format!("#{hash}")
        };
        if *self.inner.hash.borrow() == hash {
            return;
        }
        trace!(%hash, "hash changed");
        self.inner.hash.replace(hash);
        let listeners: Vec<_> = self.inner.hash_listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    /// Drives spawned tasks until none of them can make progress.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a task running on this document.
    pub fn run_until_stalled(&self) {
        self.inner.pool.borrow_mut().run_until_stalled();
    }

    /// Dispatches `event` at `target`, bubbling through its ancestors and then
    /// to document listeners.
    ///
    /// Returns `false` when a listener called [`Event::prevent_default`].
    pub fn dispatch(&self, target: &NodeId, event: Event<NodeId>) -> bool {
        let mut path = vec![*target];
        let mut current = *target;
        while let Some(parent) = self.parent(&current) {
            path.push(parent);
            current = parent;
        }

        for node in path {
            let listeners: Vec<_> = self
                .with_element(&node, |element| {
                    element
                        .listeners
                        .iter()
                        .filter(|(kind, _)| kind == event.kind())
                        .map(|(_, listener)| Rc::clone(listener))
                        .collect()
                })
                .unwrap_or_default();
            for listener in listeners {
                listener(&event);
            }
        }

        let document_listeners: Vec<_> = self
            .inner
            .document_listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| kind == event.kind())
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in document_listeners {
            listener(&event);
        }

        !event.default_prevented()
    }

    /// Dispatches a bare event of the given kind.
    pub fn fire(&self, target: &NodeId, kind: &str) -> bool {
        self.dispatch(target, Event::new(kind, *target))
    }

    /// Sets the live value of `target` and dispatches `input`, like typing.
    pub fn type_text(&self, target: &NodeId, text: &str) -> bool {
        self.set_value(target, text);
        self.fire(target, "input")
    }

    /// Dispatches a `keydown` carrying `key`.
    pub fn press_key(&self, target: &NodeId, key: &str) -> bool {
        self.dispatch(target, Event::new("keydown", *target).with_key(key))
    }

    /// Reads one inline style property.
    #[must_use]
    pub fn style(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(node, |element| {
            element
                .style
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    /// Reads the autofocus flag.
    #[must_use]
    pub fn autofocus(&self, node: &NodeId) -> bool {
        self.with_element(node, |element| element.autofocus)
            .unwrap_or(false)
    }

    /// Lower-case tag name, `None` for text nodes.
    #[must_use]
    pub fn tag_name(&self, node: &NodeId) -> Option<String> {
        self.with_element(node, |element| element.tag.clone())
    }

    /// The parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.nodes.borrow()[node.0].parent
    }

    /// Children of `node` in order.
    #[must_use]
    pub fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.inner.nodes.borrow()[node.0].children.clone()
    }

    /// Whether `node` is reachable from the body.
    #[must_use]
    pub fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = *node;
        loop {
            if current == self.inner.body {
                return true;
            }
            match self.parent(&current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Every connected element matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Syntax`] for unsupported selectors.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = selector::parse(selector)?;
        let mut found = Vec::new();
        self.walk(self.inner.body, &mut |node| {
            if self.matches_list(node, &list) {
                found.push(node);
            }
        });
        Ok(found)
    }

    /// Serializes the children of `node` as HTML.
    ///
    /// Live properties (`value`, `checked`, inline style) are not reflected,
    /// as in a browser.
    #[must_use]
    pub fn inner_html(&self, node: &NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.serialize(child, &mut out);
        }
        out
    }

    /// Serializes `node` itself as HTML.
    #[must_use]
    pub fn outer_html(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.serialize(*node, &mut out);
        out
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        let tag = {
            let nodes = self.inner.nodes.borrow();
            match &nodes[node.0].kind {
                NodeKind::Text(text) => {
                    out.push_str(&escape(text, false));
                    return;
                }
                NodeKind::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag);
                    for (name, value) in &element.attributes {
                        let _ = write!(out, " {name}=\"{}\"", escape(value, true));
                    }
                    out.push('>');
                    element.tag.clone()
                }
            }
        };
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in self.children(&node) {
            self.serialize(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }

    fn push_node(&self, kind: NodeKind) -> NodeId {
        let mut nodes = self.inner.nodes.borrow_mut();
        nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        });
        NodeId(nodes.len() - 1)
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.inner.nodes.borrow_mut();
        if let Some(old_parent) = nodes[child.0].parent.take() {
            nodes[old_parent.0].children.retain(|id| *id != child);
        }
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn detach_children(&self, node: NodeId) {
        let mut nodes = self.inner.nodes.borrow_mut();
        let children = core::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child.0].parent = None;
        }
    }

    fn with_element<R>(&self, node: &NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        match &self.inner.nodes.borrow()[node.0].kind {
            NodeKind::Element(element) => Some(f(element)),
            NodeKind::Text(_) => None,
        }
    }

    fn with_element_mut<R>(
        &self,
        node: &NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        match &mut self.inner.nodes.borrow_mut()[node.0].kind {
            NodeKind::Element(element) => Some(f(element)),
            NodeKind::Text(_) => None,
        }
    }

    fn walk<F: FnMut(NodeId)>(&self, node: NodeId, visit: &mut F) {
        for child in self.children(&node) {
            visit(child);
            self.walk(child, visit);
        }
    }

    fn matches_list(&self, node: NodeId, list: &SelectorList) -> bool {
        list.0.iter().any(|complex| self.matches_complex(node, complex))
    }

    fn matches_complex(&self, node: NodeId, complex: &Complex) -> bool {
        let Some((subject, ancestors)) = complex.split_last() else {
            return false;
        };
        if !self.matches_compound(node, subject) {
            return false;
        }
        let mut remaining = ancestors;
        let mut current = self.parent(&node);
        while let Some((wanted, rest)) = remaining.split_last() {
            match current {
                Some(ancestor) if self.matches_compound(ancestor, wanted) => {
                    remaining = rest;
                    current = self.parent(&ancestor);
                }
                Some(ancestor) => current = self.parent(&ancestor),
                None => return false,
            }
        }
        true
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        self.with_element(&node, |element| {
            if compound.tag.as_ref().is_some_and(|tag| *tag != element.tag) {
                return false;
            }
            if compound
                .id
                .as_ref()
                .is_some_and(|id| element.attribute("id") != Some(id.as_str()))
            {
                return false;
            }
            let classes: Vec<&str> = element
                .attribute("class")
                .map(|class| class.split_whitespace().collect())
                .unwrap_or_default();
            if !compound
                .classes
                .iter()
                .all(|class| classes.contains(&class.as_str()))
            {
                return false;
            }
            compound
                .attributes
                .iter()
                .all(|(name, expected)| match (element.attribute(name), expected) {
                    (Some(actual), Some(expected)) => actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                })
        })
        .unwrap_or(false)
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
        })
}

impl Dom for HeadlessDom {
    type Node = NodeId;

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if !valid_tag(tag) {
            return Err(DomError::InvalidCharacter(tag.to_owned()));
        }
        Ok(self.push_node(NodeKind::Element(Box::new(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))))
    }

    fn create_text_node(&self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_owned()))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        if self.tag_name(parent).is_none() {
            return Err(DomError::Hierarchy("text nodes cannot have children".into()));
        }
        let mut current = Some(*parent);
        while let Some(node) = current {
            if node == *child {
                return Err(DomError::Hierarchy(
                    "the new child is an ancestor of the parent".into(),
                ));
            }
            current = self.parent(&node);
        }
        self.attach(*parent, *child);
        Ok(())
    }

    fn clear_children(&self, node: &NodeId) -> Result<(), DomError> {
        self.detach_children(*node);
        Ok(())
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        {
            let mut nodes = self.inner.nodes.borrow_mut();
            if let NodeKind::Text(existing) = &mut nodes[node.0].kind {
                text.clone_into(existing);
                return;
            }
        }
        self.detach_children(*node);
        if !text.is_empty() {
            let child = self.create_text_node(text);
            self.attach(*node, child);
        }
    }

    fn set_class_name(&self, node: &NodeId, class: &str) {
        self.with_element_mut(node, |element| element.set_attribute("class", class));
    }

    fn set_style_property(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.with_element_mut(node, |element| {
            match element.style.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => value.clone_into(existing),
                None => element.style.push((name.to_owned(), value.to_owned())),
            }
        });
        Ok(())
    }

    fn set_checked(&self, node: &NodeId, checked: bool) {
        self.with_element_mut(node, |element| element.checked = checked);
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.with_element_mut(node, |element| element.value = Some(value.to_owned()));
    }

    fn set_autofocus(&self, node: &NodeId, autofocus: bool) {
        self.with_element_mut(node, |element| element.autofocus = autofocus);
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !valid_attribute_name(name) {
            return Err(DomError::InvalidCharacter(name.to_owned()));
        }
        self.with_element_mut(node, |element| element.set_attribute(name, value))
            .ok_or_else(|| DomError::Hierarchy("text nodes have no attributes".into()))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(node, |element| element.attribute(name).map(str::to_owned))
            .flatten()
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        self.with_element(node, |element| {
            element
                .value
                .clone()
                .or_else(|| element.attribute("value").map(str::to_owned))
        })
        .flatten()
    }

    fn checked(&self, node: &NodeId) -> bool {
        self.with_element(node, |element| element.checked)
            .unwrap_or(false)
    }

    fn text_content(&self, node: &NodeId) -> String {
        let children = {
            let nodes = self.inner.nodes.borrow();
            match &nodes[node.0].kind {
                NodeKind::Text(text) => return text.clone(),
                NodeKind::Element(_) => nodes[node.0].children.clone(),
            }
        };
        children
            .iter()
            .map(|child| self.text_content(child))
            .collect()
    }

    fn add_event_listener(&self, node: &NodeId, event: &str, listener: Listener<NodeId>) {
        self.with_element_mut(node, |element| {
            element.listeners.push((event.to_owned(), listener));
        });
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn matches(&self, node: &NodeId, selector: &str) -> Result<bool, DomError> {
        let list = selector::parse(selector)?;
        Ok(self.matches_list(*node, &list))
    }

    fn add_document_listener(&self, event: &str, listener: Listener<NodeId>) -> ListenerId {
        let id = ListenerId::new(self.inner.next_listener.get());
        self.inner.next_listener.set(id.raw() + 1);
        self.inner
            .document_listeners
            .borrow_mut()
            .push((id, event.to_owned(), listener));
        id
    }

    fn remove_document_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.document_listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    fn active_element(&self) -> Option<NodeId> {
        self.inner
            .active
            .get()
            .filter(|node| self.is_connected(node))
    }

    fn focus(&self, node: &NodeId) {
        if self.is_connected(node) && self.tag_name(node).is_some() {
            self.inner.active.set(Some(*node));
        }
    }
}

impl Host for HeadlessDom {
    fn location_hash(&self) -> String {
        self.inner.hash.borrow().clone()
    }

    fn on_hash_change(&self, callback: Rc<dyn Fn()>) {
        self.inner.hash_listeners.borrow_mut().push(callback);
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(error) = self.inner.spawner.spawn_local(task) {
            warn!(%error, "failed to spawn task on headless executor");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn mount_point_is_queryable() {
        let (dom, app) = HeadlessDom::with_mount_point("app");
        assert_eq!(dom.query_selector("#app").unwrap(), Some(app));
        assert_eq!(dom.query_selector("#missing").unwrap(), None);
        assert_eq!(dom.inner_html(&dom.body()), "<div id=\"app\"></div>");
    }

    #[test]
    fn detached_nodes_are_not_queryable() {
        let dom = HeadlessDom::new();
        let node = dom.create_element("p").unwrap();
        dom.set_attribute(&node, "id", "loose").unwrap();
        assert_eq!(dom.query_selector("#loose").unwrap(), None);
        dom.append_child(&dom.body(), &node).unwrap();
        assert_eq!(dom.query_selector("#loose").unwrap(), Some(node));
    }

    #[test]
    fn cleared_nodes_stay_allocated_and_reusable() {
        let (dom, app) = HeadlessDom::with_mount_point("app");
        let old = dom.create_element("p").unwrap();
        dom.append_child(&app, &old).unwrap();
        let before = dom.node_count();

        dom.clear_children(&app).unwrap();
        let new = dom.create_element("p").unwrap();
        dom.append_child(&app, &new).unwrap();

        assert_eq!(dom.node_count(), before + 1);
        assert_eq!(dom.parent(&old), None);
        dom.append_child(&app, &old).unwrap();
        assert_eq!(dom.children(&app), vec![new, old]);
    }

    #[test]
    fn append_moves_nodes_between_parents() {
        let dom = HeadlessDom::new();
        let a = dom.create_element("div").unwrap();
        let b = dom.create_element("div").unwrap();
        let child = dom.create_text_node("x");
        dom.append_child(&a, &child).unwrap();
        dom.append_child(&b, &child).unwrap();
        assert!(dom.children(&a).is_empty());
        assert_eq!(dom.children(&b), vec![child]);
    }

    #[test]
    fn append_rejects_cycles_and_text_parents() {
        let dom = HeadlessDom::new();
        let outer = dom.create_element("div").unwrap();
        let inner = dom.create_element("div").unwrap();
        dom.append_child(&outer, &inner).unwrap();
        assert!(matches!(
            dom.append_child(&inner, &outer),
            Err(DomError::Hierarchy(_))
        ));
        let text = dom.create_text_node("t");
        assert!(matches!(
            dom.append_child(&text, &inner),
            Err(DomError::Hierarchy(_))
        ));
    }

    #[test]
    fn text_content_replaces_children() {
        let dom = HeadlessDom::new();
        let node = dom.create_element("div").unwrap();
        let span = dom.create_element("span").unwrap();
        dom.append_child(&node, &span).unwrap();
        dom.set_text_content(&node, "a < b");
        assert_eq!(dom.outer_html(&node), "<div>a &lt; b</div>");
        assert_eq!(dom.text_content(&node), "a < b");
    }

    #[test]
    fn serializes_void_elements_and_attributes() {
        let dom = HeadlessDom::new();
        let input = dom.create_element("INPUT").unwrap();
        dom.set_attribute(&input, "placeholder", "say \"hi\"").unwrap();
        assert_eq!(dom.outer_html(&input), "<input placeholder=\"say &quot;hi&quot;\">");
    }

    #[test]
    fn invalid_attribute_names_are_rejected() {
        let dom = HeadlessDom::new();
        let node = dom.create_element("div").unwrap();
        assert_eq!(
            dom.set_attribute(&node, "a b", "x"),
            Err(DomError::InvalidCharacter("a b".into()))
        );
    }

    #[test]
    fn events_bubble_to_ancestors_then_document() {
        let dom = HeadlessDom::new();
        let outer = dom.create_element("div").unwrap();
        let inner = dom.create_element("button").unwrap();
        dom.append_child(&outer, &inner).unwrap();
        dom.append_child(&dom.body(), &outer).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        for (node, name) in [(inner, "inner"), (outer, "outer")] {
            let log = Rc::clone(&log);
            dom.add_event_listener(&node, "click", Rc::new(move |_| log.borrow_mut().push(name)));
        }
        let doc_log = Rc::clone(&log);
        dom.add_document_listener("click", Rc::new(move |_| doc_log.borrow_mut().push("document")));

        dom.fire(&inner, "click");
        assert_eq!(*log.borrow(), vec!["inner", "outer", "document"]);
    }

    #[test]
    fn prevent_default_is_reported() {
        let dom = HeadlessDom::new();
        let node = dom.create_element("a").unwrap();
        dom.add_event_listener(&node, "click", Rc::new(|event| event.prevent_default()));
        assert!(!dom.fire(&node, "click"));
        assert!(dom.fire(&node, "focus"));
    }

    #[test]
    fn removing_document_listener() {
        let dom = HeadlessDom::new();
        let id = dom.add_document_listener("click", Rc::new(|_| {}));
        assert!(dom.remove_document_listener(id));
        assert!(!dom.remove_document_listener(id));
    }

    #[test]
    fn hash_changes_notify_once_per_change() {
        let dom = HeadlessDom::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        dom.on_hash_change(Rc::new(move || counter.set(counter.get() + 1)));
        dom.set_hash("/a");
        dom.set_hash("#/a");
        dom.set_hash("#/b");
        assert_eq!(dom.location_hash(), "#/b");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn focus_is_lost_when_node_is_detached() {
        let (dom, app) = HeadlessDom::with_mount_point("app");
        let input = dom.create_element("input").unwrap();
        dom.append_child(&app, &input).unwrap();
        dom.focus(&input);
        assert_eq!(dom.active_element(), Some(input));
        dom.clear_children(&app).unwrap();
        assert_eq!(dom.active_element(), None);
    }

    #[test]
    fn spawned_tasks_run_when_driven() {
        let dom = HeadlessDom::new();
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        dom.spawn_local(Box::pin(async move { flag.set(true) }));
        assert!(!done.get());
        dom.run_until_stalled();
        assert!(done.get());
    }

    #[test]
    fn descendant_selectors() {
        let (dom, app) = HeadlessDom::with_mount_point("app");
        let list = dom.create_element("ul").unwrap();
        dom.set_class_name(&list, "todo-list");
        let item = dom.create_element("li").unwrap();
        dom.append_child(&list, &item).unwrap();
        dom.append_child(&app, &list).unwrap();
        assert_eq!(dom.query_selector_all("#app li").unwrap(), vec![item]);
        assert_eq!(dom.query_selector_all(".todo-list li").unwrap(), vec![item]);
        assert!(dom.query_selector_all("li ul").unwrap().is_empty());
        assert!(dom.matches(&item, "ul li, p").unwrap());
    }
}
