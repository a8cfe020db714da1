use core::{
    cell::{Cell, RefCell},
    fmt,
};
use std::{collections::HashMap, rc::Rc};

use futures::future::LocalBoxFuture;
use js_sys::Reflect;
use miniframe_core::{Dom, DomError, Event, Host, Listener, ListenerId};
use tracing::{trace, warn};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Node, Window};

use crate::{
    error::{WebError, dom_error},
    listeners::ElementListeners,
};

type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

struct Inner {
    window: Window,
    document: Document,
    document_listeners: RefCell<HashMap<ListenerId, (String, EventClosure)>>,
    element_listeners: RefCell<ElementListeners<Node, (String, EventClosure)>>,
    next_listener: Cell<u64>,
}

/// The browser document behind the [`Dom`] and [`Host`] traits.
///
/// Live properties (`value`, `checked`, `autofocus`, inline style entries)
/// are assigned as JavaScript properties, so they track user edits the same
/// way `element.value = ...` does.
#[derive(Clone)]
pub struct WebDom {
    inner: Rc<Inner>,
}

impl fmt::Debug for WebDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDom")
            .field(
                "document_listeners",
                &self.inner.document_listeners.borrow().len(),
            )
            .field(
                "element_listeners",
                &self.inner.element_listeners.borrow().tracked(),
            )
            .finish_non_exhaustive()
    }
}

impl WebDom {
    /// Binds to the global `window` and its document.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside of a browser.
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self {
            inner: Rc::new(Inner {
                window,
                document,
                document_listeners: RefCell::new(HashMap::new()),
                element_listeners: RefCell::default(),
                next_listener: Cell::new(1),
            }),
        })
    }

    /// Returns the owning document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Returns the global window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.inner.window
    }

    /// Detaches and drops the listeners of every node inside `subtrees`.
    fn release_listeners(&self, subtrees: &[Node]) {
        if subtrees.is_empty() {
            return;
        }
        let released = self
            .inner
            .element_listeners
            .borrow_mut()
            .release(|node| subtrees.iter().any(|root| root.contains(Some(node))));
        trace!(released = released.len(), "element listeners released");
        for (node, (event, closure)) in released {
            if let Err(error) =
                node.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref())
            {
                warn!(error = %WebError::from(error), %event, "failed to detach listener");
            }
        }
    }
}

fn convert_event(event: &web_sys::Event, fallback: &Node) -> Event<Node> {
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .unwrap_or_else(|| fallback.clone());
    let converted = Event::new(event.type_(), target);
    match event.dyn_ref::<KeyboardEvent>() {
        Some(keyboard) => converted.with_key(keyboard.key()),
        None => converted,
    }
}

fn event_closure(listener: Listener<Node>, fallback: Node) -> EventClosure {
    Closure::new(move |event: web_sys::Event| {
        let converted = convert_event(&event, &fallback);
        listener(&converted);
        if converted.default_prevented() {
            event.prevent_default();
        }
    })
}

fn set_property(target: &JsValue, key: &str, value: &JsValue) -> Result<(), DomError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(drop)
        .map_err(|error| dom_error(&error, key))
}

fn get_property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).ok()
}

fn warn_on_error(result: Result<(), DomError>, property: &str) {
    if let Err(error) = result {
        warn!(%error, property, "failed to set property");
    }
}

impl Dom for WebDom {
    type Node = Node;

    fn create_element(&self, tag: &str) -> Result<Node, DomError> {
        self.inner
            .document
            .create_element(tag)
            .map(Into::into)
            .map_err(|error| dom_error(&error, tag))
    }

    fn create_text_node(&self, text: &str) -> Node {
        self.inner.document.create_text_node(text).into()
    }

    fn append_child(&self, parent: &Node, child: &Node) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|error| dom_error(&error, ""))
    }

    fn clear_children(&self, node: &Node) -> Result<(), DomError> {
        let mut removed = Vec::new();
        while let Some(child) = node.first_child() {
            node.remove_child(&child)
                .map_err(|error| dom_error(&error, ""))?;
            removed.push(child);
        }
        self.release_listeners(&removed);
        Ok(())
    }

    fn set_text_content(&self, node: &Node, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_class_name(&self, node: &Node, class: &str) {
        if let Some(element) = node.dyn_ref::<Element>() {
            element.set_class_name(class);
        }
    }

    fn set_style_property(&self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        let style = get_property(node, "style")
            .ok_or_else(|| DomError::Js(format!("node has no style to set `{name}` on")))?;
        set_property(&style, name, &JsValue::from_str(value))
    }

    fn set_checked(&self, node: &Node, checked: bool) {
        warn_on_error(
            set_property(node, "checked", &JsValue::from_bool(checked)),
            "checked",
        );
    }

    fn set_value(&self, node: &Node, value: &str) {
        warn_on_error(
            set_property(node, "value", &JsValue::from_str(value)),
            "value",
        );
    }

    fn set_autofocus(&self, node: &Node, autofocus: bool) {
        warn_on_error(
            set_property(node, "autofocus", &JsValue::from_bool(autofocus)),
            "autofocus",
        );
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        let element = node
            .dyn_ref::<Element>()
            .ok_or_else(|| DomError::Hierarchy("text nodes have no attributes".into()))?;
        element
            .set_attribute(name, value)
            .map_err(|error| dom_error(&error, name))
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()
            .and_then(|element| element.get_attribute(name))
    }

    fn value(&self, node: &Node) -> Option<String> {
        get_property(node, "value").and_then(|value| value.as_string())
    }

    fn checked(&self, node: &Node) -> bool {
        get_property(node, "checked")
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn add_event_listener(&self, node: &Node, event: &str, listener: Listener<Node>) {
        let closure = event_closure(listener, node.clone());
        if let Err(error) =
            node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(error = %WebError::from(error), event, "failed to attach listener");
            return;
        }
        self.inner
            .element_listeners
            .borrow_mut()
            .insert(node.clone(), (event.to_owned(), closure));
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Node>, DomError> {
        self.inner
            .document
            .query_selector(selector)
            .map(|found| found.map(Into::into))
            .map_err(|error| dom_error(&error, selector))
    }

    fn matches(&self, node: &Node, selector: &str) -> Result<bool, DomError> {
        node.dyn_ref::<Element>().map_or(Ok(false), |element| {
            element
                .matches(selector)
                .map_err(|error| dom_error(&error, selector))
        })
    }

    fn add_document_listener(&self, event: &str, listener: Listener<Node>) -> ListenerId {
        let id = ListenerId::new(self.inner.next_listener.get());
        self.inner.next_listener.set(id.raw() + 1);

        let document: &Node = self.inner.document.as_ref();
        let closure = event_closure(listener, document.clone());
        if let Err(error) = self
            .inner
            .document
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(error = %WebError::from(error), event, "failed to attach document listener");
        }
        self.inner
            .document_listeners
            .borrow_mut()
            .insert(id, (event.to_owned(), closure));
        trace!(id = id.raw(), event, "document listener added");
        id
    }

    fn remove_document_listener(&self, id: ListenerId) -> bool {
        let Some((event, closure)) = self.inner.document_listeners.borrow_mut().remove(&id) else {
            return false;
        };
        if let Err(error) = self
            .inner
            .document
            .remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref())
        {
            warn!(error = %WebError::from(error), %event, "failed to detach document listener");
        }
        true
    }

    fn active_element(&self) -> Option<Node> {
        self.inner.document.active_element().map(Into::into)
    }

    fn focus(&self, node: &Node) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            if let Err(error) = element.focus() {
                warn!(error = %WebError::from(error), "failed to focus element");
            }
        }
    }
}

impl Host for WebDom {
    fn location_hash(&self) -> String {
        self.inner.window.location().hash().unwrap_or_default()
    }

    fn on_hash_change(&self, callback: Rc<dyn Fn()>) {
        let closure: Closure<dyn FnMut()> = Closure::new(move || callback());
        if let Err(error) = self
            .inner
            .window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
        {
            warn!(error = %WebError::from(error), "failed to listen for hash changes");
            return;
        }
        closure.forget();
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
