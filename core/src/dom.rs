//! Backend-neutral DOM surface.
//!
//! The builder and the render loop only talk to a document through [`Dom`], and
//! to the surrounding page (location, scheduling) through [`Host`]. The
//! in-memory [`HeadlessDom`](crate::headless::HeadlessDom) and the browser
//! backend in `miniframe-web` both implement these traits.

use core::{cell::Cell, fmt};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::DomError;

/// Callback attached to a node or to the document.
pub type Listener<N> = Rc<dyn Fn(&Event<N>)>;

/// Identifier of a document-level listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wraps a backend-assigned raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// An event delivered to a [`Listener`].
#[derive(Debug)]
pub struct Event<N> {
    kind: String,
    target: N,
    key: Option<String>,
    default_prevented: Cell<bool>,
}

impl<N> Event<N> {
    /// Creates an event of the given kind (`"click"`, `"input"`...) aimed at `target`.
    pub fn new(kind: impl Into<String>, target: N) -> Self {
        Self {
            kind: kind.into(),
            target,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Attaches the keyboard key carried by `keydown`/`keyup` events.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The lower-case event name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched to.
    #[must_use]
    pub const fn target(&self) -> &N {
        &self.target
    }

    /// The key for keyboard events.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Marks the event so the host skips its default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener called [`Event::prevent_default`].
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Operations the framework needs from a document.
///
/// Node handles are cheap clones referring to the same live node. Setters on
/// live properties (`value`, `checked`, `autofocus`) never go through
/// attributes, so they keep working after the user edits a control.
pub trait Dom: Clone + 'static {
    /// Handle to a node of this document.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// Creates a detached element.
    ///
    /// # Errors
    ///
    /// Returns an error when the document rejects the tag name.
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    /// Creates a detached text node.
    fn create_text_node(&self, text: &str) -> Self::Node;

    /// Appends `child` as the last child of `parent`, moving it if it is attached elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error when the append would create an invalid tree.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Detaches every child of `node`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document refuses to remove a child.
    fn clear_children(&self, node: &Self::Node) -> Result<(), DomError>;

    /// Replaces the content of `node` with a single text node.
    fn set_text_content(&self, node: &Self::Node, text: &str);

    /// Sets the class attribute.
    fn set_class_name(&self, node: &Self::Node, class: &str);

    /// Assigns one inline style property, leaving the others untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the host rejects the assignment.
    fn set_style_property(&self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    /// Sets the live `checked` state.
    fn set_checked(&self, node: &Self::Node, checked: bool);

    /// Sets the live `value` property.
    fn set_value(&self, node: &Self::Node, value: &str);

    /// Sets the `autofocus` flag.
    fn set_autofocus(&self, node: &Self::Node, autofocus: bool);

    /// Sets a string attribute.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid attribute names or non-element nodes.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    /// Reads a string attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Reads the live `value` property.
    fn value(&self, node: &Self::Node) -> Option<String>;

    /// Reads the live `checked` state.
    fn checked(&self, node: &Self::Node) -> bool;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Registers `listener` for `event` on `node`. There is no matching removal.
    fn add_event_listener(&self, node: &Self::Node, event: &str, listener: Listener<Self::Node>);

    /// Returns the first element of the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Syntax`] for selectors the document cannot parse.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;

    /// Whether `node` is an element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Syntax`] for selectors the document cannot parse.
    fn matches(&self, node: &Self::Node, selector: &str) -> Result<bool, DomError>;

    /// Registers a listener on the document itself.
    fn add_document_listener(&self, event: &str, listener: Listener<Self::Node>) -> ListenerId;

    /// Removes a document listener. Returns `false` when it was already gone.
    fn remove_document_listener(&self, id: ListenerId) -> bool;

    /// The element that currently has focus, if any.
    fn active_element(&self) -> Option<Self::Node>;

    /// Moves focus to `node`.
    fn focus(&self, node: &Self::Node);
}

/// The page around a document: its location and its task scheduler.
pub trait Host: Dom {
    /// The raw hash fragment, including the leading `#`, or an empty string.
    fn location_hash(&self) -> String;

    /// Calls `callback` every time the hash fragment changes.
    fn on_hash_change(&self, callback: Rc<dyn Fn()>);

    /// Runs `task` on the single-threaded executor of this host.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
}
