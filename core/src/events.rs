//! Delegated document-level listeners.

use std::rc::Rc;

use tracing::warn;

use crate::dom::{Dom, Event, ListenerId};

/// Handle to a listener registered with [`on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delegated {
    id: ListenerId,
}

impl Delegated {
    /// The underlying document listener.
    #[must_use]
    pub const fn id(self) -> ListenerId {
        self.id
    }
}

/// Listens for `event` on the whole document and calls `handler` when the
/// event target matches `selector`.
///
/// Only the target itself is tested, not its ancestors. An invalid selector
/// never matches and is logged on each event.
pub fn on<D: Dom>(
    dom: &D,
    event: &str,
    selector: impl Into<String>,
    handler: impl Fn(&Event<D::Node>) + 'static,
) -> Delegated {
    let selector = selector.into();
    let matcher = dom.clone();
    let id = dom.add_document_listener(
        event,
        Rc::new(move |event: &Event<D::Node>| {
            match matcher.matches(event.target(), &selector) {
                Ok(true) => handler(event),
                Ok(false) => {}
                Err(error) => warn!(%error, "delegated listener has an invalid selector"),
            }
        }),
    );
    Delegated { id }
}

/// Removes a listener registered with [`on`]. Returns `false` when it was
/// already removed.
pub fn off<D: Dom>(dom: &D, delegated: Delegated) -> bool {
    dom.remove_document_listener(delegated.id)
}
