//! Keeps keyboard focus across re-renders.
//!
//! Every pass replaces the inputs, so the focused element and whatever was
//! typed into it are lost. [`FocusKeeper::capture`] runs as a pre-render hook
//! and remembers which input had focus together with its draft;
//! [`FocusKeeper::restore`] runs as a post-render hook and puts both back on
//! the freshly built input. The cursor position is not kept.

use core::cell::RefCell;
use std::rc::Rc;

use miniframe::Dom;
use tracing::trace;

/// Inputs whose focus survives a pass, most specific first.
const TRACKED: [&str; 2] = [".edit", ".new-todo"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    selector: &'static str,
    draft: Option<String>,
}

/// Focus state shared by the pre- and post-render hooks.
#[derive(Debug, Clone)]
pub struct FocusKeeper<D> {
    dom: D,
    saved: Rc<RefCell<Option<Snapshot>>>,
}

impl<D: Dom> FocusKeeper<D> {
    /// Creates a keeper with nothing captured.
    #[must_use]
    pub fn new(dom: &D) -> Self {
        Self {
            dom: dom.clone(),
            saved: Rc::default(),
        }
    }

    /// Records the focused tracked input, if any.
    pub fn capture(&self) {
        let snapshot = self.dom.active_element().and_then(|active| {
            let selector = TRACKED
                .into_iter()
                .find(|selector| self.dom.matches(&active, selector).unwrap_or(false))?;
            Some(Snapshot {
                selector,
                draft: self.dom.value(&active),
            })
        });
        trace!(?snapshot, "focus captured");
        *self.saved.borrow_mut() = snapshot;
    }

    /// Restores the captured draft and focus on the rebuilt page.
    ///
    /// An edit field on the page always takes focus, so a double click lands
    /// the cursor in it.
    pub fn restore(&self) {
        let saved = self.saved.borrow_mut().take();
        let restored = saved.and_then(|Snapshot { selector, draft }| {
            let node = self.dom.query_selector(selector).ok().flatten()?;
            if let Some(draft) = draft {
                self.dom.set_value(&node, &draft);
            }
            Some(node)
        });
        let editor = self.dom.query_selector(TRACKED[0]).ok().flatten();
        if let Some(node) = editor.or(restored) {
            self.dom.focus(&node);
        }
    }
}
