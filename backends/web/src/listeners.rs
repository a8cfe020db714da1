//! Ownership of listeners attached to elements.
//!
//! A closure handed to the browser must outlive every dispatch to it, but an
//! element dropped by a re-render never dispatches again. Closures are kept
//! here next to their element and handed back once that element leaves the
//! document, so the caller can detach and drop them.

/// Listener closures keyed by the node they are attached to.
#[derive(Debug)]
pub struct ElementListeners<N, C> {
    entries: Vec<(N, C)>,
}

impl<N, C> Default for ElementListeners<N, C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N, C> ElementListeners<N, C> {
    /// Keeps `closure` alive while `node` stays attached.
    pub fn insert(&mut self, node: N, closure: C) {
        self.entries.push((node, closure));
    }

    /// Removes and returns every entry whose node is `detached`.
    pub fn release(&mut self, mut detached: impl FnMut(&N) -> bool) -> Vec<(N, C)> {
        let (released, kept): (Vec<_>, Vec<_>) = core::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(node, _)| detached(node));
        self.entries = kept;
        released
    }

    /// Number of closures currently held.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}
