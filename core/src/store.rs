//! The observable application state.
//!
//! A [`Store`] owns one JSON object and a list of subscribers. Updates are
//! shallow merges: top-level keys of the partial overwrite the current ones,
//! nested values are replaced wholesale.

use core::{
    cell::{Cell, RefCell},
    fmt,
};
use std::rc::{Rc, Weak};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// The application state: a mapping from string keys to arbitrary values.
pub type State = Map<String, Value>;

type Subscriber = Rc<dyn Fn(&State)>;

/// How a `set_state` issued from inside a subscriber is notified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reentrancy {
    /// Notify every subscriber again right away, nested inside the current
    /// round. Notifications nest and the last write wins.
    #[default]
    Nested,
    /// Merge immediately but queue the notification round until the current
    /// round has finished.
    Deferred,
}

/// Store construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Behavior of re-entrant updates.
    pub reentrancy: Reentrancy,
}

/// The keys to merge into the state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partial(State);

impl Partial {
    /// An empty partial. Merging it only triggers a notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one key.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl From<State> for Partial {
    fn from(value: State) -> Self {
        Self(value)
    }
}

/// Objects become partials; any other JSON value is an empty partial.
impl From<Value> for Partial {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Partial {
    fn from(entries: [(K, V); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Identifies one `subscribe` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreInner {
    state: RefCell<State>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_id: Cell<u64>,
    options: StoreOptions,
    depth: Cell<usize>,
    queued: Cell<usize>,
}

/// Shared handle to the application state.
///
/// Clones refer to the same store. There is no global instance; create one
/// and hand it to whoever needs it.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("subscribers", &self.subscriber_count())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store with an empty state and nested re-entrant notification.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Creates a store with the given options.
    #[must_use]
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(State::new()),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                options,
                depth: Cell::new(0),
                queued: Cell::new(0),
            }),
        }
    }

    /// The options this store was created with.
    #[must_use]
    pub fn options(&self) -> StoreOptions {
        self.inner.options
    }

    /// Shallow-merges `partial` into the state, then notifies subscribers in
    /// subscription order with the new full state.
    ///
    /// With [`Reentrancy::Nested`] each subscriber receives the state as it is
    /// when its turn comes, so a write made by an earlier subscriber is
    /// visible to the later ones.
    pub fn set_state(&self, partial: impl Into<Partial>) {
        let Partial(partial) = partial.into();
        {
            let mut state = self.inner.state.borrow_mut();
            for (key, value) in partial {
                state.insert(key, value);
            }
        }

        let nested = self.inner.depth.get() > 0;
        if nested && self.inner.options.reentrancy == Reentrancy::Deferred {
            trace!("queueing re-entrant notification");
            self.inner.queued.set(self.inner.queued.get() + 1);
            return;
        }

        self.notify();

        if !nested {
            while self.inner.queued.get() > 0 {
                self.inner.queued.set(self.inner.queued.get() - 1);
                self.notify();
            }
        }
    }

    fn notify(&self) {
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        let round = self.state();
        trace!(subscribers = subscribers.len(), "notifying");

        // Nested writes reach later subscribers of the same round; deferred
        // rounds hand every subscriber the same copy.
        self.inner.depth.set(self.inner.depth.get() + 1);
        for subscriber in subscribers {
            match self.inner.options.reentrancy {
                Reentrancy::Nested => subscriber(&self.state()),
                Reentrancy::Deferred => subscriber(&round),
            }
        }
        self.inner.depth.set(self.inner.depth.get() - 1);
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// Returns a copy of one value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.state.borrow().get(key).cloned()
    }

    /// Appends `callback` to the subscriber list.
    ///
    /// The same closure may be subscribed several times; each call gets its
    /// own entry and its own [`Subscription`].
    pub fn subscribe(&self, callback: impl Fn(&State) + 'static) -> Subscription {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        debug!(id = id.0, "subscribed");
        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping it keeps the subscription alive; call [`Subscription::unsubscribe`]
/// to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// The identifier of the entry this handle removes.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the subscriber. Returns `false` when the store is gone or the
    /// entry was already removed.
    ///
    /// A round that is already running still calls the removed subscriber if
    /// it was part of that round's snapshot.
    pub fn unsubscribe(self) -> bool {
        let Some(store) = self.store.upgrade() else {
            return false;
        };
        let mut subscribers = store.subscribers.borrow_mut();
        let Some(index) = subscribers.iter().position(|(id, _)| *id == self.id) else {
            return false;
        };
        subscribers.remove(index);
        debug!(id = self.id.0, "unsubscribed");
        true
    }
}
