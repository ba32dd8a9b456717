use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::commit::Commit;
use super::reducer::Reducer;
use super::store::{Role, Store};
use crate::subscription::SubscriberId;
use crate::value::{Selection, SharedData};

/// A consumer's live connection to a named store.
///
/// One handle stands for one consumer instance: its [`SubscriberId`] is
/// fixed for the handle's lifetime and identifies the consumer in every
/// [`Commit`]. Dropping the handle detaches the consumer, which removes its
/// watch and, for the creating consumer, clears the store's shared data and
/// actions.
///
/// # Example
///
/// ```
/// # use std::convert::Infallible;
/// # use stowage::{Keyed, Reducer, Value};
/// # #[derive(Clone)]
/// # struct Flags { loading: bool, value: String }
/// # impl Keyed for Flags {
/// #     fn value(&self, key: &str) -> Value {
/// #         match key {
/// #             "loading" => self.loading.into(),
/// #             "value" => self.value.as_str().into(),
/// #             _ => Value::Absent,
/// #         }
/// #     }
/// # }
/// # enum Action { SetValue(&'static str), SetLoading(bool) }
/// # struct FlagsReducer;
/// # impl Reducer for FlagsReducer {
/// #     type State = Flags;
/// #     type Action = Action;
/// #     type Error = Infallible;
/// #     fn reduce(&self, s: &Flags, a: Action) -> Result<Flags, Infallible> {
/// #         Ok(match a {
/// #             Action::SetValue(v) => Flags { value: v.into(), ..s.clone() },
/// #             Action::SetLoading(l) => Flags { loading: l, ..s.clone() },
/// #         })
/// #     }
/// # }
/// use stowage::{Registry, StoreOptions};
///
/// let registry = Registry::new();
/// let owner = registry
///     .create_or_attach("s1", FlagsReducer, Flags { loading: false, value: "A".into() }, StoreOptions::default())
///     .unwrap();
/// let spinner = registry.attach::<FlagsReducer>("s1").unwrap();
/// spinner.watch(["loading"]);
///
/// let commit = owner.dispatch(Action::SetValue("B")).unwrap();
/// assert!(!commit.notified(spinner.id()));
///
/// let commit = owner.dispatch(Action::SetLoading(true)).unwrap();
/// assert!(commit.notified(spinner.id()));
/// ```
pub struct Handle<R: Reducer> {
    store: Arc<Store<R>>,
    id: SubscriberId,
    role: Role,
}

impl<R: Reducer> Handle<R> {
    pub(crate) fn connect(store: Arc<Store<R>>, id: SubscriberId, role: Role) -> Self {
        store.connect(id, role);
        Self { store, id, role }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// This consumer's id, used as its subscriber id.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether this handle came from a creation call.
    pub fn is_creator(&self) -> bool {
        self.role == Role::Creator
    }

    /// The committed state. Reading it registers no dependency.
    pub fn state(&self) -> Arc<R::State> {
        self.store.state()
    }

    /// Apply `action` through the store's transition and commit the result.
    ///
    /// The returned commit lists the consumers the host must re-render. A
    /// transition error is returned as-is and nothing is committed.
    pub fn dispatch(&self, action: R::Action) -> Result<Commit, R::Error> {
        self.store.dispatch(action)
    }

    /// A clonable dispatch-only capability for this store.
    pub fn dispatcher(&self) -> Dispatcher<R> {
        Dispatcher {
            store: Arc::clone(&self.store),
        }
    }

    /// Declare the keys this consumer rendered from, with their values.
    ///
    /// Call on every render. Registration never notifies anyone by itself.
    pub fn register_watch(&self, selection: Selection) {
        self.store.register_watch(self.id, selection);
    }

    /// Register a watch on `keys`, reading their values from the current state.
    pub fn watch<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let state = self.store.state();
        self.register_watch(Selection::capture(&*state, keys));
    }

    /// Stop watching. Returns whether a watch was registered.
    pub fn unregister_watch(&self) -> bool {
        self.store.unregister_watch(self.id)
    }

    pub fn is_watching(&self) -> bool {
        self.store.is_watching(self.id)
    }

    /// Subscribers of this store in notification order.
    pub fn watch_order(&self) -> Vec<SubscriberId> {
        self.store.watch_order()
    }

    /// Number of consumers currently attached to this store.
    pub fn attached(&self) -> usize {
        self.store.attached()
    }

    /// Merge `partial` into the store's shared data, last write wins per key.
    pub fn share_data(&self, partial: SharedData) {
        self.store.share_data(partial);
    }

    /// Publish the store's actions object, replacing any previous one.
    pub fn share_actions<T: Any + Send + Sync>(&self, actions: Arc<T>) {
        self.store.share_actions(actions);
    }

    /// Shared data, or `None` until someone shares.
    pub fn shared(&self) -> Option<SharedData> {
        self.store.shared()
    }

    /// The shared actions object, if one of type `T` has been published.
    pub fn actions<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.store.actions::<T>()
    }

    /// Detach this consumer. Same as dropping the handle.
    pub fn detach(self) {}
}

impl<R: Reducer> Drop for Handle<R> {
    fn drop(&mut self) {
        self.store.disconnect(self.id, self.role);
    }
}

impl<R: Reducer> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("store", &self.store.name())
            .field("id", &self.id)
            .field("role", &self.role)
            .finish()
    }
}

/// Dispatch-only access to a store, for actions objects and callbacks.
///
/// Holding a dispatcher does not count as an attached consumer.
pub struct Dispatcher<R: Reducer> {
    store: Arc<Store<R>>,
}

impl<R: Reducer> Dispatcher<R> {
    pub fn dispatch(&self, action: R::Action) -> Result<Commit, R::Error> {
        self.store.dispatch(action)
    }

    pub fn state(&self) -> Arc<R::State> {
        self.store.state()
    }
}

impl<R: Reducer> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Reducer> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store", &self.store.name())
            .finish()
    }
}
