use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::commit::Commit;
use super::reducer::Reducer;
use crate::share::{ActionsHandle, SharedSlot};
use crate::subscription::{Cause, NotifyConsumer, SubscriberId, Subscriptions};
use crate::value::{Selection, SharedData};

/// How a handle is connected to its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Creator,
    Attached,
}

/// One named store: state, transition, side channel and watches.
///
/// Every mutation goes through a single lock, so a dispatch, its commit and
/// its notification pass are never interleaved with another dispatch.
pub(crate) struct Store<R: Reducer> {
    name: Arc<str>,
    inner: Mutex<Inner<R>>,
}

struct Inner<R: Reducer> {
    reducer: R,
    state: Arc<R::State>,
    slot: SharedSlot,
    subscriptions: Subscriptions,
    creator: Option<SubscriberId>,
    attached: usize,
}

impl<R: Reducer> Store<R> {
    pub(crate) fn new(name: Arc<str>, reducer: R, initial: R::State) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                reducer,
                state: Arc::new(initial),
                slot: SharedSlot::new(),
                subscriptions: Subscriptions::new(),
                creator: None,
                attached: 0,
            }),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Apply a creation call to a store that already exists.
    ///
    /// State is only reset when caching is off and nobody is attached.
    pub(crate) fn reinitialize(&self, reducer: R, initial: R::State, cache: bool) {
        let mut inner = self.inner.lock();
        if cache {
            debug!(store = %self.name, "reusing cached state");
            return;
        }
        if inner.attached > 0 {
            debug!(store = %self.name, attached = inner.attached, "consumers still attached, keeping state");
            return;
        }
        inner.reducer = reducer;
        inner.state = Arc::new(initial);
        debug!(store = %self.name, "reset state to the supplied initial value");
    }

    pub(crate) fn connect(&self, subscriber: SubscriberId, role: Role) {
        let mut inner = self.inner.lock();
        inner.attached += 1;
        if role == Role::Creator {
            inner.creator = Some(subscriber);
        }
        debug!(store = %self.name, %subscriber, ?role, attached = inner.attached, "consumer attached");
    }

    pub(crate) fn disconnect(&self, subscriber: SubscriberId, role: Role) {
        let mut inner = self.inner.lock();
        inner.subscriptions.unregister(subscriber);
        inner.attached = inner.attached.saturating_sub(1);
        let mut cleared = None;
        if role == Role::Creator && inner.creator == Some(subscriber) {
            inner.creator = None;
            cleared = Some(inner.slot.take());
            debug!(store = %self.name, %subscriber, "creator detached, cleared shared data and actions");
        }
        debug!(store = %self.name, %subscriber, attached = inner.attached, "consumer detached");
        // Shared values may own handles to this store; drop them unlocked.
        drop(inner);
        drop(cleared);
    }

    pub(crate) fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.inner.lock().state)
    }

    /// Run the transition, commit, then run the notification pass.
    pub(crate) fn dispatch(&self, action: R::Action) -> Result<Commit, R::Error> {
        let mut guard = self.inner.lock();
        let next = guard.reducer.reduce(&guard.state, action)?;

        let inner = &mut *guard;
        inner.state = Arc::new(next);

        let mut notifications = Vec::with_capacity(inner.subscriptions.len() + 1);
        if let Some(owner) = inner.creator {
            notifications.push(NotifyConsumer {
                subscriber: owner,
                cause: Cause::Owner,
            });
        }
        notifications.extend(inner.subscriptions.notify(&*inner.state, inner.creator));

        trace!(
            store = %self.name,
            watches = inner.subscriptions.len(),
            notified = notifications.len(),
            "committed state"
        );
        Ok(Commit::new(notifications))
    }

    pub(crate) fn register_watch(&self, subscriber: SubscriberId, selection: Selection) {
        self.inner.lock().subscriptions.register(subscriber, selection);
    }

    pub(crate) fn unregister_watch(&self, subscriber: SubscriberId) -> bool {
        self.inner.lock().subscriptions.unregister(subscriber)
    }

    pub(crate) fn is_watching(&self, subscriber: SubscriberId) -> bool {
        self.inner.lock().subscriptions.contains(subscriber)
    }

    pub(crate) fn watch_order(&self) -> Vec<SubscriberId> {
        self.inner.lock().subscriptions.subscribers().collect()
    }

    pub(crate) fn attached(&self) -> usize {
        self.inner.lock().attached
    }

    pub(crate) fn share_data(&self, partial: SharedData) {
        self.inner.lock().slot.merge(partial);
    }

    pub(crate) fn share_actions(&self, actions: ActionsHandle) {
        let previous = self.inner.lock().slot.set_actions(actions);
        drop(previous);
    }

    pub(crate) fn shared(&self) -> Option<SharedData> {
        self.inner.lock().slot.data().cloned()
    }

    pub(crate) fn actions<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.lock().slot.actions::<T>(&self.name)
    }
}

/// Type-erased view of a store, as kept by the registry.
pub(crate) trait ErasedStore: Send + Sync {
    fn name(&self) -> &str;

    /// Drop the side channel so actions objects holding dispatchers are freed.
    fn teardown(&self);

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<R: Reducer> ErasedStore for Store<R> {
    fn name(&self) -> &str {
        Store::name(self)
    }

    fn teardown(&self) {
        let cleared = self.inner.lock().slot.take();
        drop(cleared);
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
