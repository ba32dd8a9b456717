use std::any::type_name;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::builder::StoreBuilder;
use crate::error::{ConfigurationError, LookupError, Result, StoreError};
use crate::store::{ErasedStore, Handle, Reducer, Role, Store, StoreOptions};
use crate::subscription::SubscriberId;

/// Mapping from store name to store.
///
/// A registry is an ordinary value owned by the composition root and handed
/// to whoever needs it; independent registries share nothing. Stores live in
/// the registry until [`clear`](Registry::clear) or drop, so a creating
/// consumer that is torn down and rebuilt finds its store again.
///
/// # Examples
///
/// ```
/// # use std::convert::Infallible;
/// # use stowage::{Keyed, Reducer, Value};
/// # struct Count(i64);
/// # impl Keyed for Count {
/// #     fn value(&self, key: &str) -> Value {
/// #         if key == "count" { self.0.into() } else { Value::Absent }
/// #     }
/// # }
/// # struct Add;
/// # impl Reducer for Add {
/// #     type State = Count;
/// #     type Action = i64;
/// #     type Error = Infallible;
/// #     fn reduce(&self, s: &Count, n: i64) -> Result<Count, Infallible> { Ok(Count(s.0 + n)) }
/// # }
/// use stowage::{Registry, StoreOptions};
///
/// let registry = Registry::new();
/// let owner = registry
///     .create_or_attach("counter", Add, Count(0), StoreOptions::default())
///     .unwrap();
/// owner.dispatch(5).unwrap();
///
/// let reader = registry.attach::<Add>("counter").unwrap();
/// assert_eq!(reader.state().0, 5);
/// ```
pub struct Registry {
    next_id: AtomicUsize,
    stores: RwLock<HashMap<String, Arc<dyn ErasedStore>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Start building a creation call whose arguments are checked on use.
    pub fn builder<R: Reducer>() -> StoreBuilder<R> {
        StoreBuilder::new()
    }

    /// Create the store `name`, or re-attach to it as its creating consumer.
    ///
    /// A new store starts from `initial`. An existing one keeps its state
    /// when `options.cache` is set; otherwise it is reset to `initial` and
    /// `reducer`, provided no consumer is attached to it at this point.
    pub fn create_or_attach<R: Reducer>(
        &self,
        name: impl Into<String>,
        reducer: R,
        initial: R::State,
        options: StoreOptions,
    ) -> Result<Handle<R>> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigurationError::MissingName.into());
        }

        let store = {
            let mut stores = self.stores.write();
            match stores.get(&name) {
                Some(existing) => {
                    let store = downcast::<R>(&name, existing)?;
                    store.reinitialize(reducer, initial, options.cache);
                    store
                }
                None => {
                    let store = Arc::new(Store::new(Arc::from(name.as_str()), reducer, initial));
                    stores.insert(name.clone(), Arc::clone(&store) as Arc<dyn ErasedStore>);
                    debug!(store = %name, cache = options.cache, "created store");
                    store
                }
            }
        };

        Ok(Handle::connect(store, self.next_subscriber(), Role::Creator))
    }

    /// Attach to an existing store as a non-creating consumer.
    pub fn attach<R: Reducer>(&self, name: &str) -> Result<Handle<R>> {
        if name.is_empty() {
            return Err(LookupError::MissingName.into());
        }

        let store = {
            let stores = self.stores.read();
            let existing = stores
                .get(name)
                .ok_or_else(|| LookupError::NotCreated(name.to_string()))?;
            downcast::<R>(name, existing)?
        };

        Ok(Handle::connect(store, self.next_subscriber(), Role::Attached))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.read().contains_key(name)
    }

    /// Names of all stores, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.stores.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }

    /// Remove every store.
    ///
    /// Side channels are cleared first so that actions objects holding
    /// dispatchers do not keep their store alive. Handles that are still
    /// around keep working on their store, which is simply no longer
    /// reachable by name.
    pub fn clear(&self) {
        let stores: Vec<_> = self.stores.write().drain().map(|(_, store)| store).collect();
        for store in &stores {
            store.teardown();
            debug!(store = store.name(), "removed store");
        }
    }

    fn next_subscriber(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.clear();
    }
}

fn downcast<R: Reducer>(name: &str, store: &Arc<dyn ErasedStore>) -> Result<Arc<Store<R>>> {
    Arc::clone(store)
        .into_any()
        .downcast::<Store<R>>()
        .map_err(|_| StoreError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<R>(),
        })
}
