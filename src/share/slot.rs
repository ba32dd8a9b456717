use std::any::{type_name, Any};
use std::sync::Arc;

use tracing::warn;

use crate::value::SharedData;

/// Type-erased actions object published by a consumer.
pub type ActionsHandle = Arc<dyn Any + Send + Sync>;

/// Shared data and actions of one store; both absent until contributed.
#[derive(Default)]
pub(crate) struct SharedSlot {
    data: Option<SharedData>,
    actions: Option<ActionsHandle>,
}

impl SharedSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Merge `partial` into the shared data, last write wins per key.
    pub(crate) fn merge(&mut self, partial: SharedData) {
        match &mut self.data {
            Some(data) => data.merge(partial),
            None => self.data = Some(partial),
        }
    }

    /// Replace the actions handle, returning the previous one.
    pub(crate) fn set_actions(&mut self, actions: ActionsHandle) -> Option<ActionsHandle> {
        self.actions.replace(actions)
    }

    pub(crate) fn data(&self) -> Option<&SharedData> {
        self.data.as_ref()
    }

    /// Return the actions handle downcast to `T`.
    pub(crate) fn actions<T: Any + Send + Sync>(&self, store: &str) -> Option<Arc<T>> {
        let actions = Arc::clone(self.actions.as_ref()?);
        match actions.downcast::<T>() {
            Ok(actions) => Some(actions),
            Err(_) => {
                warn!(store, expected = type_name::<T>(), "actions handle has a different type");
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn has_actions(&self) -> bool {
        self.actions.is_some()
    }

    /// Empty both slots, returning what they held.
    pub(crate) fn take(&mut self) -> SharedSlot {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Actions {
        name: &'static str,
    }

    #[test]
    fn data_accumulates_and_actions_stay_separate() {
        let mut slot = SharedSlot::new();
        assert!(slot.data().is_none());

        slot.merge(SharedData::new().with("a", 1));
        slot.merge(SharedData::new().with("b", 2));
        let actions = Arc::new(Actions { name: "todo" });
        slot.set_actions(actions.clone());

        let data = slot.data().cloned().unwrap_or_default();
        assert_eq!(data, SharedData::new().with("a", 1).with("b", 2));
        assert!(!data.contains_key("actions"));

        let read = slot.actions::<Actions>("s").map(|a| a.name);
        assert_eq!(read, Some("todo"));
        assert!(slot.actions::<String>("s").is_none());
    }

    #[test]
    fn take_resets_both_slots() {
        let mut slot = SharedSlot::new();
        slot.merge(SharedData::new().with("a", 1));
        slot.set_actions(Arc::new(()));

        let old = slot.take();

        assert!(old.has_actions());
        assert!(slot.data().is_none());
        assert!(!slot.has_actions());
    }
}
