use std::fmt;

use crate::value::{Keyed, Selection, Value};

/// Identity of one consumer instance.
///
/// Generated once per handle and stable for that handle's lifetime; it doubles
/// as the subscriber id of the handle's watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub(crate) usize);

impl SubscriberId {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a consumer is asked to re-render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cause {
    /// The consumer created the store, and the store committed a new state.
    Owner,
    /// Watched keys changed identity in the committed state.
    Changed(Vec<String>),
}

/// Command for the host framework: re-render this consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyConsumer {
    pub subscriber: SubscriberId,
    pub cause: Cause,
}

/// A consumer's declared dependency on part of a store's state.
#[derive(Debug)]
pub(crate) struct Watch {
    pub(crate) subscriber: SubscriberId,
    pub(crate) snapshot: Selection,
}

impl Watch {
    pub(crate) fn new(subscriber: SubscriberId, snapshot: Selection) -> Self {
        Self {
            subscriber,
            snapshot,
        }
    }

    /// Re-declare the watched keys.
    ///
    /// Keys that stay declared keep their committed baseline; new keys take
    /// the values the consumer rendered with.
    pub(crate) fn redeclare(&mut self, selection: Selection) {
        let mut next = selection;
        for (key, value) in next.iter_mut() {
            if let Some(previous) = self.snapshot.get(key) {
                *value = previous.clone();
            }
        }
        self.snapshot = next;
    }

    /// Compare the snapshot with `state`, refreshing every changed key.
    ///
    /// Returns the changed keys, empty when nothing the watch declared moved.
    pub(crate) fn diff<S: Keyed + ?Sized>(&mut self, state: &S) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, seen) in self.snapshot.iter_mut() {
            let current: Value = state.value(key);
            if !seen.same(&current) {
                *seen = current;
                changed.push(key.to_string());
            }
        }
        changed
    }
}
