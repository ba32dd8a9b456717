use tracing::trace;

use super::watch::{Cause, NotifyConsumer, SubscriberId, Watch};
use crate::value::{Keyed, Selection};

/// The ordered set of watches registered on one store.
///
/// Order is first-registration order. A descendant always mounts after its
/// ancestor, so the notification pass reaches ancestors first even when the
/// host re-renders only part of the tree.
#[derive(Debug, Default)]
pub(crate) struct Subscriptions {
    watches: Vec<Watch>,
}

impl Subscriptions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declare or refresh a subscriber's watched keys.
    ///
    /// A subscriber keeps the position of its first registration.
    pub(crate) fn register(&mut self, subscriber: SubscriberId, selection: Selection) {
        match self.position(subscriber) {
            Some(index) => self.watches[index].redeclare(selection),
            None => self.watches.push(Watch::new(subscriber, selection)),
        }
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub(crate) fn unregister(&mut self, subscriber: SubscriberId) -> bool {
        match self.position(subscriber) {
            Some(index) => {
                self.watches.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, subscriber: SubscriberId) -> bool {
        self.position(subscriber).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.watches.len()
    }

    pub(crate) fn subscribers(&self) -> impl Iterator<Item = SubscriberId> + '_ {
        self.watches.iter().map(|w| w.subscriber)
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self, subscriber: SubscriberId) -> Option<&Selection> {
        self.watches
            .iter()
            .find(|w| w.subscriber == subscriber)
            .map(|w| &w.snapshot)
    }

    /// Run the notification pass against a freshly committed state.
    ///
    /// `owner` has already been told to re-render; its snapshot is refreshed
    /// but no second command is emitted for it.
    pub(crate) fn notify<S: Keyed + ?Sized>(
        &mut self,
        state: &S,
        owner: Option<SubscriberId>,
    ) -> Vec<NotifyConsumer> {
        let mut notifications = Vec::new();
        for watch in &mut self.watches {
            let changed = watch.diff(state);
            if changed.is_empty() {
                continue;
            }
            trace!(subscriber = %watch.subscriber, keys = ?changed, "watched keys changed");
            if Some(watch.subscriber) == owner {
                continue;
            }
            notifications.push(NotifyConsumer {
                subscriber: watch.subscriber,
                cause: Cause::Changed(changed),
            });
        }
        notifications
    }

    fn position(&self, subscriber: SubscriberId) -> Option<usize> {
        self.watches.iter().position(|w| w.subscriber == subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Doc {
        title: &'static str,
        body: &'static str,
    }

    impl Keyed for Doc {
        fn value(&self, key: &str) -> Value {
            match key {
                "title" => self.title.into(),
                "body" => self.body.into(),
                _ => Value::Absent,
            }
        }
    }

    fn ids(notifications: &[NotifyConsumer]) -> Vec<usize> {
        notifications.iter().map(|n| n.subscriber.get()).collect()
    }

    #[test]
    fn notifies_in_registration_order() {
        let mut subs = Subscriptions::new();
        for id in [1, 2, 3] {
            subs.register(SubscriberId(id), Selection::new().with("title", "a"));
        }

        let notified = subs.notify(&Doc { title: "b", body: "" }, None);
        assert_eq!(ids(&notified), vec![1, 2, 3]);
    }

    #[test]
    fn reregistration_keeps_position() {
        let mut subs = Subscriptions::new();
        for id in [1, 2, 3] {
            subs.register(SubscriberId(id), Selection::new().with("title", "a"));
        }
        subs.register(SubscriberId(1), Selection::new().with("body", ""));

        let order: Vec<_> = subs.subscribers().map(SubscriberId::get).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(subs.snapshot(SubscriberId(1)).is_some_and(|s| s.contains_key("body")));
    }

    #[test]
    fn unregister_then_register_goes_last() {
        let mut subs = Subscriptions::new();
        for id in [1, 2] {
            subs.register(SubscriberId(id), Selection::new().with("title", "a"));
        }
        subs.unregister(SubscriberId(1));
        subs.register(SubscriberId(1), Selection::new().with("title", "a"));

        let order: Vec<_> = subs.subscribers().map(SubscriberId::get).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn unchanged_keys_do_not_notify_twice() {
        let mut subs = Subscriptions::new();
        subs.register(SubscriberId(7), Selection::new().with("title", "a"));

        let doc = Doc { title: "b", body: "x" };
        assert_eq!(subs.notify(&doc, None).len(), 1);
        assert!(subs.notify(&doc, None).is_empty());
        assert!(subs
            .notify(&Doc { title: "b", body: "y" }, None)
            .is_empty());
    }

    #[test]
    fn owner_is_refreshed_but_not_reported() {
        let mut subs = Subscriptions::new();
        subs.register(SubscriberId(1), Selection::new().with("body", ""));
        subs.register(SubscriberId(2), Selection::new().with("body", ""));

        let notified = subs.notify(&Doc { title: "", body: "x" }, Some(SubscriberId(1)));
        assert_eq!(ids(&notified), vec![2]);
        assert_eq!(
            subs.snapshot(SubscriberId(1)).and_then(|s| s.get("body")),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn unregister_removes_watch() {
        let mut subs = Subscriptions::new();
        subs.register(SubscriberId(1), Selection::new().with("body", ""));

        assert!(subs.unregister(SubscriberId(1)));
        assert!(!subs.unregister(SubscriberId(1)));
        assert!(!subs.contains(SubscriberId(1)));
        assert_eq!(subs.len(), 0);
    }
}
