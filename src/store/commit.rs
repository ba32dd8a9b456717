use crate::subscription::{NotifyConsumer, SubscriberId};

/// The outcome of one dispatch: which consumers must re-render, in order.
///
/// The first entry is the creating consumer (if it is still attached),
/// followed by every watcher whose declared keys changed, in first-render order.
/// The engine never re-renders anything itself; the host applies these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    notifications: Vec<NotifyConsumer>,
}

impl Commit {
    pub(crate) fn new(notifications: Vec<NotifyConsumer>) -> Self {
        Self { notifications }
    }

    pub fn notifications(&self) -> &[NotifyConsumer] {
        &self.notifications
    }

    /// Consumers to re-render, in notification order.
    pub fn consumers(&self) -> impl Iterator<Item = SubscriberId> + '_ {
        self.notifications.iter().map(|n| n.subscriber)
    }

    pub fn notified(&self, subscriber: SubscriberId) -> bool {
        self.notifications.iter().any(|n| n.subscriber == subscriber)
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Fold a later commit into this one for hosts that re-render once per
    /// batch. A consumer keeps the position of its first notification.
    pub fn merge(&mut self, later: Commit) {
        for notification in later.notifications {
            if !self.notified(notification.subscriber) {
                self.notifications.push(notification);
            }
        }
    }
}

impl IntoIterator for Commit {
    type Item = NotifyConsumer;
    type IntoIter = std::vec::IntoIter<NotifyConsumer>;

    fn into_iter(self) -> Self::IntoIter {
        self.notifications.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Cause;

    fn notify(id: usize) -> NotifyConsumer {
        NotifyConsumer {
            subscriber: SubscriberId(id),
            cause: Cause::Owner,
        }
    }

    #[test]
    fn merge_keeps_first_position() {
        let mut first = Commit::new(vec![notify(1), notify(2)]);
        first.merge(Commit::new(vec![notify(3), notify(1)]));

        let order: Vec<_> = first.consumers().map(SubscriberId::get).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
