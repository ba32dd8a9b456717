//! Watches and the per-store notification pass.
//!
//! Consumers declare the keys they render from; after every commit the
//! manager compares those keys shallowly against the new state and returns a
//! [`NotifyConsumer`] command for each consumer whose keys moved, in render
//! order.

mod manager;
mod watch;

pub(crate) use manager::Subscriptions;
pub use watch::{Cause, NotifyConsumer, SubscriberId};
