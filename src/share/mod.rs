//! The non-reactive side channel of a store.
//!
//! Consumers publish ancillary data and a single actions handle here so that
//! every other consumer of the same store can read them. Nothing in this slot
//! participates in change detection.

mod slot;

pub(crate) use slot::SharedSlot;
pub use slot::ActionsHandle;
