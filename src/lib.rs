//! # Stowage
//!
//! Named shared stores for component trees that re-render on demand.
//!
//! Many independently rendered consumers share one store by name, change it
//! through a pure [`Reducer`], and only the consumers whose declared keys
//! actually changed are asked to re-render.
//!
//! ## Stores
//!
//! - [`Registry`] - name → store mapping; creation, attachment, teardown
//! - [`Handle`] - one consumer's connection: state, dispatch, watches, sharing
//! - [`Commit`] - the ordered [`NotifyConsumer`] commands a dispatch produces
//!
//! ## Change detection
//!
//! - [`Keyed`] - state addressable by key
//! - [`Value`] - shallow value of one key, compared by identity
//! - [`Selection`] - the keys a consumer watches, with their last values
//!
//! ## Shared data
//!
//! Consumers publish non-reactive data with [`Handle::share_data`] and an
//! actions object with [`Handle::share_actions`]. Both are cleared when the
//! creating consumer detaches.

pub mod error;
pub mod registry;
pub mod share;
pub mod store;
pub mod subscription;
pub mod value;

// Re-export main types for convenience
pub use error::{ConfigurationError, LookupError, Result, StoreError};
pub use registry::{Registry, StoreBuilder};
pub use share::ActionsHandle;
pub use store::{Commit, Dispatcher, Handle, Reducer, StoreOptions};
pub use subscription::{Cause, NotifyConsumer, SubscriberId};
pub use value::{Keyed, Selection, SharedData, Value, ValueMap};
