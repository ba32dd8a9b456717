//! Named stores and the dispatch/commit pipeline.
//!
//! A store pairs a typed state with its [`Reducer`]. Consumers reach it
//! through a [`Handle`]; dispatching through any handle commits the new
//! state and returns a [`Commit`] naming the consumers to re-render.

mod commit;
mod handle;
mod options;
mod reducer;
mod store;

pub use commit::Commit;
pub use handle::{Dispatcher, Handle};
pub use options::StoreOptions;
pub use reducer::Reducer;
pub(crate) use store::{ErasedStore, Role, Store};
