//! The store registry.
//!
//! This module provides the name → store mapping, creation with its caching
//! policy, attachment, and teardown.

mod builder;
mod registry;

pub use builder::StoreBuilder;
pub use registry::Registry;
