//! Error types for store creation and lookup.

use thiserror::Error;

/// A required argument was missing when creating a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("a store name is required to create a store")]
    MissingName,

    #[error("a transition function is required to create a store")]
    MissingTransition,

    #[error("an initial state is required to create a store")]
    MissingInitialState,
}

/// An attach request could not be resolved to a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("a store name is required to attach to a store")]
    MissingName,

    #[error("store '{0}' has not been created yet; create it with a transition and initial state first")]
    NotCreated(String),
}

/// Errors that can occur in registry operations.
///
/// Transition failures are not part of this type: they are returned from
/// `dispatch` as the reducer's own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("store '{name}' is not driven by reducer {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_argument() {
        let err = StoreError::from(ConfigurationError::MissingInitialState);
        assert!(err.to_string().contains("initial state"));

        let err = StoreError::from(LookupError::NotCreated("todos".into()));
        assert!(err.to_string().contains("'todos'"));
    }
}
