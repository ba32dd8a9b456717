use super::registry::Registry;
use crate::error::{ConfigurationError, Result};
use crate::store::{Handle, Reducer, StoreOptions};

/// Collects the arguments of a creation call.
///
/// Every argument is optional until [`create_or_attach`] runs, which reports
/// the first missing one as a [`ConfigurationError`].
///
/// [`create_or_attach`]: StoreBuilder::create_or_attach
pub struct StoreBuilder<R: Reducer> {
    name: Option<String>,
    transition: Option<R>,
    initial_state: Option<R::State>,
    options: StoreOptions,
}

impl<R: Reducer> StoreBuilder<R> {
    pub fn new() -> Self {
        Self {
            name: None,
            transition: None,
            initial_state: None,
            options: StoreOptions::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn transition(mut self, reducer: R) -> Self {
        self.transition = Some(reducer);
        self
    }

    pub fn initial_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.options.cache = cache;
        self
    }

    pub fn create_or_attach(self, registry: &Registry) -> Result<Handle<R>> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or(ConfigurationError::MissingName)?;
        let reducer = self.transition.ok_or(ConfigurationError::MissingTransition)?;
        let initial = self
            .initial_state
            .ok_or(ConfigurationError::MissingInitialState)?;
        registry.create_or_attach(name, reducer, initial, self.options)
    }
}

impl<R: Reducer> Default for StoreBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::value::{Keyed, Value};
    use std::convert::Infallible;

    struct Unit;

    impl Keyed for Unit {
        fn value(&self, _key: &str) -> Value {
            Value::Absent
        }
    }

    struct Keep;

    impl Reducer for Keep {
        type State = Unit;
        type Action = ();
        type Error = Infallible;

        fn reduce(&self, _state: &Unit, _action: ()) -> std::result::Result<Unit, Infallible> {
            Ok(Unit)
        }
    }

    #[test]
    fn reports_the_missing_argument() {
        let registry = Registry::new();

        let err = Registry::builder::<Keep>()
            .transition(Keep)
            .initial_state(Unit)
            .create_or_attach(&registry)
            .unwrap_err();
        assert_eq!(err, StoreError::Configuration(ConfigurationError::MissingName));

        let err = Registry::builder::<Keep>()
            .name("s")
            .initial_state(Unit)
            .create_or_attach(&registry)
            .unwrap_err();
        assert_eq!(err, StoreError::Configuration(ConfigurationError::MissingTransition));

        let err = Registry::builder::<Keep>()
            .name("s")
            .transition(Keep)
            .create_or_attach(&registry)
            .unwrap_err();
        assert_eq!(err, StoreError::Configuration(ConfigurationError::MissingInitialState));

        assert!(registry.is_empty());
    }

    #[test]
    fn complete_builder_creates_store() {
        let registry = Registry::new();
        let handle = Registry::builder::<Keep>()
            .name("s")
            .transition(Keep)
            .initial_state(Unit)
            .cache(false)
            .create_or_attach(&registry)
            .unwrap();

        assert!(handle.is_creator());
        assert!(registry.contains("s"));
    }
}
