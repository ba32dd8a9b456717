/// Options recognized when creating a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Keep the state when the creating consumer is rebuilt after a detach.
    ///
    /// With `false`, re-creating a store that has no attached consumers left
    /// resets it to the initial state (and transition) passed to that call.
    pub cache: bool,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { cache: true }
    }
}
