use crate::value::Keyed;

/// The transition function of a store.
///
/// `reduce` must be pure: the next state depends only on the current state
/// and the action. Actions the reducer does not handle should return a state
/// equal to the current one rather than an error.
///
/// A failed transition leaves the previously committed state in place, and
/// the error is handed back to the dispatcher unchanged.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use stowage::{Keyed, Reducer, Value};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// impl Keyed for Counter {
///     fn value(&self, key: &str) -> Value {
///         match key {
///             "count" => self.count.into(),
///             _ => Value::Absent,
///         }
///     }
/// }
///
/// enum Action {
///     Add(i64),
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = Counter;
///     type Action = Action;
///     type Error = Infallible;
///
///     fn reduce(&self, state: &Counter, action: Action) -> Result<Counter, Infallible> {
///         match action {
///             Action::Add(n) => Ok(Counter { count: state.count + n }),
///         }
///     }
/// }
///
/// let next = CounterReducer.reduce(&Counter { count: 1 }, Action::Add(2)).unwrap();
/// assert_eq!(next.count, 3);
/// ```
pub trait Reducer: Send + Sync + 'static {
    type State: Keyed + Send + Sync + 'static;
    type Action;
    type Error;

    fn reduce(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error>;
}
