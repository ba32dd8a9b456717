//! Shallow values used for change detection and shared data.
//!
//! A [`Value`] is what a watch remembers about one field of a store's state.
//! Comparison is shallow: scalars and strings compare by value, while
//! [`Value::Ref`] compares by the identity of the `Arc` allocation it points
//! to, never by the contents behind it. A state that wants a field to count
//! as "unchanged" across a transition keeps the same `Arc` for it.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A shallow, cheaply clonable view of one keyed value.
#[derive(Clone, Default)]
pub enum Value {
    /// The key does not exist in the state.
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    /// Compared bit-for-bit, so `NaN` equals itself and `0.0` differs from `-0.0`.
    Float(f64),
    Str(Arc<str>),
    /// Any shared allocation, compared by address.
    Ref(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an `Arc` so it compares by identity.
    pub fn from_arc<T: Any + Send + Sync>(value: &Arc<T>) -> Self {
        Value::Ref(Arc::clone(value) as Arc<dyn Any + Send + Sync>)
    }

    /// Shallow equality: by value for scalars and strings, by address for refs.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast a [`Value::Ref`] back to its concrete type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Ref(r) => Arc::clone(r).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Absent"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Ref(r) => write!(f, "Ref({:p})", Arc::as_ptr(r) as *const ()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Absent)
    }
}

/// State whose fields can be addressed by key.
///
/// Watches name the keys they depend on; the engine reads those keys from
/// every committed state and compares them shallowly with the last snapshot.
/// Unknown keys should return [`Value::Absent`].
pub trait Keyed {
    fn value(&self, key: &str) -> Value;
}

/// An ordered key → [`Value`] mapping.
///
/// Used both for the subset of state a consumer watches and for the data it
/// shares with other consumers of the same store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueMap {
    entries: BTreeMap<String, Value>,
}

/// The keys a consumer watches, with the values it last rendered.
pub type Selection = ValueMap;

/// Ancillary data shared between consumers of one store.
pub type SharedData = ValueMap;

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Read `keys` from `state` into a new map.
    pub fn capture<S, I, K>(state: &S, keys: I) -> Self
    where
        S: Keyed + ?Sized,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let entries = keys
            .into_iter()
            .map(|key| {
                let key = key.into();
                let value = state.value(&key);
                (key, value)
            })
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shallow merge: keys in `other` overwrite, all other keys are kept.
    pub fn merge(&mut self, other: ValueMap) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        tags: Arc<Vec<String>>,
    }

    impl Keyed for Point {
        fn value(&self, key: &str) -> Value {
            match key {
                "x" => self.x.into(),
                "tags" => Value::from_arc(&self.tags),
                _ => Value::Absent,
            }
        }
    }

    #[test]
    fn refs_compare_by_identity() {
        let a = Arc::new(vec!["a".to_string()]);
        let b = Arc::new(vec!["a".to_string()]);

        assert!(Value::from_arc(&a).same(&Value::from_arc(&a)));
        assert!(!Value::from_arc(&a).same(&Value::from_arc(&b)));
    }

    #[test]
    fn scalars_compare_by_value() {
        assert_eq!(Value::from("B"), Value::from(String::from("B")));
        assert_ne!(Value::from(1), Value::from(true));
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_ne!(Value::from(0.0), Value::from(-0.0));
        assert!(Value::from(None::<bool>).is_absent());
    }

    #[test]
    fn capture_reads_keys_from_state() {
        let point = Point {
            x: 3,
            tags: Arc::new(vec![]),
        };
        let selection = Selection::capture(&point, ["x", "tags", "missing"]);

        assert_eq!(selection.len(), 3);
        assert_eq!(selection.get("x"), Some(&Value::Int(3)));
        assert!(selection.get("missing").is_some_and(Value::is_absent));
        assert_eq!(
            selection.get("tags").and_then(|v| v.downcast::<Vec<String>>()).map(|t| t.len()),
            Some(0)
        );
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut shared = SharedData::new().with("a", 1).with("b", 2);
        shared.merge(SharedData::new().with("b", 3).with("c", 4));

        let collected: Vec<_> = shared.iter().map(|(k, v)| (k, v.as_int())).collect();
        assert_eq!(collected, vec![("a", Some(1)), ("b", Some(3)), ("c", Some(4))]);
    }
}
