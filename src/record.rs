//! Immutable value records used for props, state, actions and reducer state.

use core::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::{Dispatcher, Error, Result};

/// A mutable name → value mapping used to build records and to describe deltas.
pub type Fields = IndexMap<String, Value>;

/// Build a [`Fields`] map from `name => value` pairs.
///
/// ```rust
/// use hive_ui::{fields, Value};
///
/// let delta = fields! { "width" => 500, "title" => "Impedance" };
/// assert_eq!(delta["width"], Value::Int(500));
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        fields
    }};
}

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Record(Record),
    /// A bound action, see [`Dispatcher`].
    Dispatch(Dispatcher),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_dispatcher(&self) -> Option<&Dispatcher> {
        match self {
            Value::Dispatch(dispatcher) => Some(dispatcher),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Record(Record::from(fields))
    }
}

impl From<Dispatcher> for Value {
    fn from(dispatcher: Dispatcher) -> Self {
        Value::Dispatch(dispatcher)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Value::Record(record) => write!(f, "{record}"),
            Value::Dispatch(dispatcher) => write!(f, "{dispatcher:?}"),
        }
    }
}

/// An immutable set of named fields.
///
/// The field names are fixed when the record is built. "Changing" a record
/// means building a new one with [`replace`](Self::replace) (existing names
/// only) or [`merged`](Self::merged) (existing or new names). Clones share
/// their storage.
///
/// Equality ignores field order.
///
/// ```rust
/// use hive_ui::{fields, Record, Value};
///
/// let props = Record::from(fields! { "x" => 1, "y" => 2 });
/// let moved = props.replace(&fields! { "x" => 5 }).unwrap();
///
/// assert_eq!(moved.get("x"), Some(&Value::Int(5)));
/// assert_eq!(moved.get("y"), Some(&Value::Int(2)));
/// assert!(props.replace(&fields! { "z" => 0 }).is_err());
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Record {
    fields: Rc<Fields>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn to_fields(&self) -> Fields {
        (*self.fields).clone()
    }

    /// A new record with the named fields overwritten and the rest retained.
    ///
    /// Fails with [`Error::UnknownField`] if `partial` names a field this
    /// record does not have.
    pub fn replace(&self, partial: &Fields) -> Result<Record> {
        let mut fields = self.to_fields();
        for (name, value) in partial {
            match fields.get_mut(name) {
                Some(slot) => *slot = value.clone(),
                None => return Err(Error::UnknownField(name.clone())),
            }
        }
        Ok(Record::from(fields))
    }

    /// A new record with every field of `extra` set, adding names as needed.
    pub fn merged(&self, extra: &Fields) -> Record {
        let mut fields = self.to_fields();
        for (name, value) in extra {
            fields.insert(name.clone(), value.clone());
        }
        Record::from(fields)
    }

    /// Split `delta` into the fields this record lacks and the ones it has.
    pub(crate) fn partition(&self, delta: &Fields) -> (Fields, Fields) {
        delta
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .partition(|(name, _)| !self.contains(name))
    }

    /// The part of `delta` whose names this record has.
    pub(crate) fn intersect(&self, delta: &Fields) -> Fields {
        delta
            .iter()
            .filter(|(name, _)| self.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self {
            fields: Rc::new(fields),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect::<Fields>()
            .into()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Record(")?;
        for (index, (name, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
