//! The Value type - the live data a path is resolved against.
//!
//! A closed union of every shape the engine knows how to traverse: scalars,
//! ordered lists, string-keyed maps, pointer cells, declared records, and host
//! objects that opt into capabilities.

use std::collections::BTreeMap;

use crate::capability::Object;
use crate::record::Record;

/// A dynamically-shaped value that paths are read from and written into.
///
/// # Design Notes
///
/// - `Null` is the untyped placeholder. Writes replace it with a map or a list
///   on demand, which is how `a.b.c` builds nested structure from nothing.
/// - `Pointer` is the indirection layer; `Pointer(None)` is an empty reference.
///   Reads see through any number of pointer layers.
/// - Uses `BTreeMap` for deterministic ordering (stable rendering and comparison)
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The untyped placeholder / nil.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered sequence of values; grows when written past its end.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
    /// A reference cell, possibly empty.
    Pointer(Option<Box<Value>>),
    /// A record with declared members and accessors.
    Record(Record),
    /// A host value reached through its capabilities.
    Object(Box<dyn Object>),
}

impl Value {
    /// Create a null value.
    pub fn null() -> Self {
        Value::Null
    }

    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Create a bytes value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// Create a pointer cell holding `value`.
    pub fn pointer(value: impl Into<Value>) -> Self {
        Value::Pointer(Some(Box::new(value.into())))
    }

    /// Create an empty pointer.
    pub fn nil_pointer() -> Self {
        Value::Pointer(None)
    }

    /// Wrap a host object.
    pub fn object<T: Object>(object: T) -> Self {
        Value::Object(Box::new(object))
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is null or an empty pointer.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Null | Value::Pointer(None))
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this value is a record.
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The pointee of a non-empty pointer.
    pub fn deref(&self) -> Option<&Value> {
        match self {
            Value::Pointer(Some(cell)) => Some(cell),
            _ => None,
        }
    }

    /// Borrow the host object as its concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Mutably borrow the host object as its concrete type.
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        match self {
            Value::Object(object) => object.as_any_mut().downcast_mut::<T>(),
            _ => None,
        }
    }

    /// A short description of the runtime type, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Integer(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Pointer(None) => "nil pointer".to_string(),
            Value::Pointer(Some(cell)) => format!("*{}", cell.type_name()),
            Value::Record(record) => record.type_name().to_string(),
            Value::Object(object) => object.type_name().to_string(),
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
