//! Declared slot types and the assignability rules built on them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::record::{Record, RecordType};
use crate::value::Value;

pub(crate) static ANY: ValueType = ValueType::Any;

/// The declared type of a storage location.
///
/// Plain maps and lists hold `Any` elements; record members, typed containers
/// and pointer cells narrow what may be stored. Writes are checked against the
/// type of the slot they land in, never coerced.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueType {
    Any,
    Bool,
    Integer,
    Float,
    String,
    Bytes,
    List(Box<ValueType>),
    Map(Box<ValueType>),
    Pointer(Box<ValueType>),
    Record(Arc<RecordType>),
    Object,
}

impl ValueType {
    /// A list of `elem`.
    pub fn list(elem: ValueType) -> Self {
        ValueType::List(Box::new(elem))
    }

    /// A string-keyed map of `elem`.
    pub fn map(elem: ValueType) -> Self {
        ValueType::Map(Box::new(elem))
    }

    /// A reference to `pointee`.
    pub fn pointer(pointee: ValueType) -> Self {
        ValueType::Pointer(Box::new(pointee))
    }

    /// A record of the given type.
    pub fn record(record_type: &Arc<RecordType>) -> Self {
        ValueType::Record(Arc::clone(record_type))
    }

    /// Check whether `value` can be stored as-is.
    ///
    /// `Null` is the nil of the reference-like types (`Any`, lists, maps,
    /// pointers, objects) and is rejected by scalars and records.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Any, _) => true,
            (
                ValueType::List(_)
                | ValueType::Map(_)
                | ValueType::Pointer(_)
                | ValueType::Object,
                Value::Null,
            ) => true,
            (ValueType::Bool, Value::Bool(_))
            | (ValueType::Integer, Value::Integer(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::String, Value::String(_))
            | (ValueType::Bytes, Value::Bytes(_))
            | (ValueType::Object, Value::Object(_))
            | (ValueType::Pointer(_), Value::Pointer(None)) => true,
            (ValueType::List(elem), Value::Array(items)) => items.iter().all(|v| elem.accepts(v)),
            (ValueType::Map(elem), Value::Map(map)) => map.values().all(|v| elem.accepts(v)),
            (ValueType::Pointer(pointee), Value::Pointer(Some(cell))) => pointee.accepts(cell),
            (ValueType::Record(expected), Value::Record(record)) => {
                record.type_name() == expected.name()
            }
            _ => false,
        }
    }

    /// Check whether `value` can be stored, possibly behind freshly allocated
    /// pointer cells.
    pub fn admits(&self, value: &Value) -> bool {
        if self.accepts(value) {
            return true;
        }
        match self {
            ValueType::Pointer(pointee) => pointee.admits(value),
            _ => false,
        }
    }

    /// Wrap `value` in as many pointer cells as this type needs.
    pub fn coerce(&self, value: Value) -> Result<Value, Error> {
        if self.accepts(&value) {
            return Ok(value);
        }
        match self {
            ValueType::Pointer(pointee) if pointee.admits(&value) => {
                Ok(Value::Pointer(Some(Box::new(pointee.coerce(value)?))))
            }
            _ => Err(Error::not_assignable(self.to_string(), value.type_name())),
        }
    }

    /// The value a fresh slot of this type holds.
    pub fn zero(&self) -> Value {
        match self {
            ValueType::Any | ValueType::Object => Value::Null,
            ValueType::Bool => Value::Bool(false),
            ValueType::Integer => Value::Integer(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Bytes => Value::Bytes(Vec::new()),
            ValueType::List(_) => Value::Array(Vec::new()),
            ValueType::Map(_) => Value::Map(BTreeMap::new()),
            ValueType::Pointer(_) => Value::Pointer(None),
            ValueType::Record(record_type) => Value::Record(Record::new(record_type)),
        }
    }

    /// The type behind one level of indirection; `Any` for non-pointers.
    pub fn pointee(&self) -> &ValueType {
        match self {
            ValueType::Pointer(pointee) => pointee,
            _ => &ANY,
        }
    }

    /// The element type of a list or map; `Any` otherwise.
    pub fn element(&self) -> &ValueType {
        match self {
            ValueType::List(elem) | ValueType::Map(elem) => elem,
            _ => &ANY,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => f.write_str("any"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::Integer => f.write_str("int"),
            ValueType::Float => f.write_str("float"),
            ValueType::String => f.write_str("string"),
            ValueType::Bytes => f.write_str("bytes"),
            ValueType::List(elem) => write!(f, "[]{}", elem),
            ValueType::Map(elem) => write!(f, "map[string]{}", elem),
            ValueType::Pointer(pointee) => write!(f, "*{}", pointee),
            ValueType::Record(record_type) => f.write_str(record_type.name()),
            ValueType::Object => f.write_str("object"),
        }
    }
}
