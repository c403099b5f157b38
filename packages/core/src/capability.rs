//! Opt-in traversal capabilities.
//!
//! A value that wants to own how a field, an index, or an entire remaining
//! path is resolved implements one of these traits. The engine always asks
//! for a capability before falling back to the built-in map, list and record
//! rules, so a capability shadows the native behaviour of its value.

use std::any::Any;
use std::fmt;

use crate::error::Error;
use crate::path::Path;
use crate::record::Record;
use crate::value::Value;

/// Resolves a single field step.
pub trait FieldReader {
    fn read_field(&self, name: &str) -> Result<Value, Error>;
}

/// Mutates a single field step. A field writer is always a field reader.
pub trait FieldWriter: FieldReader {
    fn write_field(&mut self, name: &str, value: Value) -> Result<(), Error>;
}

/// Resolves a single index step.
pub trait IndexReader {
    fn read_index(&self, index: usize) -> Result<Value, Error>;
}

/// Mutates a single index step. An index writer is always an index reader.
pub trait IndexWriter: IndexReader {
    fn write_index(&mut self, index: usize, value: Value) -> Result<(), Error>;
}

/// Resolves the whole remaining path in one call.
pub trait PathReader {
    fn read_path(&self, path: &Path) -> Result<Value, Error>;
}

/// Mutates the whole remaining path in one call.
pub trait PathWriter {
    fn write_path(&mut self, path: &Path, value: Value) -> Result<(), Error>;
}

/// Object-safe plumbing for [`Object`]; implemented for every
/// `Object + Clone + PartialEq` type.
pub trait ObjectBase {
    fn clone_object(&self) -> Box<dyn Object>;
    fn eq_object(&self, other: &dyn Object) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Object + Clone + PartialEq> ObjectBase for T {
    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A host value stored in [`Value::Object`].
///
/// Each probe returns `Some(self)` for the capabilities the type implements.
///
/// ```rust
/// use propath_core::{Error, FieldReader, Object, Value};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Env;
///
/// impl FieldReader for Env {
///     fn read_field(&self, name: &str) -> Result<Value, Error> {
///         Ok(Value::from(name.to_uppercase()))
///     }
/// }
///
/// impl Object for Env {
///     fn field_reader(&self) -> Option<&dyn FieldReader> {
///         Some(self)
///     }
/// }
///
/// let env = Value::object(Env);
/// assert_eq!(propath_core::read("home", &env).unwrap().as_str(), Some("HOME"));
/// ```
pub trait Object: ObjectBase + fmt::Debug + Send + Sync + 'static {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn field_reader(&self) -> Option<&dyn FieldReader> {
        None
    }

    fn field_writer(&mut self) -> Option<&mut dyn FieldWriter> {
        None
    }

    fn index_reader(&self) -> Option<&dyn IndexReader> {
        None
    }

    fn index_writer(&mut self) -> Option<&mut dyn IndexWriter> {
        None
    }

    fn path_reader(&self) -> Option<&dyn PathReader> {
        None
    }

    fn path_writer(&mut self) -> Option<&mut dyn PathWriter> {
        None
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        (**self).clone_object()
    }
}

impl PartialEq for dyn Object {
    fn eq(&self, other: &dyn Object) -> bool {
        self.eq_object(other)
    }
}

// Records become capabilities through the hooks registered on their type.

impl FieldReader for Record {
    fn read_field(&self, name: &str) -> Result<Value, Error> {
        match &self.record_type().hooks.read_field {
            Some(hook) => hook(self, name),
            None => Err(Error::no_such_field(name, self.type_name())),
        }
    }
}

impl FieldWriter for Record {
    fn write_field(&mut self, name: &str, value: Value) -> Result<(), Error> {
        let ty = std::sync::Arc::clone(self.record_type());
        match &ty.hooks.write_field {
            Some(hook) => hook(self, name, value),
            None => Err(Error::not_addressable(format!(
                "{} has no field writer",
                self.type_name()
            ))),
        }
    }
}

impl IndexReader for Record {
    fn read_index(&self, index: usize) -> Result<Value, Error> {
        match &self.record_type().hooks.read_index {
            Some(hook) => hook(self, index),
            None => Err(Error::index_out_of_range(index, 0)),
        }
    }
}

impl IndexWriter for Record {
    fn write_index(&mut self, index: usize, value: Value) -> Result<(), Error> {
        let ty = std::sync::Arc::clone(self.record_type());
        match &ty.hooks.write_index {
            Some(hook) => hook(self, index, value),
            None => Err(Error::not_addressable(format!(
                "{} has no index writer",
                self.type_name()
            ))),
        }
    }
}

impl PathReader for Record {
    fn read_path(&self, path: &Path) -> Result<Value, Error> {
        match &self.record_type().hooks.read_path {
            Some(hook) => hook(self, path),
            None => Err(Error::custom(format!("{} has no path reader", self.type_name()))),
        }
    }
}

impl PathWriter for Record {
    fn write_path(&mut self, path: &Path, value: Value) -> Result<(), Error> {
        let ty = std::sync::Arc::clone(self.record_type());
        match &ty.hooks.write_path {
            Some(hook) => hook(self, path, value),
            None => Err(Error::not_addressable(format!(
                "{} has no path writer",
                self.type_name()
            ))),
        }
    }
}

/// Capability probes on values. Only objects and hooked records answer.
impl Value {
    pub fn field_reader(&self) -> Option<&dyn FieldReader> {
        match self {
            Value::Object(object) => object.field_reader(),
            Value::Record(record) if record.record_type().hooks.read_field.is_some() => {
                Some(record as &dyn FieldReader)
            }
            _ => None,
        }
    }

    pub fn field_writer(&mut self) -> Option<&mut dyn FieldWriter> {
        match self {
            Value::Object(object) => object.field_writer(),
            Value::Record(record) => {
                let hooks = &record.record_type().hooks;
                if hooks.read_field.is_some() && hooks.write_field.is_some() {
                    Some(record as &mut dyn FieldWriter)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn index_reader(&self) -> Option<&dyn IndexReader> {
        match self {
            Value::Object(object) => object.index_reader(),
            Value::Record(record) if record.record_type().hooks.read_index.is_some() => {
                Some(record as &dyn IndexReader)
            }
            _ => None,
        }
    }

    pub fn index_writer(&mut self) -> Option<&mut dyn IndexWriter> {
        match self {
            Value::Object(object) => object.index_writer(),
            Value::Record(record) => {
                let hooks = &record.record_type().hooks;
                if hooks.read_index.is_some() && hooks.write_index.is_some() {
                    Some(record as &mut dyn IndexWriter)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn path_reader(&self) -> Option<&dyn PathReader> {
        match self {
            Value::Object(object) => object.path_reader(),
            Value::Record(record) if record.record_type().hooks.read_path.is_some() => {
                Some(record as &dyn PathReader)
            }
            _ => None,
        }
    }

    pub fn path_writer(&mut self) -> Option<&mut dyn PathWriter> {
        match self {
            Value::Object(object) => object.path_writer(),
            Value::Record(record) if record.record_type().hooks.write_path.is_some() => {
                Some(record as &mut dyn PathWriter)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use crate::types::ValueType;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter(i64);

    impl IndexReader for Counter {
        fn read_index(&self, index: usize) -> Result<Value, Error> {
            Ok(Value::Integer(self.0 + index as i64))
        }
    }

    impl Object for Counter {
        fn index_reader(&self) -> Option<&dyn IndexReader> {
            Some(self)
        }
    }

    #[test]
    fn objects_clone_compare_and_downcast() {
        let mut v = Value::object(Counter(1));
        let copy = v.clone();
        assert_eq!(v, copy);
        assert_ne!(v, Value::object(Counter(2)));

        v.downcast_mut::<Counter>().unwrap().0 = 5;
        assert_eq!(v.downcast_ref::<Counter>(), Some(&Counter(5)));
        assert_ne!(v, copy);
    }

    #[test]
    fn object_probes_follow_the_impl() {
        let mut v = Value::object(Counter(10));
        assert!(v.field_reader().is_none());
        assert!(v.field_writer().is_none());
        let reader = v.index_reader().unwrap();
        assert_eq!(reader.read_index(2).unwrap(), Value::Integer(12));
        assert!(v.type_name().ends_with("Counter"));
    }

    #[test]
    fn records_answer_probes_only_with_hooks() {
        let plain = RecordType::builder("Plain")
            .field("A", ValueType::Any)
            .build();
        let mut v = Value::from(plain.instantiate());
        assert!(v.field_reader().is_none());
        assert!(v.path_writer().is_none());

        // A writer hook without the matching reader is not a writer.
        let half = RecordType::builder("Half")
            .write_field_with(|_, _, _| Ok(()))
            .build();
        let mut v = Value::from(half.instantiate());
        assert!(v.field_writer().is_none());

        let hooked = RecordType::builder("Hooked")
            .read_field_with(|_, name| Ok(Value::from(name)))
            .write_field_with(|_, _, _| Ok(()))
            .build();
        let mut v = Value::from(hooked.instantiate());
        assert_eq!(
            v.field_reader().unwrap().read_field("x").unwrap(),
            Value::from("x")
        );
        assert!(v.field_writer().is_some());
    }
}
