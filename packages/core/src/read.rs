//! Read and MustRead.

use std::borrow::Cow;

use crate::accessor::Accessor;
use crate::error::Error;
use crate::indirect::indirect;
use crate::path::{IntoPath, Path};
use crate::value::Value;

impl Path {
    /// Resolve this path against `value`.
    ///
    /// The result borrows from `value` when it is stored there, and is owned
    /// when a getter or capability produced it.
    pub fn read<'v>(&self, value: &'v Value) -> Result<Cow<'v, Value>, Error> {
        read_steps(self.accessors(), value)
    }

    /// Like [`Path::read`], but any failure yields `Null`.
    pub fn must_read(&self, value: &Value) -> Value {
        match self.read(value) {
            Ok(found) => found.into_owned(),
            Err(e) => {
                log::debug!("must_read `{}`: {}", self, e);
                Value::Null
            }
        }
    }

    /// Like [`Path::read`], but a failure or a nil result yields `default`.
    pub fn must_read_or(&self, value: &Value, default: impl Into<Value>) -> Value {
        match self.read(value) {
            Ok(found) if !found.is_nil() => found.into_owned(),
            Ok(_) => default.into(),
            Err(e) => {
                log::debug!("must_read_or `{}`: {}", self, e);
                default.into()
            }
        }
    }
}

/// Parse `path` and read it from `value`.
///
/// ```rust
/// use propath_core::{read, Value};
///
/// let doc: Value = [("title", Value::from("S"))].into_iter().collect();
/// assert_eq!(read("title", &doc).unwrap().as_str(), Some("S"));
/// ```
pub fn read<'v>(path: impl IntoPath, value: &'v Value) -> Result<Cow<'v, Value>, Error> {
    path.into_path()?.read(value)
}

/// Parse `path` and read it from `value`; parse and traversal failures yield `Null`.
pub fn must_read(path: impl IntoPath, value: &Value) -> Value {
    match path.into_path() {
        Ok(path) => path.must_read(value),
        Err(e) => {
            log::debug!("must_read: {}", e);
            Value::Null
        }
    }
}

/// Parse `path` and read it from `value`; any failure or a nil result yields `default`.
pub fn must_read_or(path: impl IntoPath, value: &Value, default: impl Into<Value>) -> Value {
    match path.into_path() {
        Ok(path) => path.must_read_or(value, default),
        Err(e) => {
            log::debug!("must_read_or: {}", e);
            default.into()
        }
    }
}

pub(crate) fn read_steps<'v>(path: &[Accessor], value: &'v Value) -> Result<Cow<'v, Value>, Error> {
    let mut current = value;

    for (i, accessor) in path.iter().enumerate() {
        current = indirect(current);

        if let Some(reader) = current.path_reader() {
            let rest = Path::from(path[i..].to_vec());
            log::trace!("delegating `{}` to {}", rest, current.type_name());
            return reader
                .read_path(&rest)
                .map(Cow::Owned)
                .map_err(|e| e.within(&path[..i]));
        }

        let next = match accessor {
            Accessor::Field(name) => read_field(name, accessor, current),
            Accessor::Index(index) => read_index(*index, accessor, current),
        }
        .map_err(|e| e.anchored(&path[..=i]))?;

        match next {
            Cow::Borrowed(next) => current = next,
            Cow::Owned(next) => {
                let result = read_steps(&path[i + 1..], &next)
                    .map(|found| Cow::Owned(found.into_owned()))
                    .map_err(|e| e.within(&path[..=i]));
                return result;
            }
        }
    }

    Ok(Cow::Borrowed(current))
}

fn read_field<'v>(name: &str, accessor: &Accessor, value: &'v Value) -> Result<Cow<'v, Value>, Error> {
    if let Some(reader) = value.field_reader() {
        log::trace!("field `{}` through {} reader", name, value.type_name());
        return reader.read_field(name).map(Cow::Owned);
    }

    match value {
        Value::Map(map) => map
            .get(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| Error::key_not_found(name)),
        Value::Record(record) => {
            let ty = record.record_type();
            if let Some((i, _)) = ty.member(name) {
                return Ok(Cow::Borrowed(record.slot(i)));
            }
            if let Some(getter) = ty.getter(name, false) {
                log::trace!("field `{}` through getter `{}`", name, getter.name());
                let results = getter.call(record, Vec::new())?;
                return Ok(Cow::Owned(results.into_iter().next().unwrap_or_default()));
            }
            Err(Error::no_such_field(name, record.type_name()))
        }
        other => Err(Error::unsupported(accessor, other.type_name())),
    }
}

fn read_index<'v>(index: usize, accessor: &Accessor, value: &'v Value) -> Result<Cow<'v, Value>, Error> {
    if let Some(reader) = value.index_reader() {
        log::trace!("index [{}] through {} reader", index, value.type_name());
        return reader.read_index(index).map(Cow::Owned);
    }

    match value {
        Value::Array(items) => items
            .get(index)
            .map(Cow::Borrowed)
            .ok_or_else(|| Error::index_out_of_range(index, items.len())),
        other => Err(Error::unsupported(accessor, other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path, ErrorKind};

    fn doc() -> Value {
        let b: Value = vec![Value::from(1i64), Value::from(2i64)].into();
        let a: Value = [("b", b)].into_iter().collect();
        [("a", a), ("title", Value::from("S"))].into_iter().collect()
    }

    #[test]
    fn empty_path_is_the_value() {
        let v = doc();
        assert_eq!(Path::empty().read(&v).unwrap().as_ref(), &v);
    }

    #[test]
    fn borrowed_results_for_stored_values() {
        let v = doc();
        let found = path!("a.b[1]").read(&v).unwrap();
        assert!(matches!(found, Cow::Borrowed(_)));
        assert_eq!(found.as_i64(), Some(2));
    }

    #[test]
    fn out_of_range_reports_full_prefix() {
        let v = doc();
        let err = read("a.b[5]", &v).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 2, .. }));
        assert_eq!(err.context().unwrap().to_string(), "a.b[5]");
    }

    #[test]
    fn map_keys_are_exact() {
        let v = doc();
        let err = read("Title", &v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(err.context().unwrap(), &path!("Title"));
    }

    #[test]
    fn scalars_and_nil_are_unsupported_targets() {
        let v = doc();
        let err = read("title.x", &v).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget { accessor: "field", .. }));
        assert_eq!(err.context().unwrap().to_string(), "title.x");

        assert_eq!(
            read(0usize, &Value::Null).unwrap_err().kind(),
            ErrorKind::UnsupportedTarget
        );
        assert_eq!(
            read("x", &Value::Pointer(None)).unwrap_err().kind(),
            ErrorKind::UnsupportedTarget
        );
    }

    #[test]
    fn reads_see_through_pointers() {
        let inner: Value = [("k", Value::from("v"))].into_iter().collect();
        let v = Value::pointer(Value::pointer(inner));
        assert_eq!(read("k", &v).unwrap().as_str(), Some("v"));
    }

    #[test]
    fn must_read_swallows_failures() {
        let v = doc();
        assert_eq!(must_read("a.b[1]", &v), Value::Integer(2));
        assert_eq!(must_read("a.zzz", &v), Value::Null);
        assert_eq!(must_read("a..", &v), Value::Null);
        assert_eq!(must_read_or("a.zzz", &v, "dflt"), Value::from("dflt"));
        assert_eq!(must_read_or("a[", &v, 7i64), Value::Integer(7));
        assert_eq!(must_read_or("title", &v, "dflt"), Value::from("S"));
    }

    #[test]
    fn must_read_or_replaces_nil_results() {
        let v: Value = [("p", Value::Pointer(None)), ("n", Value::Null)]
            .into_iter()
            .collect();
        assert_eq!(must_read_or("p", &v, 1i64), Value::Integer(1));
        assert_eq!(must_read_or("n", &v, 1i64), Value::Integer(1));
        assert_eq!(must_read("p", &v), Value::Pointer(None));
    }
}
