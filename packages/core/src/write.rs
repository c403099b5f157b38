//! Write, with auto-vivification and list growth.
//!
//! Every step reports back whether it mutated its target in place or built a
//! replacement the caller has to store. Replacements are only stored once the
//! deeper write succeeded, so a failing write never leaves a half-built
//! container behind in its parent.

use std::slice;
use std::sync::Arc;

use crate::accessor::Accessor;
use crate::error::Error;
use crate::indirect::{assign_into, vivify};
use crate::path::{IntoPath, Path};
use crate::record::{Record, RecordType, SetterLookup};
use crate::types::{ValueType, ANY};
use crate::value::Value;

/// What a write step did to its target.
#[derive(Debug, PartialEq)]
pub(crate) enum Stored {
    /// The target was mutated where it lives.
    InPlace,
    /// The target must be replaced by this value.
    Replaced(Value),
}

impl Stored {
    fn settle(self, slot: &mut Value) {
        if let Stored::Replaced(value) = self {
            *slot = value;
        }
    }

    fn resolve(self, current: Value) -> Value {
        match self {
            Stored::InPlace => current,
            Stored::Replaced(value) => value,
        }
    }
}

impl Path {
    /// Store `new` at this path inside `target`.
    ///
    /// Missing intermediate maps and lists are created, lists grow to reach
    /// the index being written, and empty pointers get fresh cells.
    pub fn write(&self, target: &mut Value, new: impl Into<Value>) -> Result<(), Error> {
        write_steps(self.accessors(), target, &ANY, new.into())?.settle(target);
        Ok(())
    }
}

/// Parse `path` and write `new` at it inside `target`.
///
/// ```rust
/// use propath_core::{read, write, Value};
///
/// let mut v = Value::Null;
/// write("a.b[1]", &mut v, "q").unwrap();
/// assert_eq!(read("a.b[1]", &v).unwrap().as_str(), Some("q"));
/// assert_eq!(read("a.b[0]", &v).unwrap().into_owned(), Value::Null);
/// ```
pub fn write(path: impl IntoPath, target: &mut Value, new: impl Into<Value>) -> Result<(), Error> {
    path.into_path()?.write(target, new)
}

pub(crate) fn write_steps(
    path: &[Accessor],
    target: &mut Value,
    ty: &ValueType,
    new: Value,
) -> Result<Stored, Error> {
    let Some((accessor, rest)) = path.split_first() else {
        assign_into(target, ty, new)?;
        return Ok(Stored::InPlace);
    };

    if let Value::Pointer(cell) = target {
        let pointee = ty.pointee();
        return match cell {
            Some(inner) => {
                write_steps(path, inner, pointee, new)?.settle(inner);
                Ok(Stored::InPlace)
            }
            None => {
                log::trace!("allocating pointer cell for `{}`", Path::from(path.to_vec()));
                let mut fresh = pointee.zero();
                write_steps(path, &mut fresh, pointee, new)?.settle(&mut fresh);
                Ok(Stored::Replaced(Value::Pointer(Some(Box::new(fresh)))))
            }
        };
    }

    if let Some(writer) = target.path_writer() {
        let remaining = Path::from(path.to_vec());
        log::trace!("delegating write of `{}`", remaining);
        writer.write_path(&remaining, new)?;
        return Ok(Stored::InPlace);
    }

    if target.is_null() {
        if let Some(mut fresh) = vivify(ty, accessor) {
            log::trace!("vivifying {} for `{}`", fresh.type_name(), accessor);
            write_steps(path, &mut fresh, ty, new)?.settle(&mut fresh);
            return Ok(Stored::Replaced(fresh));
        }
    }

    let step = slice::from_ref(accessor);
    match accessor {
        Accessor::Field(name) => write_field(name, step, rest, target, ty, new),
        Accessor::Index(index) => write_index(*index, step, rest, target, ty, new),
    }
}

fn write_field(
    name: &str,
    step: &[Accessor],
    rest: &[Accessor],
    target: &mut Value,
    ty: &ValueType,
    new: Value,
) -> Result<Stored, Error> {
    if target.field_reader().is_some() {
        let type_name = target.type_name();
        let Some(writer) = target.field_writer() else {
            return Err(
                Error::not_addressable(format!("{} has no field writer", type_name)).within(step),
            );
        };

        if rest.is_empty() {
            log::trace!("field `{}` through {} writer", name, type_name);
            writer.write_field(name, new).map_err(|e| e.anchored(step))?;
            return Ok(Stored::InPlace);
        }

        let mut current = match writer.read_field(name) {
            Ok(current) => current,
            Err(e) if e.is_absent() => Value::Null,
            Err(e) => return Err(e.anchored(step)),
        };
        let stored = write_steps(rest, &mut current, &ANY, new).map_err(|e| e.within(step))?;
        writer
            .write_field(name, stored.resolve(current))
            .map_err(|e| e.anchored(step))?;
        return Ok(Stored::InPlace);
    }

    match target {
        Value::Map(map) => {
            let elem = ty.element();
            match map.get_mut(name) {
                Some(slot) => write_steps(rest, slot, elem, new)
                    .map_err(|e| e.within(step))?
                    .settle(slot),
                None => {
                    let mut slot = elem.zero();
                    write_steps(rest, &mut slot, elem, new)
                        .map_err(|e| e.within(step))?
                        .settle(&mut slot);
                    map.insert(name.to_string(), slot);
                }
            }
            Ok(Stored::InPlace)
        }
        Value::Record(record) => write_record_field(name, step, rest, record, new),
        other => Err(Error::unsupported(&step[0], other.type_name()).within(step)),
    }
}

fn write_record_field(
    name: &str,
    step: &[Accessor],
    rest: &[Accessor],
    record: &mut Record,
    new: Value,
) -> Result<Stored, Error> {
    let rt = Arc::clone(record.record_type());

    if let Some((i, decl)) = rt.member(name) {
        let slot = record.slot_mut(i);
        write_steps(rest, slot, &decl.ty, new)
            .map_err(|e| e.within(step))?
            .settle(slot);
        return Ok(Stored::InPlace);
    }

    if rest.is_empty() {
        if call_setter(&rt, record, name, step, new)? {
            return Ok(Stored::InPlace);
        }
        return Err(missing_member(&rt, name).within(step));
    }

    let Some(getter) = rt.getter(name, true) else {
        return Err(missing_member(&rt, name).within(step));
    };
    log::trace!("field `{}` through getter `{}`", name, getter.name());
    let mut current = getter
        .call_mut(record, Vec::new())
        .map_err(|e| e.anchored(step))?
        .into_iter()
        .next()
        .unwrap_or_default();
    let declared = getter.results().first().unwrap_or(&ANY);
    let stored = write_steps(rest, &mut current, declared, new).map_err(|e| e.within(step))?;

    if call_setter(&rt, record, name, step, stored.resolve(current))? {
        return Ok(Stored::InPlace);
    }
    Err(Error::not_addressable(format!(
        "`{}` of {} has a getter but no setter",
        name,
        rt.name()
    ))
    .within(step))
}

/// Call the setter for `name`; `Ok(false)` when there is none.
fn call_setter(
    rt: &RecordType,
    record: &mut Record,
    name: &str,
    step: &[Accessor],
    new: Value,
) -> Result<bool, Error> {
    match rt.setter(name, &new) {
        SetterLookup::Found(method) => {
            log::trace!("field `{}` through setter `{}`", name, method.name());
            let param = method.params().first().unwrap_or(&ANY);
            let arg = param.coerce(new).map_err(|e| e.within(step))?;
            method
                .call_mut(record, vec![arg])
                .map_err(|e| e.anchored(step))?;
            Ok(true)
        }
        SetterLookup::Rejected(param) => {
            Err(Error::not_assignable(param.to_string(), new.type_name()).within(step))
        }
        SetterLookup::Missing => Ok(false),
    }
}

fn missing_member(rt: &RecordType, name: &str) -> Error {
    if rt.has_private(name) {
        Error::not_addressable(format!("field `{}` of {} is private", name, rt.name()))
    } else {
        Error::no_such_field(name, rt.name())
    }
}

fn write_index(
    index: usize,
    step: &[Accessor],
    rest: &[Accessor],
    target: &mut Value,
    ty: &ValueType,
    new: Value,
) -> Result<Stored, Error> {
    if target.index_reader().is_some() {
        let type_name = target.type_name();
        let Some(writer) = target.index_writer() else {
            return Err(
                Error::not_addressable(format!("{} has no index writer", type_name)).within(step),
            );
        };

        if rest.is_empty() {
            log::trace!("index [{}] through {} writer", index, type_name);
            writer.write_index(index, new).map_err(|e| e.anchored(step))?;
            return Ok(Stored::InPlace);
        }

        let mut current = match writer.read_index(index) {
            Ok(current) => current,
            Err(e) if e.is_absent() => Value::Null,
            Err(e) => return Err(e.anchored(step)),
        };
        let stored = write_steps(rest, &mut current, &ANY, new).map_err(|e| e.within(step))?;
        writer
            .write_index(index, stored.resolve(current))
            .map_err(|e| e.anchored(step))?;
        return Ok(Stored::InPlace);
    }

    match target {
        Value::Array(items) => {
            let elem = ty.element();
            if index < items.len() {
                let slot = &mut items[index];
                write_steps(rest, slot, elem, new)
                    .map_err(|e| e.within(step))?
                    .settle(slot);
                return Ok(Stored::InPlace);
            }

            // Lengths that cannot be represented or allocated are out of range.
            let out_of_range = |len| Error::index_out_of_range(index, len).within(step);
            let Some(grown) = index.checked_add(1) else {
                return Err(out_of_range(items.len()));
            };
            if items.try_reserve(grown - items.len()).is_err() {
                return Err(out_of_range(items.len()));
            }

            let mut slot = elem.zero();
            write_steps(rest, &mut slot, elem, new)
                .map_err(|e| e.within(step))?
                .settle(&mut slot);
            log::trace!("growing list from {} to {}", items.len(), grown);
            items.resize(grown, elem.zero());
            items[index] = slot;
            Ok(Stored::InPlace)
        }
        other => Err(Error::unsupported(&step[0], other.type_name()).within(step)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{must_read, path, read, ErrorKind};

    fn map(pairs: Vec<(&str, Value)>) -> Value {
        pairs.into_iter().collect()
    }

    #[test]
    fn vivifies_nested_maps_and_keeps_siblings() {
        let mut v = Value::Null;
        write("a.b.c", &mut v, "x").unwrap();
        write("a.d", &mut v, "y").unwrap();
        assert_eq!(
            v,
            map(vec![(
                "a",
                map(vec![("b", map(vec![("c", Value::from("x"))])), ("d", Value::from("y"))])
            )])
        );
    }

    #[test]
    fn vivifies_lists_from_null() {
        let mut v = Value::Null;
        write("a[2]", &mut v, "q").unwrap();
        assert_eq!(
            v,
            map(vec![("a", Value::from(vec![Value::Null, Value::Null, Value::from("q")]))])
        );
    }

    #[test]
    fn root_index_write_replaces_element() {
        let mut list = Value::from(vec!["x", "y"]);
        write(0usize, &mut list, "z").unwrap();
        assert_eq!(list, Value::from(vec!["z", "y"]));
    }

    #[test]
    fn unreachable_lengths_fail_instead_of_growing() {
        let mut list = Value::from(vec![1i64]);
        for expression in ["[18446744073709551615]", "[1152921504606846976]"] {
            let err = write(expression, &mut list, 2i64).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
            assert_eq!(err.context().unwrap().to_string(), expression);
        }
        assert_eq!(list, Value::from(vec![1i64]));

        let mut v = Value::Null;
        let err = write("a[18446744073709551615]", &mut v, 2i64).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange { index: usize::MAX, len: 0, .. }
        ));
        assert_eq!(err.context().unwrap().to_string(), "a[18446744073709551615]");
        assert!(v.is_null());
    }

    #[test]
    fn growth_preserves_existing_elements() {
        let mut list = Value::from(vec![1i64, 2]);
        write(4usize, &mut list, 5i64).unwrap();
        assert_eq!(
            list,
            Value::from(vec![
                Value::from(1i64),
                Value::from(2i64),
                Value::Null,
                Value::Null,
                Value::from(5i64),
            ])
        );
    }

    #[test]
    fn nested_growth_inside_list() {
        let mut v = Value::Null;
        write("m[1][1]", &mut v, true).unwrap();
        assert_eq!(must_read("m[1][1]", &v), Value::Bool(true));
        assert_eq!(must_read("m[0]", &v), Value::Null);
    }

    #[test]
    fn empty_path_replaces_root() {
        let mut v = Value::from(1i64);
        Path::empty().write(&mut v, "s").unwrap();
        assert_eq!(v, Value::from("s"));
    }

    #[test]
    fn scalar_targets_are_unsupported() {
        let mut v = map(vec![("n", Value::from(1i64))]);
        let err = write("n.x", &mut v, 2i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedTarget);
        assert_eq!(err.context().unwrap(), &path!("n.x"));

        let err = write("n[0]", &mut v, 2i64).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTarget { accessor: "index", .. }));
    }

    #[test]
    fn writes_through_pointers() {
        let mut v = map(vec![("p", Value::pointer(Value::map()))]);
        write("p.k", &mut v, 1i64).unwrap();
        assert_eq!(read("p.k", &v).unwrap().as_i64(), Some(1));
        assert!(matches!(read("p", &v).unwrap().as_ref(), Value::Pointer(Some(_))));

        let mut v = map(vec![("p", Value::Pointer(None))]);
        write("p.k", &mut v, 1i64).unwrap();
        assert_eq!(
            v,
            map(vec![("p", Value::pointer(map(vec![("k", Value::from(1i64))])))])
        );
    }

    #[test]
    fn typed_containers_reject_wrong_elements() {
        use crate::RecordType;

        let ty = RecordType::builder("Bag")
            .field("Counts", ValueType::map(ValueType::Integer))
            .build();
        let mut v = Value::from(ty.instantiate());
        write("counts.a", &mut v, 1i64).unwrap();
        let err = write("counts.b", &mut v, "one").unwrap_err();
        assert!(matches!(err, Error::NotAssignable { ref expected, .. } if expected == "int"));
        assert_eq!(err.context().unwrap(), &path!("counts.b"));
        // The failed key was never inserted.
        assert!(read("counts.b", &v).is_err());
    }

    #[test]
    fn failed_deep_write_leaves_parent_untouched() {
        use crate::RecordType;

        let leaf = RecordType::builder("Leaf")
            .field("N", ValueType::Integer)
            .build();
        let root = RecordType::builder("Root")
            .field("Items", ValueType::list(ValueType::record(&leaf)))
            .build();
        let mut v = Value::from(root.instantiate());
        let before = v.clone();

        let err = write("items[3].n", &mut v, "not a number").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAssignable);
        assert_eq!(err.context().unwrap().to_string(), "items[3].n");
        assert_eq!(v, before);

        write("items[1].n", &mut v, 7i64).unwrap();
        assert_eq!(must_read("items[1].n", &v), Value::Integer(7));
        assert_eq!(must_read("items[0].n", &v), Value::Integer(0));
    }
}
