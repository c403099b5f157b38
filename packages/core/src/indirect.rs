//! Indirection and assignment helpers shared by reads and writes.

use crate::accessor::Accessor;
use crate::error::Error;
use crate::types::ValueType;
use crate::value::Value;

/// Follow pointer cells to the first value that is not a bound pointer.
///
/// Nested pointers are unwrapped all the way down; an empty pointer is
/// returned as-is so the caller can report it.
pub(crate) fn indirect(mut value: &Value) -> &Value {
    while let Value::Pointer(Some(cell)) = value {
        value = cell;
    }
    value
}

/// Store `new` into a slot of declared type `ty`.
///
/// A value the slot accepts replaces it. A pointer slot whose pointee admits
/// the value stores into the existing cell, or into a fresh cell that is bound
/// only once the inner assignment succeeded.
pub(crate) fn assign_into(slot: &mut Value, ty: &ValueType, new: Value) -> Result<(), Error> {
    if ty.accepts(&new) {
        *slot = new;
        return Ok(());
    }

    if let ValueType::Pointer(pointee) = ty {
        if pointee.admits(&new) {
            if let Value::Pointer(Some(cell)) = slot {
                return assign_into(cell, pointee, new);
            }
            let mut cell = pointee.zero();
            assign_into(&mut cell, pointee, new)?;
            *slot = Value::Pointer(Some(Box::new(cell)));
            return Ok(());
        }
    }

    Err(Error::not_assignable(ty.to_string(), new.type_name()))
}

/// The container that replaces a null slot of type `ty` before `accessor`
/// is applied to it, or `None` when the slot cannot hold one.
pub(crate) fn vivify(ty: &ValueType, accessor: &Accessor) -> Option<Value> {
    match (ty, accessor) {
        (ValueType::Any, Accessor::Field(_)) => Some(Value::map()),
        (ValueType::Any, Accessor::Index(_)) => Some(Value::array()),
        (ValueType::Map(_) | ValueType::List(_) | ValueType::Record(_) | ValueType::Pointer(_), _) => {
            Some(ty.zero())
        }
        _ => None,
    }
}
