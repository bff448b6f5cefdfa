//! The model capability and addressable slots.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// A record type that can be written to and read from an adapter.
///
/// The core never inspects a record's fields. Everything it needs comes
/// through these four methods.
///
/// # Invariants
///
/// `columns()`, `values()` and `pointers()` are parallel: index `i` in each
/// refers to the same logical field. `columns()` defines the write order and
/// the order in which adapters deliver row values for reads.
///
/// # Example
///
/// ```rust
/// use ormkit_core::{Model, Slot, Value};
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Model for User {
///     fn table_name(&self) -> &str {
///         "users"
///     }
///
///     fn columns(&self) -> Vec<&str> {
///         vec!["id", "name"]
///     }
///
///     fn values(&self) -> Vec<Value> {
///         vec![self.id.into(), self.name.clone().into()]
///     }
///
///     fn pointers(&mut self) -> Vec<&mut dyn Slot> {
///         vec![&mut self.id, &mut self.name]
///     }
/// }
/// ```
pub trait Model {
    /// Returns the storage location for this record.
    fn table_name(&self) -> &str;

    /// Returns the column names in write order.
    fn columns(&self) -> Vec<&str>;

    /// Returns the current field values, parallel to [`Model::columns`].
    fn values(&self) -> Vec<Value>;

    /// Returns writable slots for each field, parallel to [`Model::columns`].
    fn pointers(&mut self) -> Vec<&mut dyn Slot>;
}

/// An addressable write target for one field.
///
/// Scanners hand each slot exactly one [`Value`] from the current row.
pub trait Slot {
    /// Stores `value` into the slot.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::TypeMismatch`] if the value cannot be represented
    /// by the slot's type.
    fn assign(&mut self, value: Value) -> OrmResult<()>;

    /// Returns the name of the type held by the slot.
    fn type_name(&self) -> &'static str;
}

impl Slot for Value {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        *self = value;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "value"
    }
}

impl Slot for i64 {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        match value {
            Value::Integer(i) => {
                *self = i;
                Ok(())
            }
            other => Err(OrmError::type_mismatch("i64", other.type_name())),
        }
    }

    fn type_name(&self) -> &'static str {
        "i64"
    }
}

macro_rules! narrow_int_slot {
    ($($t:ty => $name:literal),*) => {
        $(
            impl Slot for $t {
                fn assign(&mut self, value: Value) -> OrmResult<()> {
                    match value {
                        Value::Integer(i) => {
                            *self = <$t>::try_from(i)
                                .map_err(|_| OrmError::type_mismatch($name, "integer"))?;
                            Ok(())
                        }
                        other => Err(OrmError::type_mismatch($name, other.type_name())),
                    }
                }

                fn type_name(&self) -> &'static str {
                    $name
                }
            }
        )*
    };
}

narrow_int_slot!(i32 => "i32", u32 => "u32", u64 => "u64");

impl Slot for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        match value {
            Value::Float(f) => *self = f,
            Value::Integer(i) => *self = i as f64,
            other => return Err(OrmError::type_mismatch("f64", other.type_name())),
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "f64"
    }
}

/// Narrowing must stay finite; NaN and infinities pass through.
impl Slot for f32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        let narrowed = match value {
            Value::Float(f) => {
                let n = f as f32;
                if f.is_finite() && !n.is_finite() {
                    return Err(OrmError::type_mismatch("f32", "float"));
                }
                n
            }
            Value::Integer(i) => i as f32,
            other => return Err(OrmError::type_mismatch("f32", other.type_name())),
        };
        *self = narrowed;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "f32"
    }
}

impl Slot for bool {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        match value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            other => Err(OrmError::type_mismatch("bool", other.type_name())),
        }
    }

    fn type_name(&self) -> &'static str {
        "bool"
    }
}

impl Slot for String {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        match value {
            Value::Text(s) => {
                *self = s;
                Ok(())
            }
            other => Err(OrmError::type_mismatch("string", other.type_name())),
        }
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

impl Slot for Vec<u8> {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        match value {
            Value::Bytes(b) => {
                *self = b;
                Ok(())
            }
            other => Err(OrmError::type_mismatch("bytes", other.type_name())),
        }
    }

    fn type_name(&self) -> &'static str {
        "bytes"
    }
}

/// `Null` clears the option; anything else is assigned to a fresh `T`.
impl<T: Slot + Default> Slot for Option<T> {
    fn assign(&mut self, value: Value) -> OrmResult<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.assign(value)?;
        *self = Some(inner);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "option"
    }
}

/// Assigns `values` to `slots` pairwise.
///
/// Adapters call this from their [`crate::Scanner`] and [`crate::Rows`]
/// implementations.
///
/// # Errors
///
/// Returns [`OrmError::SlotCount`] if the lengths differ, otherwise the
/// first slot's assignment error.
pub fn assign_slots(slots: &mut [&mut dyn Slot], values: Vec<Value>) -> OrmResult<()> {
    if slots.len() != values.len() {
        return Err(OrmError::SlotCount {
            expected: values.len(),
            actual: slots.len(),
        });
    }
    for (slot, value) in slots.iter_mut().zip(values) {
        slot.assign(value)?;
    }
    Ok(())
}
