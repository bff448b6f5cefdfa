//! Property-based test generators using proptest.

use crate::fixtures::{RawModel, Reading, User};
use ormkit_core::Value;
use proptest::prelude::*;

/// Strategy for column and table identifiers.
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for arbitrary scalar values.
///
/// Floats are kept finite so values compare equal to themselves.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e12f64..1.0e12).prop_map(Value::Float),
        ".{0,24}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Bytes),
    ]
}

/// Strategy for [`User`] records.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (
        any::<i64>(),
        ".{0,24}",
        prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
        0i64..130,
        any::<bool>(),
    )
        .prop_map(|(id, name, email, age, active)| User {
            id,
            name,
            email,
            age,
            active,
        })
}

/// Strategy for [`Reading`] records.
pub fn reading_strategy() -> impl Strategy<Value = Reading> {
    (
        any::<i64>(),
        "[a-z]{1,12}",
        -1.0e9f64..1.0e9,
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(id, sensor, value, payload)| Reading {
            id,
            sensor,
            value,
            payload,
        })
}

/// Strategy for models whose column and value counts differ.
pub fn mismatched_model_strategy() -> impl Strategy<Value = RawModel> {
    (
        identifier_strategy(),
        prop::collection::vec(identifier_strategy(), 0..6),
        prop::collection::vec(value_strategy(), 0..6),
    )
        .prop_filter("counts must differ", |(_, cols, vals)| {
            cols.len() != vals.len()
        })
        .prop_map(|(table, cols, vals)| {
            let cols: Vec<&str> = cols.iter().map(String::as_str).collect();
            RawModel::new(table, &cols, vals)
        })
}
