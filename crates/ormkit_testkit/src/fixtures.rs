//! Fixture models.
//!
//! Provides ready-made record types covering the common slot kinds, plus a
//! free-form [`RawModel`] for exercising validation edge cases.

use ormkit_core::{Model, Slot, Value};

/// A typical record with text, integer, boolean and nullable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional contact address.
    pub email: Option<String>,
    /// Age in years.
    pub age: i64,
    /// Whether the account is active.
    pub active: bool,
}

impl User {
    /// Creates an active user without an email.
    pub fn new(id: i64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            age,
            active: true,
        }
    }

    /// Returns the user's row as an adapter would deliver it.
    pub fn row(&self) -> Vec<Value> {
        self.values()
    }
}

impl Model for User {
    fn table_name(&self) -> &str {
        "users"
    }

    fn columns(&self) -> Vec<&str> {
        vec!["id", "name", "email", "age", "active"]
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.email.clone().into(),
            self.age.into(),
            self.active.into(),
        ]
    }

    fn pointers(&mut self) -> Vec<&mut dyn Slot> {
        vec![
            &mut self.id,
            &mut self.name,
            &mut self.email,
            &mut self.age,
            &mut self.active,
        ]
    }
}

/// A record with float and byte fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    /// Primary key.
    pub id: i64,
    /// Sensor label.
    pub sensor: String,
    /// Measured value.
    pub value: f64,
    /// Raw payload.
    pub payload: Vec<u8>,
}

impl Model for Reading {
    fn table_name(&self) -> &str {
        "readings"
    }

    fn columns(&self) -> Vec<&str> {
        vec!["id", "sensor", "value", "payload"]
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.sensor.clone().into(),
            self.value.into(),
            self.payload.clone().into(),
        ]
    }

    fn pointers(&mut self) -> Vec<&mut dyn Slot> {
        vec![
            &mut self.id,
            &mut self.sensor,
            &mut self.value,
            &mut self.payload,
        ]
    }
}

/// A model whose table, columns and values are set freely.
///
/// Its slots are plain [`Value`]s, one per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModel {
    /// Table name, possibly empty.
    pub table: String,
    /// Column names.
    pub columns: Vec<String>,
    /// Values, not necessarily as many as columns.
    pub values: Vec<Value>,
    /// Slots filled by reads.
    pub slots: Vec<Value>,
}

impl RawModel {
    /// Creates a model for `table` with the given columns and values.
    pub fn new(table: impl Into<String>, columns: &[&str], values: Vec<Value>) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            slots: vec![Value::Null; columns.len()],
            values,
        }
    }

    /// Creates a model with no table name.
    pub fn nameless() -> Self {
        Self::new("", &[], Vec::new())
    }
}

impl Model for RawModel {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    fn values(&self) -> Vec<Value> {
        self.values.clone()
    }

    fn pointers(&mut self) -> Vec<&mut dyn Slot> {
        self.slots.iter_mut().map(|s| s as &mut dyn Slot).collect()
    }
}
