//! Intent model: actions, conditions, ordering and the query itself.
//!
//! These are plain values. Adapters read them to build whatever their
//! engine needs; the core never turns them into query text.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of storage operation a [`Query`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// Insert one record.
    Create,
    /// Read at most one record.
    ReadOne,
    /// Update matching records.
    Update,
    /// Delete matching records.
    Delete,
    /// Read every matching record.
    #[default]
    ReadAll,
}

impl Action {
    /// Returns the action name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::ReadOne => "READ_ONE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::ReadAll => "READ_ALL",
        }
    }

    /// Returns true for actions that carry columns and values.
    pub const fn is_write(self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
}

impl Operator {
    /// Returns the operator symbol.
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a condition joins the conditions before it.
///
/// The combination semantics belong to the adapter; the core only carries
/// the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Logic {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Logic {
    /// Returns the keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter on a field.
///
/// Built with [`eq`], [`neq`], [`gt`], [`gte`], [`lt`], [`lte`], [`like`]
/// and tagged with [`or`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    field: String,
    operator: Operator,
    value: Value,
    logic: Logic,
}

impl Condition {
    fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            logic: Logic::And,
        }
    }

    /// Returns the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the value compared against.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the logic tag.
    pub fn logic(&self) -> Logic {
        self.logic
    }
}

/// `field = value`
pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Eq, value)
}

/// `field != value`
pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Neq, value)
}

/// `field > value`
pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Gt, value)
}

/// `field >= value`
pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Gte, value)
}

/// `field < value`
pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Lt, value)
}

/// `field <= value`
pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(field, Operator::Lte, value)
}

/// `field LIKE pattern`
pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Condition {
    Condition::new(field, Operator::Like, Value::Text(pattern.into()))
}

/// Returns `condition` tagged with [`Logic::Or`].
///
/// This does not combine conditions; it only changes the tag.
pub fn or(condition: Condition) -> Condition {
    Condition {
        logic: Logic::Or,
        ..condition
    }
}

/// A sort directive.
///
/// The direction is passed through to the adapter unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    column: String,
    dir: String,
}

impl Order {
    pub(crate) fn new(column: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            dir: dir.into(),
        }
    }

    /// Returns the column to sort by.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the direction as given.
    pub fn dir(&self) -> &str {
        &self.dir
    }
}

/// A complete storage intent, ready for an adapter.
///
/// # Invariants
///
/// - `table` is non-empty.
/// - For [`Action::Create`] and [`Action::Update`],
///   `columns.len() == values.len()`.
///
/// `limit == 0` means unbounded and `offset == 0` means none. Negative
/// values are passed through; their meaning is up to the adapter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    /// The operation to perform.
    pub action: Action,
    /// Target table.
    pub table: String,
    /// Columns written by Create and Update.
    pub columns: Vec<String>,
    /// Values parallel to `columns`.
    pub values: Vec<Value>,
    /// Filters, in insertion order.
    pub conditions: Vec<Condition>,
    /// Sort directives, in insertion order.
    pub order_by: Vec<Order>,
    /// Grouping columns.
    pub group_by: Vec<String>,
    /// Maximum rows to return.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_set_operator_and_default_logic() {
        let cases = [
            (neq("a", 1), "!=", Value::Integer(1)),
            (gte("b", 2), ">=", Value::Integer(2)),
            (lt("c", 3), "<", Value::Integer(3)),
            (lte("d", 4), "<=", Value::Integer(4)),
            (gt("e", 5), ">", Value::Integer(5)),
            (like("f", "%test%"), "LIKE", Value::Text("%test%".into())),
        ];

        for (cond, op, value) in cases {
            assert_eq!(cond.operator().as_str(), op);
            assert_eq!(cond.value(), &value);
            assert_eq!(cond.logic().as_str(), "AND");
        }
    }

    #[test]
    fn eq_accessors() {
        let c = eq("field", "val");
        assert_eq!(c.field(), "field");
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.operator().to_string(), "=");
        assert_eq!(c.value(), &Value::Text("val".into()));
        assert_eq!(c.logic(), Logic::And);
    }

    #[test]
    fn or_only_changes_logic() {
        let c = eq("a", 1);
        let tagged = or(c.clone());
        assert_eq!(tagged.logic().as_str(), "OR");
        assert_eq!(tagged.field(), c.field());
        assert_eq!(tagged.operator(), c.operator());
        assert_eq!(tagged.value(), c.value());
    }

    #[test]
    fn order_accessors() {
        let o = Order::new("created_at", "DESC");
        assert_eq!(o.column(), "created_at");
        assert_eq!(o.dir(), "DESC");
    }

    #[test]
    fn action_names() {
        assert_eq!(Action::ReadOne.to_string(), "READ_ONE");
        assert!(Action::Create.is_write());
        assert!(Action::Update.is_write());
        assert!(!Action::Delete.is_write());
    }

    #[test]
    fn query_serializes_to_json() {
        let q = Query {
            action: Action::Update,
            table: "users".into(),
            columns: vec!["age".into()],
            values: vec![Value::Integer(31)],
            conditions: vec![eq("name", "Alice"), or(gt("age", 100))],
            order_by: vec![Order::new("id", "ASC")],
            group_by: vec![],
            limit: 0,
            offset: 0,
        };

        let json = serde_json::to_string(&q).unwrap();
        let back: Query = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert_eq!(back.conditions[1].logic(), Logic::Or);
    }
}
