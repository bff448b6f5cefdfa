//! Fluent query builder.

use crate::model::Model;
use crate::query::{Condition, Order, Query};

/// Accumulates read directives for one model.
///
/// Obtained from [`crate::Db::query`]. Each directive consumes the builder
/// and hands it back, so calls chain. The builder is frozen with
/// [`QueryBuilder::to_query`] or handed to [`crate::get`] /
/// [`crate::find_all`], which consume it.
///
/// No directive is validated here. Negative limits, unknown columns and odd
/// sort directions are the adapter's business.
///
/// # Example
///
/// ```rust,ignore
/// let users: Vec<User> = find_all(
///     &db,
///     db.query(&User::default())
///         .filter([eq("active", true), or(gt("age", 65))])
///         .order_by("name", "ASC")
///         .limit(20),
/// )?;
/// ```
pub struct QueryBuilder<'m> {
    model: &'m dyn Model,
    conditions: Vec<Condition>,
    order_by: Vec<Order>,
    group_by: Vec<String>,
    limit: i64,
    offset: i64,
}

impl<'m> QueryBuilder<'m> {
    /// Creates a builder bound to `model`.
    pub fn new(model: &'m dyn Model) -> Self {
        Self {
            model,
            conditions: Vec::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            limit: 0,
            offset: 0,
        }
    }

    /// Returns the bound model.
    pub fn model(&self) -> &'m dyn Model {
        self.model
    }

    /// Appends conditions, keeping their order.
    #[must_use]
    pub fn filter(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Sets the row limit. `0` means unbounded.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Appends a sort directive.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, dir: impl Into<String>) -> Self {
        self.order_by.push(Order::new(column, dir));
        self
    }

    /// Appends grouping columns.
    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Freezes the accumulated directives into a [`Query`].
    ///
    /// The action is left at its default; callers that dispatch the query
    /// set it.
    pub fn to_query(&self) -> Query {
        Query {
            table: self.model.table_name().to_owned(),
            conditions: self.conditions.clone(),
            order_by: self.order_by.clone(),
            group_by: self.group_by.clone(),
            limit: self.limit,
            offset: self.offset,
            ..Query::default()
        }
    }

    /// Consumes the builder into a [`Query`].
    pub fn into_query(self) -> Query {
        Query {
            table: self.model.table_name().to_owned(),
            conditions: self.conditions,
            order_by: self.order_by,
            group_by: self.group_by,
            limit: self.limit,
            offset: self.offset,
            ..Query::default()
        }
    }
}

impl std::fmt::Debug for QueryBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table", &self.model.table_name())
            .field("conditions", &self.conditions)
            .field("order_by", &self.order_by)
            .field("group_by", &self.group_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
