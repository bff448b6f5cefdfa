//! The orchestrator: validates models, builds intent and dispatches it.

use crate::adapter::Adapter;
use crate::builder::QueryBuilder;
use crate::error::OrmResult;
use crate::model::Model;
use crate::query::{Action, Condition, Query};
use crate::validate::validate;
use std::sync::Arc;
use tracing::debug;

/// Entry point for persistence operations.
///
/// A `Db` wraps exactly one [`Adapter`] and holds no other state, so it is
/// cheap to clone and may be shared across threads. Every write validates
/// the model first and then makes exactly one adapter call; a failed
/// validation makes none.
///
/// # Example
///
/// ```rust,ignore
/// let db = Db::new(MemoryAdapter::new());
/// db.create(&user)?;
/// db.update(&user, [eq("id", user.id)])?;
/// db.delete(&user, [eq("id", user.id)])?;
/// ```
#[derive(Clone)]
pub struct Db {
    adapter: Arc<dyn Adapter>,
}

impl Db {
    /// Creates a `Db` that owns `adapter`.
    pub fn new(adapter: impl Adapter + 'static) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }

    /// Creates a `Db` over a shared adapter.
    pub fn from_arc(adapter: Arc<dyn Adapter>) -> Self {
        Self { adapter }
    }

    /// Returns the adapter.
    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    /// Inserts `model`.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or whatever the adapter reports.
    pub fn create(&self, model: &dyn Model) -> OrmResult<()> {
        validate(Action::Create, model)?;
        let query = Query {
            action: Action::Create,
            table: model.table_name().to_owned(),
            columns: owned_columns(model),
            values: model.values(),
            ..Query::default()
        };
        self.exec(&query)
    }

    /// Writes `model`'s columns to the rows matching `conditions`.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or whatever the adapter reports.
    pub fn update(
        &self,
        model: &dyn Model,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> OrmResult<()> {
        validate(Action::Update, model)?;
        let query = Query {
            action: Action::Update,
            table: model.table_name().to_owned(),
            columns: owned_columns(model),
            values: model.values(),
            conditions: conditions.into_iter().collect(),
            ..Query::default()
        };
        self.exec(&query)
    }

    /// Deletes the rows of `model`'s table matching `conditions`.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or whatever the adapter reports.
    pub fn delete(
        &self,
        model: &dyn Model,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> OrmResult<()> {
        validate(Action::Delete, model)?;
        let query = Query {
            action: Action::Delete,
            table: model.table_name().to_owned(),
            conditions: conditions.into_iter().collect(),
            ..Query::default()
        };
        self.exec(&query)
    }

    /// Starts a read bound to `model`. Does not touch the adapter.
    pub fn query<'m>(&self, model: &'m dyn Model) -> QueryBuilder<'m> {
        QueryBuilder::new(model)
    }

    /// Runs `f` inside a transaction. See [`crate::transaction`].
    ///
    /// # Errors
    ///
    /// See [`crate::transaction`].
    pub fn transaction<F, R>(&self, f: F) -> OrmResult<R>
    where
        F: FnOnce(&Db) -> OrmResult<R>,
    {
        crate::tx::transaction(self, f)
    }

    fn exec(&self, query: &Query) -> OrmResult<()> {
        debug!(action = %query.action, table = %query.table, "dispatching exec");
        self.adapter.exec(query)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("transactions", &self.adapter.transactions().is_some())
            .finish_non_exhaustive()
    }
}

fn owned_columns(model: &dyn Model) -> Vec<String> {
    model.columns().into_iter().map(str::to_owned).collect()
}
