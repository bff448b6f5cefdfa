//! The memory adapter and its transactions.

use crate::config::MemoryConfig;
use crate::cursor::{MemoryRow, MemoryRows};
use crate::error::{MemoryError, MemoryResult};
use crate::plan::Plan;
use crate::table::Table;
use ormkit_core::{
    Action, Adapter, Compiler, OrmResult, Query, Rows, Scanner, TxAdapter, TxCapable, Value,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Tables plus a version bumped on every write that changed a row.
#[derive(Debug, Clone, Default)]
struct Store {
    tables: HashMap<String, Table>,
    version: u64,
}

impl Store {
    fn exec(&mut self, query: &Query, config: &MemoryConfig) -> MemoryResult<usize> {
        let affected = match query.action {
            Action::Create => {
                self.tables
                    .entry(query.table.clone())
                    .or_insert_with(|| {
                        Table::new(&query.table)
                            .with_case_insensitive_like(config.case_insensitive_like)
                    })
                    .insert(&query.columns, &query.values);
                1
            }
            Action::Update => match self.tables.get_mut(&query.table) {
                Some(table) => {
                    let plan = table.compile_plan(query)?;
                    table.update(&plan, &query.columns, &query.values)
                }
                None => 0,
            },
            Action::Delete => match self.tables.get_mut(&query.table) {
                Some(table) => {
                    let plan = table.compile_plan(query)?;
                    table.delete(&plan)
                }
                None => 0,
            },
            Action::ReadOne | Action::ReadAll => {
                return Err(MemoryError::UnsupportedAction(query.action.as_str()))
            }
        };
        if affected > 0 {
            self.version += 1;
        }
        Ok(affected)
    }

    fn select(&self, query: &Query) -> MemoryResult<Vec<Vec<Value>>> {
        match self.tables.get(&query.table) {
            Some(table) => Ok(table.select(&table.compile_plan(query)?)),
            None => Ok(Vec::new()),
        }
    }
}

fn exec_on(store: &RwLock<Store>, query: &Query, config: &MemoryConfig) -> OrmResult<()> {
    let affected = store.write().exec(query, config)?;
    debug!(action = %query.action, table = %query.table, affected, "memory exec");
    Ok(())
}

fn select_on(store: &RwLock<Store>, query: &Query) -> MemoryResult<Vec<Vec<Value>>> {
    let rows = store.read().select(query)?;
    trace!(table = %query.table, rows = rows.len(), "memory select");
    Ok(rows)
}

fn query_row_on(store: &RwLock<Store>, query: &Query) -> Box<dyn Scanner> {
    let outcome = select_on(store, query).map(|rows| rows.into_iter().next());
    Box::new(MemoryRow::new(outcome.map_err(Into::into)))
}

fn query_on(store: &RwLock<Store>, query: &Query) -> OrmResult<Box<dyn Rows>> {
    let rows = select_on(store, query)?;
    Ok(Box::new(MemoryRows::new(rows)))
}

/// An adapter that keeps every table in process memory.
///
/// Clones share the same tables. All access goes through a single
/// reader-writer lock, so a shared adapter is safe to use from many
/// threads.
///
/// # Example
///
/// ```rust,ignore
/// use ormkit_core::Db;
/// use ormkit_memory::MemoryAdapter;
///
/// let db = Db::new(MemoryAdapter::new());
/// db.create(&user)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    store: Arc<RwLock<Store>>,
    config: MemoryConfig,
}

impl MemoryAdapter {
    /// Creates an empty adapter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty adapter with `config`.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            store: Arc::default(),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Returns a copy of `name`, if it exists.
    pub fn table(&self, name: &str) -> Option<Table> {
        self.store.read().tables.get(name).cloned()
    }

    /// Returns the number of rows in `name`, or zero if it doesn't exist.
    pub fn row_count(&self, name: &str) -> usize {
        self.store.read().tables.get(name).map_or(0, Table::len)
    }

    /// Compiles `query` against the current layout of its table.
    ///
    /// # Errors
    ///
    /// Returns an adapter error if the table is missing or the query
    /// references unknown columns.
    pub fn explain(&self, query: &Query) -> OrmResult<Plan> {
        let store = self.store.read();
        let table = store
            .tables
            .get(&query.table)
            .ok_or_else(|| MemoryError::UnknownTable(query.table.clone()))?;
        table.compile(query)
    }
}

impl Adapter for MemoryAdapter {
    fn exec(&self, query: &Query) -> OrmResult<()> {
        exec_on(&self.store, query, &self.config)
    }

    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
        query_row_on(&self.store, query)
    }

    fn query(&self, query: &Query) -> OrmResult<Box<dyn Rows + '_>> {
        Ok(query_on(&self.store, query)?)
    }

    fn transactions(&self) -> Option<&dyn TxCapable> {
        if self.config.transactions {
            Some(self)
        } else {
            None
        }
    }
}

impl TxCapable for MemoryAdapter {
    fn begin_tx(&self) -> OrmResult<Box<dyn TxAdapter>> {
        let snapshot = self.store.read().clone();
        debug!(version = snapshot.version, "memory transaction begin");
        Ok(Box::new(MemoryTx {
            shared: Arc::clone(&self.store),
            base_version: snapshot.version,
            working: RwLock::new(snapshot),
            state: Mutex::new(TxState::Active),
            config: self.config,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// A transaction over a [`MemoryAdapter`].
///
/// Works on a private snapshot taken at begin. Commit publishes the
/// snapshot; rollback drops it.
#[derive(Debug)]
pub struct MemoryTx {
    shared: Arc<RwLock<Store>>,
    working: RwLock<Store>,
    base_version: u64,
    state: Mutex<TxState>,
    config: MemoryConfig,
}

impl MemoryTx {
    fn ensure_active(&self) -> MemoryResult<()> {
        match *self.state.lock() {
            TxState::Active => Ok(()),
            TxState::Committed | TxState::RolledBack => Err(MemoryError::TransactionFinished),
        }
    }
}

impl Adapter for MemoryTx {
    fn exec(&self, query: &Query) -> OrmResult<()> {
        self.ensure_active()?;
        exec_on(&self.working, query, &self.config)
    }

    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
        if let Err(err) = self.ensure_active() {
            return Box::new(MemoryRow::new(Err(err.into())));
        }
        query_row_on(&self.working, query)
    }

    fn query(&self, query: &Query) -> OrmResult<Box<dyn Rows + '_>> {
        self.ensure_active()?;
        Ok(query_on(&self.working, query)?)
    }
}

impl TxAdapter for MemoryTx {
    fn commit(&self) -> OrmResult<()> {
        let mut state = self.state.lock();
        if *state != TxState::Active {
            return Ok(());
        }

        let mut shared = self.shared.write();
        if self.config.conflict_detection && shared.version != self.base_version {
            *state = TxState::RolledBack;
            return Err(MemoryError::Conflict {
                expected: self.base_version,
                actual: shared.version,
            }
            .into());
        }

        let working = std::mem::take(&mut *self.working.write());
        shared.tables = working.tables;
        shared.version += 1;
        *state = TxState::Committed;
        debug!(version = shared.version, "memory transaction committed");
        Ok(())
    }

    fn rollback(&self) -> OrmResult<()> {
        let mut state = self.state.lock();
        if *state == TxState::Active {
            *state = TxState::RolledBack;
            *self.working.write() = Store::default();
            debug!("memory transaction rolled back");
        }
        Ok(())
    }
}
