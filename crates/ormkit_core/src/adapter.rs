//! Adapter, scanner and row-cursor capabilities.
//!
//! An adapter turns a [`Query`] into work against a real storage engine.
//! The core only ever talks to storage through these traits.

use crate::error::OrmResult;
use crate::model::Slot;
use crate::query::Query;

/// Executes intent against a storage engine.
///
/// # Invariants
///
/// - Errors are returned as-is to the caller; the core never wraps them.
/// - Adapters must be `Send + Sync`; a shared [`crate::Db`] delegates all
///   concurrency control to its adapter.
pub trait Adapter: Send + Sync {
    /// Executes a Create, Update or Delete intent.
    fn exec(&self, query: &Query) -> OrmResult<()>;

    /// Executes a single-row read.
    ///
    /// Failures, including a missing row, surface from
    /// [`Scanner::scan`].
    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_>;

    /// Executes a multi-row read and returns a cursor over the result.
    fn query(&self, query: &Query) -> OrmResult<Box<dyn Rows + '_>>;

    /// Returns the transaction capability, if this adapter has one.
    fn transactions(&self) -> Option<&dyn TxCapable> {
        None
    }
}

/// Populates slots from a single row, once.
pub trait Scanner {
    /// Assigns the row's values to `slots` in column order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OrmError::NotFound`] if there is no row, or a slot
    /// error if the row does not fit the slots.
    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()>;
}

/// A forward-only cursor over result rows.
///
/// Callers drive it as `while rows.next() { rows.scan(..)? }` and check
/// [`Rows::err`] once `next` returns false.
pub trait Rows {
    /// Advances to the next row. Returns false when exhausted.
    fn next(&mut self) -> bool;

    /// Assigns the current row's values to `slots`.
    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()>;

    /// Releases the cursor. Must be safe to call more than once.
    fn close(&mut self) -> OrmResult<()>;

    /// Reports any error hit while iterating.
    fn err(&self) -> OrmResult<()>;
}

/// The ability to begin a transaction-scoped adapter.
pub trait TxCapable {
    /// Begins a transaction.
    fn begin_tx(&self) -> OrmResult<Box<dyn TxAdapter>>;
}

/// An adapter bound to one open transaction.
///
/// Commit and rollback are each called at most once by the core.
pub trait TxAdapter: Adapter {
    /// Makes the transaction's writes visible.
    fn commit(&self) -> OrmResult<()>;

    /// Discards the transaction's writes.
    fn rollback(&self) -> OrmResult<()>;
}
