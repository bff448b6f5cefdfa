//! Transaction coordination.

use crate::adapter::{Adapter, Rows, Scanner, TxAdapter, TxCapable};
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::query::Query;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs `f` against a transaction-scoped [`Db`].
///
/// 1. If the adapter has no transaction capability, fails with
///    [`OrmError::NoTxSupport`] without calling the adapter.
/// 2. Begins a transaction; a failure here is returned unchanged and
///    nothing else happens.
/// 3. Calls `f` with a `Db` bound to the transaction.
/// 4. If `f` fails, rolls back and returns `f`'s error. A rollback failure
///    is logged, never returned.
/// 5. If `f` succeeds, commits and returns the commit result.
///
/// If `f` panics the transaction is rolled back while unwinding.
///
/// # Errors
///
/// See above.
pub fn transaction<F, R>(db: &Db, f: F) -> OrmResult<R>
where
    F: FnOnce(&Db) -> OrmResult<R>,
{
    let capable = db.adapter().transactions().ok_or(OrmError::NoTxSupport)?;
    let mut guard = TxGuard::new(capable.begin_tx()?);
    debug!("transaction started");

    let scoped = Db::from_arc(Arc::new(Scoped(guard.handle())));
    match f(&scoped) {
        Ok(value) => {
            guard.commit()?;
            debug!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            guard.rollback();
            debug!(error = %err, "transaction rolled back");
            Err(err)
        }
    }
}

/// Ends the transaction exactly once, rolling back if nobody else did.
struct TxGuard {
    tx: Arc<dyn TxAdapter>,
    finished: bool,
}

impl TxGuard {
    fn new(tx: Box<dyn TxAdapter>) -> Self {
        Self {
            tx: Arc::from(tx),
            finished: false,
        }
    }

    fn handle(&self) -> Arc<dyn TxAdapter> {
        Arc::clone(&self.tx)
    }

    fn commit(&mut self) -> OrmResult<()> {
        self.finished = true;
        self.tx.commit()
    }

    fn rollback(&mut self) {
        self.finished = true;
        if let Err(err) = self.tx.rollback() {
            warn!(error = %err, "rollback failed");
        }
    }
}

impl Drop for TxGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.rollback();
        }
    }
}

/// Presents a transaction adapter as a plain adapter.
struct Scoped(Arc<dyn TxAdapter>);

impl Adapter for Scoped {
    fn exec(&self, query: &Query) -> OrmResult<()> {
        self.0.exec(query)
    }

    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
        self.0.query_row(query)
    }

    fn query(&self, query: &Query) -> OrmResult<Box<dyn Rows + '_>> {
        self.0.query(query)
    }

    fn transactions(&self) -> Option<&dyn TxCapable> {
        self.0.transactions()
    }
}
