//! A scripted adapter that records every call made to it.
//!
//! Tests configure what the adapter returns, run core operations against a
//! [`Db`](ormkit_core::Db) wrapping a clone of it, then inspect
//! [`RecordingAdapter::calls`].

use ormkit_core::{
    assign_slots, Adapter, OrmError, OrmResult, Query, Rows, Scanner, Slot, TxAdapter, TxCapable,
    Value,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One recorded adapter interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `exec` was called.
    Exec(Query),
    /// `query_row` was called.
    QueryRow(Query),
    /// `query` was called.
    Query(Query),
    /// A row cursor was closed.
    Close,
    /// `begin_tx` was called.
    BeginTx,
    /// A transaction was committed.
    Commit,
    /// A transaction was rolled back.
    Rollback,
}

impl Call {
    /// Returns the query carried by this call, if any.
    pub fn query(&self) -> Option<&Query> {
        match self {
            Call::Exec(q) | Call::QueryRow(q) | Call::Query(q) => Some(q),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Script {
    exec_error: Option<OrmError>,
    row: Option<Vec<Value>>,
    row_error: Option<OrmError>,
    rows: Vec<Vec<Value>>,
    open_error: Option<OrmError>,
    scan_failure: Option<(usize, OrmError)>,
    terminal_error: Option<OrmError>,
    close_error: Option<OrmError>,
    tx: Option<TxScript>,
}

#[derive(Debug, Default, Clone)]
struct TxScript {
    begin_error: Option<OrmError>,
    commit_error: Option<OrmError>,
    rollback_error: Option<OrmError>,
}

#[derive(Debug, Default)]
struct Inner {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl Inner {
    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn script(&self) -> Script {
        self.script.lock().clone()
    }
}

/// A scripted, call-recording [`Adapter`].
///
/// Clones share the same script and call log.
///
/// # Example
///
/// ```rust,ignore
/// let adapter = RecordingAdapter::new().with_rows(vec![row_a, row_b]);
/// let db = Db::new(adapter.clone());
/// let users: Vec<User> = find_all(&db, db.query(&User::default()))?;
/// assert_eq!(adapter.close_count(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingAdapter {
    inner: Arc<Inner>,
}

impl RecordingAdapter {
    /// Creates an adapter with no rows and no transaction support.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn edit(self, f: impl FnOnce(&mut Script)) -> Self {
        f(&mut self.inner.script.lock());
        self
    }

    /// Makes `exec` fail with `err`.
    #[must_use]
    pub fn fail_exec(self, err: OrmError) -> Self {
        self.edit(|s| s.exec_error = Some(err))
    }

    /// Sets the row returned by `query_row`. Without one, scans report
    /// [`OrmError::NotFound`].
    #[must_use]
    pub fn with_row(self, row: Vec<Value>) -> Self {
        self.edit(|s| s.row = Some(row))
    }

    /// Makes the `query_row` scanner fail with `err`.
    #[must_use]
    pub fn fail_row(self, err: OrmError) -> Self {
        self.edit(|s| s.row_error = Some(err))
    }

    /// Sets the rows returned by `query`.
    #[must_use]
    pub fn with_rows(self, rows: Vec<Vec<Value>>) -> Self {
        self.edit(|s| s.rows = rows)
    }

    /// Makes `query` itself fail with `err`.
    #[must_use]
    pub fn fail_open(self, err: OrmError) -> Self {
        self.edit(|s| s.open_error = Some(err))
    }

    /// Makes the scan of row `index` (zero-based) fail with `err`.
    #[must_use]
    pub fn fail_scan_at(self, index: usize, err: OrmError) -> Self {
        self.edit(|s| s.scan_failure = Some((index, err)))
    }

    /// Makes the cursor's `err` report `err` after the last row.
    #[must_use]
    pub fn fail_iteration(self, err: OrmError) -> Self {
        self.edit(|s| s.terminal_error = Some(err))
    }

    /// Makes the cursor's `close` fail with `err`.
    #[must_use]
    pub fn fail_close(self, err: OrmError) -> Self {
        self.edit(|s| s.close_error = Some(err))
    }

    /// Advertises transaction support.
    #[must_use]
    pub fn with_transactions(self) -> Self {
        self.edit(|s| {
            s.tx.get_or_insert_with(TxScript::default);
        })
    }

    /// Advertises transaction support, with `begin_tx` failing.
    #[must_use]
    pub fn fail_begin(self, err: OrmError) -> Self {
        self.edit(|s| s.tx.get_or_insert_with(TxScript::default).begin_error = Some(err))
    }

    /// Advertises transaction support, with `commit` failing.
    #[must_use]
    pub fn fail_commit(self, err: OrmError) -> Self {
        self.edit(|s| s.tx.get_or_insert_with(TxScript::default).commit_error = Some(err))
    }

    /// Advertises transaction support, with `rollback` failing.
    #[must_use]
    pub fn fail_rollback(self, err: OrmError) -> Self {
        self.edit(|s| s.tx.get_or_insert_with(TxScript::default).rollback_error = Some(err))
    }

    /// Returns every call recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().clone()
    }

    /// Returns the number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Returns the query of the most recent exec or read.
    pub fn last_query(&self) -> Option<Query> {
        self.inner
            .calls
            .lock()
            .iter()
            .rev()
            .find_map(|c| c.query().cloned())
    }

    /// Returns how many times a cursor was closed.
    pub fn close_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Close))
    }

    /// Returns how many commits were recorded.
    pub fn commit_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Commit))
    }

    /// Returns how many rollbacks were recorded.
    pub fn rollback_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Rollback))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.calls.lock().iter().filter(|c| pred(c)).count()
    }
}

fn exec(inner: &Inner, query: &Query) -> OrmResult<()> {
    inner.record(Call::Exec(query.clone()));
    inner.script().exec_error.map_or(Ok(()), Err)
}

fn query_row(inner: &Inner, query: &Query) -> Box<dyn Scanner> {
    inner.record(Call::QueryRow(query.clone()));
    let script = inner.script();
    let outcome = match (script.row_error, script.row) {
        (Some(err), _) => Err(err),
        (None, Some(row)) => Ok(row),
        (None, None) => Err(OrmError::NotFound),
    };
    Box::new(ScriptedRow {
        outcome: Some(outcome),
    })
}

fn query(inner: &Arc<Inner>, query: &Query) -> OrmResult<Box<dyn Rows>> {
    inner.record(Call::Query(query.clone()));
    let script = inner.script();
    if let Some(err) = script.open_error {
        return Err(err);
    }
    Ok(Box::new(ScriptedRows {
        pending: script.rows.into(),
        current: None,
        index: None,
        scan_failure: script.scan_failure,
        terminal_error: script.terminal_error,
        close_error: script.close_error,
        inner: Arc::clone(inner),
    }))
}

impl Adapter for RecordingAdapter {
    fn exec(&self, query: &Query) -> OrmResult<()> {
        exec(&self.inner, query)
    }

    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
        query_row(&self.inner, query)
    }

    fn query(&self, q: &Query) -> OrmResult<Box<dyn Rows + '_>> {
        query(&self.inner, q)
    }

    fn transactions(&self) -> Option<&dyn TxCapable> {
        if self.inner.script.lock().tx.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl TxCapable for RecordingAdapter {
    fn begin_tx(&self) -> OrmResult<Box<dyn TxAdapter>> {
        self.inner.record(Call::BeginTx);
        let tx = self.inner.script().tx.unwrap_or_default();
        if let Some(err) = tx.begin_error {
            return Err(err);
        }
        Ok(Box::new(RecordingTx {
            inner: Arc::clone(&self.inner),
            script: tx,
        }))
    }
}

/// The transaction-scoped side of [`RecordingAdapter`].
///
/// Reads and writes are recorded in the shared call log.
#[derive(Debug)]
pub struct RecordingTx {
    inner: Arc<Inner>,
    script: TxScript,
}

impl Adapter for RecordingTx {
    fn exec(&self, query: &Query) -> OrmResult<()> {
        exec(&self.inner, query)
    }

    fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
        query_row(&self.inner, query)
    }

    fn query(&self, q: &Query) -> OrmResult<Box<dyn Rows + '_>> {
        query(&self.inner, q)
    }
}

impl TxAdapter for RecordingTx {
    fn commit(&self) -> OrmResult<()> {
        self.inner.record(Call::Commit);
        self.script.commit_error.clone().map_or(Ok(()), Err)
    }

    fn rollback(&self) -> OrmResult<()> {
        self.inner.record(Call::Rollback);
        self.script.rollback_error.clone().map_or(Ok(()), Err)
    }
}

struct ScriptedRow {
    outcome: Option<OrmResult<Vec<Value>>>,
}

impl Scanner for ScriptedRow {
    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
        match self.outcome.take() {
            Some(Ok(row)) => assign_slots(slots, row),
            Some(Err(err)) => Err(err),
            None => Err(OrmError::adapter("row already scanned")),
        }
    }
}

struct ScriptedRows {
    pending: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    index: Option<usize>,
    scan_failure: Option<(usize, OrmError)>,
    terminal_error: Option<OrmError>,
    close_error: Option<OrmError>,
    inner: Arc<Inner>,
}

impl Rows for ScriptedRows {
    fn next(&mut self) -> bool {
        self.current = self.pending.pop_front();
        if self.current.is_some() {
            self.index = Some(self.index.map_or(0, |i| i + 1));
        }
        self.current.is_some()
    }

    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
        if let (Some((at, err)), Some(index)) = (&self.scan_failure, self.index) {
            if *at == index {
                return Err(err.clone());
            }
        }
        let row = self
            .current
            .take()
            .ok_or_else(|| OrmError::adapter("scan called without a current row"))?;
        assign_slots(slots, row)
    }

    fn close(&mut self) -> OrmResult<()> {
        self.inner.record(Call::Close);
        self.close_error.clone().map_or(Ok(()), Err)
    }

    fn err(&self) -> OrmResult<()> {
        self.terminal_error.clone().map_or(Ok(()), Err)
    }
}
