//! Scanners and cursors over materialized rows.

use ormkit_core::{assign_slots, OrmError, OrmResult, Rows, Scanner, Slot, Value};
use std::collections::VecDeque;

/// The outcome of a single-row read, delivered on first scan.
#[derive(Debug)]
pub struct MemoryRow {
    outcome: Option<OrmResult<Option<Vec<Value>>>>,
}

impl MemoryRow {
    pub(crate) fn new(outcome: OrmResult<Option<Vec<Value>>>) -> Self {
        Self {
            outcome: Some(outcome),
        }
    }
}

impl Scanner for MemoryRow {
    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
        match self.outcome.take() {
            Some(Ok(Some(row))) => assign_slots(slots, row),
            Some(Ok(None)) => Err(OrmError::NotFound),
            Some(Err(err)) => Err(err),
            None => Err(OrmError::adapter("row already scanned")),
        }
    }
}

/// A cursor over rows copied out of a table.
#[derive(Debug, Default)]
pub struct MemoryRows {
    pending: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    closed: bool,
}

impl MemoryRows {
    pub(crate) fn new(rows: Vec<Vec<Value>>) -> Self {
        Self {
            pending: rows.into(),
            ..Self::default()
        }
    }

    /// Returns true once [`Rows::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Rows for MemoryRows {
    fn next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
        match self.current.take() {
            Some(row) => assign_slots(slots, row),
            None => Err(OrmError::adapter("scan called without a current row")),
        }
    }

    fn close(&mut self) -> OrmResult<()> {
        self.closed = true;
        self.pending.clear();
        self.current = None;
        Ok(())
    }

    fn err(&self) -> OrmResult<()> {
        Ok(())
    }
}
