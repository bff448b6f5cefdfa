//! Error types for the memory adapter.

use ormkit_core::OrmError;
use thiserror::Error;

/// Result type for memory adapter internals.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Failures specific to the memory adapter.
///
/// These cross the adapter boundary as [`OrmError::Adapter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A condition, sort or group referenced a column the table lacks.
    #[error("unknown column {column} in table {table}")]
    UnknownColumn {
        /// The table searched.
        table: String,
        /// The missing column.
        column: String,
    },

    /// No table by that name has been written yet.
    #[error("unknown table {0}")]
    UnknownTable(String),

    /// A sort direction other than ASC or DESC.
    #[error("unsupported sort direction: {0}")]
    InvalidDirection(String),

    /// A negative limit or offset.
    #[error("negative {name}: {value}")]
    NegativeBound {
        /// `limit` or `offset`.
        name: &'static str,
        /// The value given.
        value: i64,
    },

    /// The store changed between begin and commit.
    #[error("transaction conflict: store changed since begin (version {expected}, now {actual})")]
    Conflict {
        /// Version seen at begin.
        expected: u64,
        /// Version at commit.
        actual: u64,
    },

    /// The transaction was already committed or rolled back.
    #[error("transaction already finished")]
    TransactionFinished,

    /// A write intent reached a read entry point or vice versa.
    #[error("unsupported action {0} for this call")]
    UnsupportedAction(&'static str),
}

impl MemoryError {
    /// Creates an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl From<MemoryError> for OrmError {
    fn from(err: MemoryError) -> Self {
        OrmError::adapter(err.to_string())
    }
}
