//! Error types for ormkit core.

use thiserror::Error;

/// Result type for core operations.
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors that can occur in ormkit operations.
///
/// The first five variants form the closed sentinel taxonomy that callers
/// match on with `matches!`. Messages are not part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrmError {
    /// A single-row read found no matching row.
    ///
    /// Raised by adapters (usually from [`crate::Scanner::scan`]) and
    /// propagated unchanged by the core.
    #[error("record not found")]
    NotFound,

    /// A record's column and value counts disagree for a write.
    #[error("validation failed: {columns} columns but {values} values")]
    Validation {
        /// Number of declared columns.
        columns: usize,
        /// Number of produced values.
        values: usize,
    },

    /// A record declares no table name.
    #[error("table name empty")]
    EmptyTable,

    /// The bound adapter cannot begin transactions.
    #[error("transaction not supported")]
    NoTxSupport,

    /// The destination record type cannot act as a model.
    #[error("type {type_name} does not satisfy the model capability")]
    Capability {
        /// Name of the offending record type.
        type_name: &'static str,
    },

    /// A slot could not accept the value it was handed.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the slot holds.
        expected: &'static str,
        /// Type of the value offered.
        found: &'static str,
    },

    /// A scan received a different number of slots than the row has values.
    #[error("slot count mismatch: row has {expected} values, got {actual} slots")]
    SlotCount {
        /// Number of values in the row.
        expected: usize,
        /// Number of slots supplied.
        actual: usize,
    },

    /// Any other failure reported by an adapter.
    #[error("adapter error: {message}")]
    Adapter {
        /// Description of the failure.
        message: String,
    },
}

impl OrmError {
    /// Creates an adapter error.
    pub fn adapter(message: impl Into<String>) -> Self {
        Self::Adapter {
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Returns true for [`OrmError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true if the core raised this error before reaching an adapter.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::EmptyTable | Self::NoTxSupport | Self::Capability { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_compare_by_identity() {
        assert_eq!(OrmError::NotFound, OrmError::NotFound);
        assert_ne!(OrmError::NotFound, OrmError::EmptyTable);
        assert!(OrmError::NotFound.is_not_found());
    }

    #[test]
    fn precondition_classification() {
        assert!(OrmError::EmptyTable.is_precondition());
        assert!(OrmError::NoTxSupport.is_precondition());
        assert!(OrmError::Validation {
            columns: 1,
            values: 2
        }
        .is_precondition());
        assert!(!OrmError::NotFound.is_precondition());
        assert!(!OrmError::adapter("boom").is_precondition());
    }

    #[test]
    fn adapter_constructor() {
        let err = OrmError::adapter("connection reset");
        assert_eq!(
            err,
            OrmError::Adapter {
                message: "connection reset".into()
            }
        );
        assert!(err.to_string().contains("connection reset"));
    }
}
