//! Structural preconditions checked before any adapter call.

use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::query::Action;

/// Checks that `model` can take part in `action`.
///
/// # Errors
///
/// - [`OrmError::EmptyTable`] if the model has no table name.
/// - [`OrmError::Validation`] if a Create or Update model has differing
///   column and value counts.
pub fn validate(action: Action, model: &dyn Model) -> OrmResult<()> {
    if model.table_name().is_empty() {
        return Err(OrmError::EmptyTable);
    }

    if action.is_write() {
        let columns = model.columns().len();
        let values = model.values().len();
        if columns != values {
            return Err(OrmError::Validation { columns, values });
        }
    }

    Ok(())
}
