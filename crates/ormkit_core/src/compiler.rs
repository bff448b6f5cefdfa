//! Optional compilation seam for adapters.

use crate::error::OrmResult;
use crate::query::Query;

/// Converts intent into an engine-native plan.
///
/// The core never calls a compiler. Adapters that want to separate planning
/// from execution implement it for whatever owns their schema knowledge.
pub trait Compiler {
    /// The engine-native form of a query.
    type Plan;

    /// Compiles `query` into a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the query references something the engine cannot
    /// resolve.
    fn compile(&self, query: &Query) -> OrmResult<Self::Plan>;
}
