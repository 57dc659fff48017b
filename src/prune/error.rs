use crate::db::{DbError, Ident};

use super::report::RunReport;

/// Errors from a prune run.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    /// A query against one table failed. Not retried; re-running the whole
    /// job is always safe.
    #[error("Database error on table {table}: {source}")]
    Store {
        table: String,
        #[source]
        source: DbError,
    },

    /// Some record types failed. `completed` holds the types that finished.
    #[error("Pruning failed for {} record type(s): {}", failed.len(), failed.join(", "))]
    Incomplete {
        failed: Vec<String>,
        completed: Box<RunReport>,
    },
}

impl PruneError {
    /// Wrap a database error with the table it happened on.
    pub(crate) fn store(table: &Ident) -> impl FnOnce(DbError) -> PruneError + use<> {
        let table = table.to_string();
        move |source| PruneError::Store { table, source }
    }
}
