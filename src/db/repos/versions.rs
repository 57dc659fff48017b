use async_trait::async_trait;

use crate::db::{error::DbResult, ident::Ident, query::PruneQuery};

/// Row-level access to live tables and their version history.
///
/// Implementations only return scalars (ids and counts); row payloads never
/// leave the store.
#[async_trait]
pub trait VersionRepo: Send + Sync {
    /// Count the rows in a live table.
    async fn count_live_records(&self, base: &Ident) -> DbResult<u64>;

    /// Ids of live records where `|ID| mod batches == batch`, ascending.
    async fn live_record_ids(&self, base: &Ident, batches: u64, batch: u64) -> DbResult<Vec<i64>>;

    /// The version number at descending rank `keep + 1` for a record, i.e.
    /// the newest version that falls outside the `keep` most recent ones.
    ///
    /// Returns `None` when the record has `keep` or fewer versions.
    async fn version_threshold(
        &self,
        versions: &Ident,
        record_id: i64,
        keep: u32,
    ) -> DbResult<Option<i64>>;

    /// Count the rows a query matches.
    async fn count_matching(&self, query: &PruneQuery) -> DbResult<u64>;

    /// Delete the rows a query matches from its target table.
    ///
    /// Returns the number of rows deleted.
    async fn delete_matching(&self, query: &PruneQuery) -> DbResult<u64>;

    /// Count rows in a version table, optionally for a single record.
    async fn count_versions(&self, versions: &Ident, record_id: Option<i64>) -> DbResult<u64>;
}
