use std::sync::Arc;

use super::{error::PruneError, progress::ProgressSink, settings::RunMode};
use crate::{
    catalog::RecordType,
    db::{PruneQuery, VersionRepo},
};

/// Deletes subtype version rows whose base version row is gone.
///
/// A class hierarchy writes one version row per table for every version
/// event. Once trimming or the archived sweep removes a base row, the
/// matching `(RecordID, Version)` rows in subtype tables are orphaned.
pub struct OrphanedSubtypeSweeper {
    repo: Arc<dyn VersionRepo>,
}

impl OrphanedSubtypeSweeper {
    pub fn new(repo: Arc<dyn VersionRepo>) -> Self {
        Self { repo }
    }

    /// Sweep each subtype table of `record_type` in turn.
    ///
    /// Returns the total across all subtype tables.
    pub async fn sweep_orphans(
        &self,
        record_type: &RecordType,
        mode: RunMode,
        sink: &dyn ProgressSink,
    ) -> Result<u64, PruneError> {
        let base = record_type.base_table();
        let mut total: u64 = 0;

        for subtype in record_type.subtype_tables() {
            if subtype == base {
                continue;
            }

            let query = PruneQuery::orphaned_subtype_versions(base, subtype);
            let table = query.target();
            let count = mode
                .apply(self.repo.as_ref(), &query)
                .await
                .map_err(PruneError::store(table))?;

            if count > 0 {
                sink.message(&format!("{}Cleared {} rows from {}", mode.prefix(), count, table));
            }

            tracing::debug!(
                record_type = record_type.name(),
                table = %table,
                cleared = count,
                dry_run = mode.is_dry_run(),
                "Swept orphaned subtype versions"
            );

            total += count;
        }

        Ok(total)
    }
}
