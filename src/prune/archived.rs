use std::sync::Arc;

use super::{error::PruneError, progress::ProgressSink, settings::RunMode};
use crate::{
    catalog::RecordType,
    db::{PruneQuery, VersionRepo},
};

/// Deletes the version history of records that are gone from the live table.
///
/// This is the one step that makes deleted records unrecoverable. The live
/// table is only read, never modified.
pub struct ArchivedVersionSweeper {
    repo: Arc<dyn VersionRepo>,
}

impl ArchivedVersionSweeper {
    pub fn new(repo: Arc<dyn VersionRepo>) -> Self {
        Self { repo }
    }

    /// Remove every `{base}_Versions` row whose `RecordID` has no live `ID`.
    pub async fn sweep_archived(
        &self,
        record_type: &RecordType,
        mode: RunMode,
        sink: &dyn ProgressSink,
    ) -> Result<u64, PruneError> {
        let query = PruneQuery::archived_versions(record_type.base_table());
        let table = query.target();

        let count = mode
            .apply(self.repo.as_ref(), &query)
            .await
            .map_err(PruneError::store(table))?;

        if count > 0 {
            sink.message(&format!(
                "{}Cleared {} rows from {} for deleted records",
                mode.prefix(),
                count,
                table
            ));
        }

        tracing::info!(
            record_type = record_type.name(),
            table = %table,
            cleared = count,
            dry_run = mode.is_dry_run(),
            "Swept archived versions"
        );

        Ok(count)
    }
}
