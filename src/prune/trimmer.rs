//! Trims per-record version history down to the retained count.

use std::sync::Arc;

use super::{
    error::PruneError,
    progress::ProgressSink,
    settings::{KeepVersions, RunMode},
};
use crate::{
    catalog::RecordType,
    db::{Ident, PruneQuery, VersionRepo},
};

/// Deletes versions older than the N most recent ones for each live record.
///
/// Live records are visited in batches partitioned by `|ID| mod batches`, so
/// only one batch of ids is held at a time. Batch boundaries have no effect
/// on which rows are removed.
pub struct OldVersionTrimmer {
    repo: Arc<dyn VersionRepo>,
    batch_size: u32,
}

impl OldVersionTrimmer {
    pub fn new(repo: Arc<dyn VersionRepo>, batch_size: u32) -> Self {
        Self {
            repo,
            batch_size: batch_size.max(1),
        }
    }

    /// Trim every live record of `record_type` to its `keep` newest versions.
    ///
    /// Returns the number of version rows deleted (or, on a dry run, that
    /// would be deleted).
    pub async fn trim(
        &self,
        record_type: &RecordType,
        keep: KeepVersions,
        mode: RunMode,
        sink: &dyn ProgressSink,
    ) -> Result<u64, PruneError> {
        let base = record_type.base_table();
        let versions = record_type.versions_table();

        let live = self
            .repo
            .count_live_records(base)
            .await
            .map_err(PruneError::store(base))?;
        let batches = live / u64::from(self.batch_size) + 1;

        let mut cleared: u64 = 0;
        for batch in 0..batches {
            let ids = self
                .repo
                .live_record_ids(base, batches, batch)
                .await
                .map_err(PruneError::store(base))?;

            tracing::debug!(
                table = %base,
                batch,
                batches,
                records = ids.len(),
                "Trimming batch"
            );

            for record_id in ids {
                cleared += self.trim_record(base, &versions, record_id, keep, mode).await?;
            }
        }

        if cleared > 0 {
            sink.message(&format!(
                "{}Cleared {} old versions (before last {}) from table {}",
                mode.prefix(),
                cleared,
                keep,
                versions
            ));
        }

        tracing::info!(
            record_type = record_type.name(),
            table = %versions,
            keep = keep.get(),
            records = live,
            cleared,
            dry_run = mode.is_dry_run(),
            "Trimmed old versions"
        );

        Ok(cleared)
    }

    async fn trim_record(
        &self,
        base: &Ident,
        versions: &Ident,
        record_id: i64,
        keep: KeepVersions,
        mode: RunMode,
    ) -> Result<u64, PruneError> {
        let threshold = self
            .repo
            .version_threshold(versions, record_id, keep.get())
            .await
            .map_err(PruneError::store(versions))?;

        // Record has no more than `keep` versions
        let Some(threshold) = threshold else {
            return Ok(0);
        };

        tracing::trace!(record_id, threshold, "Trimming record versions");

        let query = PruneQuery::versions_up_to(base, record_id, threshold);
        mode.apply(self.repo.as_ref(), &query)
            .await
            .map_err(PruneError::store(versions))
    }
}
