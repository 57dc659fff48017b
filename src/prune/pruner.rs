use std::sync::Arc;

use super::{
    archived::ArchivedVersionSweeper,
    error::PruneError,
    orphans::OrphanedSubtypeSweeper,
    progress::ProgressSink,
    report::{RunReport, TypeReport},
    settings::RunSettings,
    trimmer::OldVersionTrimmer,
};
use crate::{catalog::RecordType, config::FailurePolicy, db::VersionRepo};

/// Runs the three prune steps over a list of record types.
///
/// For each type, in order: trim old versions (skipped in fast mode), sweep
/// archived versions, sweep orphaned subtype versions. Each step narrows what
/// the next one has to scan, and the orphan sweep must see the base rows the
/// first two removed.
pub struct RetentionPruner {
    trimmer: OldVersionTrimmer,
    archived: ArchivedVersionSweeper,
    orphans: OrphanedSubtypeSweeper,
}

impl RetentionPruner {
    pub fn new(repo: Arc<dyn VersionRepo>, batch_size: u32) -> Self {
        Self {
            trimmer: OldVersionTrimmer::new(Arc::clone(&repo), batch_size),
            archived: ArchivedVersionSweeper::new(Arc::clone(&repo)),
            orphans: OrphanedSubtypeSweeper::new(repo),
        }
    }

    /// Prune every record type in `types`, in order.
    ///
    /// A type that fails is reported through the sink and the log. Depending
    /// on `settings.on_error` the run continues with the next type or stops;
    /// either way the result is [`PruneError::Incomplete`].
    pub async fn run(
        &self,
        types: &[RecordType],
        settings: &RunSettings,
        sink: &dyn ProgressSink,
    ) -> Result<RunReport, PruneError> {
        let mut report = RunReport {
            dry_run: settings.mode.is_dry_run(),
            types: Vec::with_capacity(types.len()),
        };
        let mut failed = Vec::new();

        for record_type in types {
            match self.prune_type(record_type, settings, sink).await {
                Ok(type_report) => report.types.push(type_report),
                Err(e) => {
                    tracing::error!(
                        record_type = record_type.name(),
                        error = %e,
                        "Pruning failed"
                    );
                    sink.message(&format!("Failed pruning {}: {}", record_type.name(), e));
                    failed.push(record_type.name().to_string());

                    if settings.on_error == FailurePolicy::Abort {
                        break;
                    }
                }
            }
        }

        if !failed.is_empty() {
            return Err(PruneError::Incomplete {
                failed,
                completed: Box::new(report),
            });
        }

        sink.message("Prune complete!");
        Ok(report)
    }

    /// Run all three steps for one record type.
    pub async fn prune_type(
        &self,
        record_type: &RecordType,
        settings: &RunSettings,
        sink: &dyn ProgressSink,
    ) -> Result<TypeReport, PruneError> {
        sink.message(&format!("Beginning prune for {}", record_type.name()));

        let mut report = TypeReport::new(record_type.name());

        // Per-record trimming is the slow step
        if settings.fast {
            tracing::debug!(
                record_type = record_type.name(),
                "Fast mode, skipping old version trim"
            );
        } else {
            report.old_versions = self
                .trimmer
                .trim(record_type, settings.keep, settings.mode, sink)
                .await?;
        }

        report.archived_versions = self
            .archived
            .sweep_archived(record_type, settings.mode, sink)
            .await?;

        report.orphaned_versions = self
            .orphans
            .sweep_orphans(record_type, settings.mode, sink)
            .await?;

        sink.message(&format!("Done pruning {}", record_type.name()));
        Ok(report)
    }
}
