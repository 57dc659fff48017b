/// Rows pruned for one record type.
///
/// On a dry run these are the rows that would have been pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeReport {
    pub record_type: String,
    /// Versions older than the retained count, from the base version table.
    pub old_versions: u64,
    /// Versions of records no longer in the live table.
    pub archived_versions: u64,
    /// Subtype version rows without a base version row, across all subtypes.
    pub orphaned_versions: u64,
}

impl TypeReport {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            ..Default::default()
        }
    }

    pub fn total(&self) -> u64 {
        self.old_versions + self.archived_versions + self.orphaned_versions
    }
}

/// Results from a single prune run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub dry_run: bool,
    pub types: Vec<TypeReport>,
}

impl RunReport {
    /// Total number of rows pruned across all record types.
    pub fn total(&self) -> u64 {
        self.types.iter().map(TypeReport::total).sum()
    }

    /// Check if any rows were pruned.
    pub fn has_deletions(&self) -> bool {
        self.total() > 0
    }
}
