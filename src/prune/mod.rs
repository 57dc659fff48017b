//! Version history pruning.
//!
//! A run visits each versioned record type and:
//! 1. Trims each live record's history to the `keep` most recent versions
//! 2. Deletes all versions of records no longer in the live table
//! 3. Deletes subtype-table versions with no matching base-table version
//!
//! Every step derives its targets from the current store state, so a run that
//! is interrupted can simply be started again, and a second run with the same
//! settings prunes nothing. Dry runs count the same rows without deleting.

mod archived;
mod error;
mod orphans;
mod progress;
mod pruner;
mod report;
mod settings;
mod trimmer;


pub use archived::ArchivedVersionSweeper;
pub use error::PruneError;
pub use orphans::OrphanedSubtypeSweeper;
pub use progress::{BufferedSink, ConsoleSink, ProgressSink};
pub use pruner::RetentionPruner;
pub use report::{RunReport, TypeReport};
pub use settings::{DEFAULT_KEEP_VERSIONS, InvocationMode, KeepVersions, RunMode, RunSettings};
pub use trimmer::OldVersionTrimmer;
