//! Prunes row-version history from versioned relational tables.
//!
//! Versioned records keep every saved state as a row in a companion
//! `{Table}_Versions` table keyed by `(RecordID, Version)`. Those tables grow
//! without bound. [`prune::RetentionPruner`] trims them back to a fixed number
//! of recent versions per record, drops the history of records that no longer
//! exist, and removes subtype version rows left without a base row.

pub mod catalog;
pub mod config;
pub mod db;
#[cfg(feature = "cli")]
pub mod observability;
pub mod prune;
