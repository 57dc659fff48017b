//! Record type catalog configuration.
//!
//! Each entry names a versioned live table and, for class hierarchies, the
//! subtype tables that store one version row per version event alongside it.
//!
//! # Example
//!
//! ```toml
//! [[catalog.types]]
//! base_table = "SiteTree"
//! subtype_tables = ["Page", "RedirectorPage", "VirtualPage"]
//!
//! [[catalog.types]]
//! name = "Files"
//! base_table = "File"
//! subtype_tables = ["Image"]
//! ```

use serde::{Deserialize, Serialize};

/// The configured set of versioned record types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Record types, in processing order.
    #[serde(default)]
    pub types: Vec<RecordTypeConfig>,
}

/// One versioned record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordTypeConfig {
    /// Display name. Defaults to the base table name.
    #[serde(default)]
    pub name: Option<String>,

    /// Live table holding the current record state, keyed by `ID`.
    pub base_table: String,

    /// Subtype tables with their own `_Versions` tables.
    #[serde(default)]
    pub subtype_tables: Vec<String>,
}
