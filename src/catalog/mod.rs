//! Record type catalog.
//!
//! The pruner never discovers versioned tables on its own. It is handed a
//! list of [`RecordType`] descriptors, each naming a live table and the
//! subtype tables of its class hierarchy, and prunes exactly those.
//!
//! [`StaticCatalog`] builds that list from the `[[catalog.types]]` config
//! section. Other catalogs (e.g. generated from an ORM's schema) plug in by
//! implementing [`TypeCatalog`].

mod registry;
mod types;

pub use registry::{CatalogError, StaticCatalog, TypeCatalog};
pub use types::RecordType;
