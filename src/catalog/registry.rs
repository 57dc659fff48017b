use std::collections::{HashMap, HashSet};

use super::types::RecordType;
use crate::{
    config::CatalogConfig,
    db::{DbError, Ident},
};

/// Catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no record types configured")]
    Empty,

    #[error("{0}")]
    InvalidTable(#[from] DbError),

    #[error("base table {0} is declared more than once")]
    DuplicateBaseTable(String),

    #[error("record type {0} is its own subtype through a cycle of subtype_tables")]
    SubtypeCycle(String),

    #[error("table {table} belongs to two hierarchies, rooted at {first} and {second}")]
    ConflictingHierarchy {
        table: String,
        first: String,
        second: String,
    },
}

/// Source of versioned record types.
pub trait TypeCatalog: Send + Sync {
    /// All record types, in catalog order.
    fn record_types(&self) -> Vec<RecordType>;

    /// Hierarchy roots only, in catalog order.
    ///
    /// Pruning a root covers its subtype tables, so these are the types a run
    /// iterates.
    fn base_types(&self) -> Vec<RecordType> {
        self.record_types()
            .into_iter()
            .filter(RecordType::is_hierarchy_root)
            .collect()
    }
}

/// A fixed list of record types, usually built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    types: Vec<RecordType>,
}

impl StaticCatalog {
    /// Build a catalog from descriptors.
    ///
    /// A type whose base table is listed as a subtype table of another type
    /// is a non-root. Its subtype tables are folded into its root's, so a
    /// hierarchy declared over several entries is still swept as one.
    pub fn new(types: Vec<RecordType>) -> Result<Self, CatalogError> {
        if types.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for record_type in &types {
            if !seen.insert(record_type.base_table().clone()) {
                return Err(CatalogError::DuplicateBaseTable(
                    record_type.base_table().to_string(),
                ));
            }
        }

        // Base table -> indexes of the types that list it as a subtype
        let mut owners: HashMap<&Ident, Vec<usize>> = HashMap::new();
        for (i, record_type) in types.iter().enumerate() {
            for subtype in record_type.subtype_tables() {
                owners.entry(subtype).or_default().push(i);
            }
        }

        let roots = (0..types.len())
            .map(|i| resolve_root(i, &types, &owners, &mut Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;

        let merged: Vec<Option<Vec<Ident>>> = (0..types.len())
            .map(|i| {
                (roots[i] == i).then(|| {
                    types
                        .iter()
                        .zip(&roots)
                        .filter(|(_, root)| **root == i)
                        .flat_map(|(t, _)| t.subtype_tables().iter().cloned())
                        .collect()
                })
            })
            .collect();

        let types = types
            .into_iter()
            .zip(merged)
            .map(|(t, subtypes)| match subtypes {
                Some(subtypes) => t.with_subtype_tables(subtypes).with_hierarchy_root(true),
                None => t.with_hierarchy_root(false),
            })
            .collect();

        Ok(Self { types })
    }

    /// Build a catalog from the `[[catalog.types]]` config section.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let types = config
            .types
            .iter()
            .map(|entry| {
                let subtypes = entry
                    .subtype_tables
                    .iter()
                    .map(Ident::new)
                    .collect::<Result<Vec<_>, _>>()?;
                let record_type =
                    RecordType::new(Ident::new(&entry.base_table)?).with_subtype_tables(subtypes);
                Ok::<_, CatalogError>(match &entry.name {
                    Some(name) => record_type.with_name(name),
                    None => record_type,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(types)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Index of the root type owning `index`, following subtype declarations
/// upwards. `path` holds the types visited on the way.
fn resolve_root(
    index: usize,
    types: &[RecordType],
    owners: &HashMap<&Ident, Vec<usize>>,
    path: &mut Vec<usize>,
) -> Result<usize, CatalogError> {
    let base = types[index].base_table();
    if path.contains(&index) {
        return Err(CatalogError::SubtypeCycle(base.to_string()));
    }
    let Some(parents) = owners.get(base) else {
        return Ok(index);
    };

    path.push(index);
    let mut root: Option<usize> = None;
    for &parent in parents {
        let parent_root = resolve_root(parent, types, owners, path)?;
        match root {
            Some(first) if first != parent_root => {
                return Err(CatalogError::ConflictingHierarchy {
                    table: base.to_string(),
                    first: types[first].base_table().to_string(),
                    second: types[parent_root].base_table().to_string(),
                });
            }
            _ => root = Some(parent_root),
        }
    }
    path.pop();

    Ok(root.unwrap_or(index))
}

impl TypeCatalog for StaticCatalog {
    fn record_types(&self) -> Vec<RecordType> {
        self.types.clone()
    }
}
