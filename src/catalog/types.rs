use crate::db::Ident;

/// A versioned record type.
///
/// Every table named here has a matching `{table}_Versions` history table
/// keyed by `(RecordID, Version)`; the base table itself is keyed by `ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    base_table: Ident,
    subtype_tables: Vec<Ident>,
    hierarchy_root: bool,
}

impl RecordType {
    /// A root record type named after its base table, with no subtypes.
    pub fn new(base_table: Ident) -> Self {
        Self {
            name: base_table.to_string(),
            base_table,
            subtype_tables: Vec::new(),
            hierarchy_root: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the subtype tables.
    ///
    /// Keeps first-seen order, drops duplicates and drops the base table.
    pub fn with_subtype_tables(mut self, tables: impl IntoIterator<Item = Ident>) -> Self {
        let mut subtypes: Vec<Ident> = Vec::new();
        for table in tables {
            if table != self.base_table && !subtypes.contains(&table) {
                subtypes.push(table);
            }
        }
        self.subtype_tables = subtypes;
        self
    }

    pub fn with_hierarchy_root(mut self, hierarchy_root: bool) -> Self {
        self.hierarchy_root = hierarchy_root;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_table(&self) -> &Ident {
        &self.base_table
    }

    /// The base table's history table, e.g. `SiteTree_Versions`.
    pub fn versions_table(&self) -> Ident {
        self.base_table.versions()
    }

    pub fn subtype_tables(&self) -> &[Ident] {
        &self.subtype_tables
    }

    /// True when no other versioned type owns this type's base table.
    pub fn is_hierarchy_root(&self) -> bool {
        self.hierarchy_root
    }
}
