//! Parameterized SQL templates for the prune operations.
//!
//! Pruning needs only two query shapes: a rank-based threshold per record
//! ("the version at descending rank N+1") and an anti-join ("rows of a table
//! with no matching anchor row"). Identifiers come from [`Ident`] and are
//! always quoted; every value is a bind parameter.
//!
//! A count and a delete for the same [`PruneQuery`] share one WHERE clause,
//! so a dry run reports exactly the rows a real run would remove.

use super::ident::Ident;

/// SQL dialect, which only affects placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `?` placeholders.
    Sqlite,
    /// `$1`, `$2`, ... placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::Sqlite => "?".to_string(),
            Dialect::Postgres => format!("${n}"),
        }
    }
}

/// Key an anti-join matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiJoinKey {
    /// `anchor."ID" = table."RecordID"`: the owning live record.
    LiveRecord,
    /// `(RecordID, Version)` equal in both tables: the base-table version row.
    RecordVersion,
}

/// A set of version rows to count or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneQuery {
    /// Versions of one record at or below `threshold`.
    VersionsUpTo {
        versions: Ident,
        record_id: i64,
        threshold: i64,
    },
    /// Rows of `table` without a matching row in `anchor`.
    AntiJoin {
        table: Ident,
        anchor: Ident,
        key: AntiJoinKey,
    },
}

impl PruneQuery {
    /// Versions of `record_id` in `{base}_Versions` numbered `threshold` or lower.
    pub fn versions_up_to(base: &Ident, record_id: i64, threshold: i64) -> Self {
        PruneQuery::VersionsUpTo {
            versions: base.versions(),
            record_id,
            threshold,
        }
    }

    /// Rows in `{base}_Versions` whose record is gone from `base`.
    pub fn archived_versions(base: &Ident) -> Self {
        PruneQuery::AntiJoin {
            table: base.versions(),
            anchor: base.clone(),
            key: AntiJoinKey::LiveRecord,
        }
    }

    /// Rows in `{subtype}_Versions` with no `(RecordID, Version)` match in
    /// `{base}_Versions`.
    pub fn orphaned_subtype_versions(base: &Ident, subtype: &Ident) -> Self {
        PruneQuery::AntiJoin {
            table: subtype.versions(),
            anchor: base.versions(),
            key: AntiJoinKey::RecordVersion,
        }
    }

    /// The table rows are removed from. Only this table is ever modified.
    pub fn target(&self) -> &Ident {
        match self {
            PruneQuery::VersionsUpTo { versions, .. } => versions,
            PruneQuery::AntiJoin { table, .. } => table,
        }
    }

    /// Bind values, in placeholder order.
    pub fn binds(&self) -> Vec<i64> {
        match self {
            PruneQuery::VersionsUpTo {
                record_id,
                threshold,
                ..
            } => vec![*record_id, *threshold],
            PruneQuery::AntiJoin { .. } => Vec::new(),
        }
    }

    fn where_clause(&self, dialect: Dialect) -> String {
        match self {
            PruneQuery::VersionsUpTo { .. } => format!(
                r#""RecordID" = {} AND "Version" <= {}"#,
                dialect.placeholder(1),
                dialect.placeholder(2)
            ),
            PruneQuery::AntiJoin { table, anchor, key } => {
                let t = table.quoted();
                let a = anchor.quoted();
                let on = match key {
                    AntiJoinKey::LiveRecord => format!(r#"{a}."ID" = {t}."RecordID""#),
                    AntiJoinKey::RecordVersion => format!(
                        r#"{a}."RecordID" = {t}."RecordID" AND {a}."Version" = {t}."Version""#
                    ),
                };
                format!("NOT EXISTS (SELECT 1 FROM {a} WHERE {on})")
            }
        }
    }

    /// `SELECT COUNT(*)` over the matching rows.
    pub fn count_sql(&self, dialect: Dialect) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.target().quoted(),
            self.where_clause(dialect)
        )
    }

    /// `DELETE` of the matching rows.
    pub fn delete_sql(&self, dialect: Dialect) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.target().quoted(),
            self.where_clause(dialect)
        )
    }
}

/// Version number at descending rank `offset + 1` for one record.
///
/// Binds: record id, offset.
pub fn version_threshold_sql(versions: &Ident, dialect: Dialect) -> String {
    format!(
        r#"SELECT CAST("Version" AS BIGINT) FROM {} WHERE "RecordID" = {} ORDER BY "Version" DESC LIMIT 1 OFFSET {}"#,
        versions.quoted(),
        dialect.placeholder(1),
        dialect.placeholder(2)
    )
}

/// Ids of live records in one batch, partitioned by `|ID| mod batches`.
///
/// Binds: batch count, batch index.
pub fn live_ids_sql(base: &Ident, dialect: Dialect) -> String {
    format!(
        r#"SELECT CAST("ID" AS BIGINT) FROM {} WHERE ABS("ID") % {} = {} ORDER BY "ID""#,
        base.quoted(),
        dialect.placeholder(1),
        dialect.placeholder(2)
    )
}

/// Row count of a table, optionally restricted to one record.
///
/// Binds: record id when `by_record` is set.
pub fn count_rows_sql(table: &Ident, by_record: bool, dialect: Dialect) -> String {
    if by_record {
        format!(
            r#"SELECT COUNT(*) FROM {} WHERE "RecordID" = {}"#,
            table.quoted(),
            dialect.placeholder(1)
        )
    } else {
        format!("SELECT COUNT(*) FROM {}", table.quoted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        Ident::new(name).unwrap()
    }

    #[test]
    fn test_versions_up_to_sqlite() {
        let query = PruneQuery::versions_up_to(&ident("SiteTree"), 10, 3);
        assert_eq!(query.target().as_str(), "SiteTree_Versions");
        assert_eq!(query.binds(), vec![10, 3]);
        assert_eq!(
            query.delete_sql(Dialect::Sqlite),
            r#"DELETE FROM "SiteTree_Versions" WHERE "RecordID" = ? AND "Version" <= ?"#
        );
        assert_eq!(
            query.count_sql(Dialect::Sqlite),
            r#"SELECT COUNT(*) FROM "SiteTree_Versions" WHERE "RecordID" = ? AND "Version" <= ?"#
        );
    }

    #[test]
    fn test_versions_up_to_postgres_placeholders() {
        let query = PruneQuery::versions_up_to(&ident("SiteTree"), 10, 3);
        assert_eq!(
            query.delete_sql(Dialect::Postgres),
            r#"DELETE FROM "SiteTree_Versions" WHERE "RecordID" = $1 AND "Version" <= $2"#
        );
    }

    #[test]
    fn test_archived_versions_anti_join() {
        let query = PruneQuery::archived_versions(&ident("SiteTree"));
        assert!(query.binds().is_empty());
        assert_eq!(
            query.delete_sql(Dialect::Postgres),
            r#"DELETE FROM "SiteTree_Versions" WHERE NOT EXISTS (SELECT 1 FROM "SiteTree" WHERE "SiteTree"."ID" = "SiteTree_Versions"."RecordID")"#
        );
    }

    #[test]
    fn test_orphaned_subtype_versions_anti_join() {
        let query = PruneQuery::orphaned_subtype_versions(&ident("SiteTree"), &ident("Page"));
        assert_eq!(query.target().as_str(), "Page_Versions");
        assert_eq!(
            query.count_sql(Dialect::Sqlite),
            r#"SELECT COUNT(*) FROM "Page_Versions" WHERE NOT EXISTS (SELECT 1 FROM "SiteTree_Versions" WHERE "SiteTree_Versions"."RecordID" = "Page_Versions"."RecordID" AND "SiteTree_Versions"."Version" = "Page_Versions"."Version")"#
        );
    }

    #[test]
    fn test_count_and_delete_share_predicate() {
        let query = PruneQuery::orphaned_subtype_versions(&ident("Base"), &ident("Child"));
        let count = query.count_sql(Dialect::Postgres);
        let delete = query.delete_sql(Dialect::Postgres);
        let count_where = count.split_once(" WHERE ").unwrap().1;
        let delete_where = delete.split_once(" WHERE ").unwrap().1;
        assert_eq!(count_where, delete_where);
    }

    #[test]
    fn test_threshold_and_batch_templates() {
        let base = ident("SiteTree");
        assert_eq!(
            version_threshold_sql(&base.versions(), Dialect::Postgres),
            r#"SELECT CAST("Version" AS BIGINT) FROM "SiteTree_Versions" WHERE "RecordID" = $1 ORDER BY "Version" DESC LIMIT 1 OFFSET $2"#
        );
        assert_eq!(
            live_ids_sql(&base, Dialect::Sqlite),
            r#"SELECT CAST("ID" AS BIGINT) FROM "SiteTree" WHERE ABS("ID") % ? = ? ORDER BY "ID""#
        );
        assert_eq!(
            count_rows_sql(&base, false, Dialect::Sqlite),
            r#"SELECT COUNT(*) FROM "SiteTree""#
        );
        assert_eq!(
            count_rows_sql(&base.versions(), true, Dialect::Postgres),
            r#"SELECT COUNT(*) FROM "SiteTree_Versions" WHERE "RecordID" = $1"#
        );
    }
}
