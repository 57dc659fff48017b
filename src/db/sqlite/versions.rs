use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{
    error::DbResult,
    ident::Ident,
    query::{Dialect, PruneQuery, count_rows_sql, live_ids_sql, version_threshold_sql},
    repos::{VersionRepo, row_count},
};

const DIALECT: Dialect = Dialect::Sqlite;

pub struct SqliteVersionRepo {
    pool: SqlitePool,
}

impl SqliteVersionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionRepo for SqliteVersionRepo {
    async fn count_live_records(&self, base: &Ident) -> DbResult<u64> {
        let sql = count_rows_sql(base, false, DIALECT);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        row_count(count)
    }

    async fn live_record_ids(&self, base: &Ident, batches: u64, batch: u64) -> DbResult<Vec<i64>> {
        let sql = live_ids_sql(base, DIALECT);
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(batches as i64)
            .bind(batch as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn version_threshold(
        &self,
        versions: &Ident,
        record_id: i64,
        keep: u32,
    ) -> DbResult<Option<i64>> {
        let sql = version_threshold_sql(versions, DIALECT);
        let threshold: Option<i64> = sqlx::query_scalar(&sql)
            .bind(record_id)
            .bind(i64::from(keep))
            .fetch_optional(&self.pool)
            .await?;
        Ok(threshold)
    }

    async fn count_matching(&self, query: &PruneQuery) -> DbResult<u64> {
        let sql = query.count_sql(DIALECT);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for value in query.binds() {
            q = q.bind(value);
        }
        row_count(q.fetch_one(&self.pool).await?)
    }

    async fn delete_matching(&self, query: &PruneQuery) -> DbResult<u64> {
        let sql = query.delete_sql(DIALECT);
        let mut q = sqlx::query(&sql);
        for value in query.binds() {
            q = q.bind(value);
        }
        let result = q.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count_versions(&self, versions: &Ident, record_id: Option<i64>) -> DbResult<u64> {
        let sql = count_rows_sql(versions, record_id.is_some(), DIALECT);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(id) = record_id {
            q = q.bind(id);
        }
        row_count(q.fetch_one(&self.pool).await?)
    }
}
