use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{
    error::DbResult,
    ident::Ident,
    query::{Dialect, PruneQuery, count_rows_sql, live_ids_sql, version_threshold_sql},
    repos::{VersionRepo, row_count},
};

const DIALECT: Dialect = Dialect::Postgres;

/// PostgreSQL version repository.
///
/// Everything that feeds a prune decision, dry-run counts included, runs on
/// the primary. The read pool only serves [`VersionRepo::count_versions`],
/// which is informational.
pub struct PostgresVersionRepo {
    write_pool: PgPool,
    read_pool: PgPool,
}

impl PostgresVersionRepo {
    pub fn new(write_pool: PgPool, read_pool: Option<PgPool>) -> Self {
        let read_pool = read_pool.unwrap_or_else(|| write_pool.clone());
        Self {
            write_pool,
            read_pool,
        }
    }
}

#[async_trait]
impl VersionRepo for PostgresVersionRepo {
    async fn count_live_records(&self, base: &Ident) -> DbResult<u64> {
        let sql = count_rows_sql(base, false, DIALECT);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.write_pool).await?;
        row_count(count)
    }

    async fn live_record_ids(&self, base: &Ident, batches: u64, batch: u64) -> DbResult<Vec<i64>> {
        let sql = live_ids_sql(base, DIALECT);
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(batches as i64)
            .bind(batch as i64)
            .fetch_all(&self.write_pool)
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
            .fetch_optional(&self.write_pool)
            .await?;
        Ok(threshold)
    }

    async fn count_matching(&self, query: &PruneQuery) -> DbResult<u64> {
        let sql = query.count_sql(DIALECT);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for value in query.binds() {
            q = q.bind(value);
        }
        row_count(q.fetch_one(&self.write_pool).await?)
    }

    async fn delete_matching(&self, query: &PruneQuery) -> DbResult<u64> {
        let sql = query.delete_sql(DIALECT);
        let mut q = sqlx::query(&sql);
        for value in query.binds() {
            q = q.bind(value);
        }
        let result = q.execute(&self.write_pool).await?;
        Ok(result.rows_affected())
    }

    async fn count_versions(&self, versions: &Ident, record_id: Option<i64>) -> DbResult<u64> {
        let sql = count_rows_sql(versions, record_id.is_some(), DIALECT);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(id) = record_id {
            q = q.bind(id);
        }
        row_count(q.fetch_one(&self.read_pool).await?)
    }
}
