mod error;
mod ident;
#[cfg(feature = "database-postgres")]
pub mod postgres;
mod query;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(all(test, any(feature = "database-sqlite", feature = "database-postgres")))]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use ident::{Ident, MAX_TABLE_NAME_LEN, VERSIONS_SUFFIX};
pub use query::{
    AntiJoinKey, Dialect, PruneQuery, count_rows_sql, live_ids_sql, version_threshold_sql,
};
pub use repos::*;

use crate::config::DatabaseConfig;

/// PostgreSQL pool configuration with optional read replica.
#[cfg(feature = "database-postgres")]
pub struct PgPoolPair {
    /// Primary pool. All prune queries run here.
    pub write: sqlx::PgPool,
    /// Optional read replica pool, used for informational counts.
    pub read: Option<sqlx::PgPool>,
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(feature = "database-postgres")]
    Postgres(PgPoolPair),
    #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
    _None(std::convert::Infallible),
}

/// Database pool supporting both SQLite and PostgreSQL.
///
/// The version repository is created once at construction.
pub struct DbPool {
    inner: PoolStorage,
    versions: Arc<dyn VersionRepo>,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        DbPool {
            versions: Arc::new(sqlite::SqliteVersionRepo::new(pool.clone())),
            inner: PoolStorage::Sqlite(pool),
        }
    }

    /// Create a DbPool from existing PostgreSQL pools.
    /// Primarily useful for testing.
    #[cfg(feature = "database-postgres")]
    pub fn from_postgres(write_pool: sqlx::PgPool, read_pool: Option<sqlx::PgPool>) -> Self {
        DbPool {
            versions: Arc::new(postgres::PostgresVersionRepo::new(
                write_pool.clone(),
                read_pool.clone(),
            )),
            inner: PoolStorage::Postgres(PgPoolPair {
                write: write_pool,
                read: read_pool,
            }),
        }
    }

    /// Create a database pool from configuration
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                tracing::debug!(path = %cfg.path, "Connected to SQLite database");
                Ok(Self::from_sqlite(pool))
            }
            #[cfg(feature = "database-postgres")]
            DatabaseConfig::Postgres(cfg) => {
                let write_pool = postgres_pool_options(cfg)
                    .connect_with(postgres_connect_options(&cfg.url, cfg)?)
                    .await?;

                let read_pool = if let Some(read_url) = &cfg.read_url {
                    tracing::info!("Configuring read replica pool");
                    Some(
                        postgres_pool_options(cfg)
                            .connect_with(postgres_connect_options(read_url, cfg)?)
                            .await?,
                    )
                } else {
                    None
                };

                tracing::debug!("Connected to PostgreSQL database");
                Ok(Self::from_postgres(write_pool, read_pool))
            }
        }
    }

    /// Get the version repository
    pub fn versions(&self) -> Arc<dyn VersionRepo> {
        Arc::clone(&self.versions)
    }

    /// SQL dialect of the underlying pool.
    pub fn dialect(&self) -> Dialect {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(_) => Dialect::Sqlite,
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(_) => Dialect::Postgres,
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }

    /// Close all pool connections, waiting for in-flight queries.
    pub async fn close(&self) {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => pool.close().await,
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(pools) => {
                pools.write.close().await;
                if let Some(read) = &pools.read {
                    read.close().await;
                }
            }
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }
}

#[cfg(feature = "database-postgres")]
fn postgres_pool_options(
    cfg: &crate::config::PostgresConfig,
) -> sqlx::postgres::PgPoolOptions {
    sqlx::postgres::PgPoolOptions::new()
        .min_connections(cfg.min_connections)
        .max_connections(cfg.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(std::time::Duration::from_secs(cfg.idle_timeout_secs))
}

#[cfg(feature = "database-postgres")]
fn postgres_connect_options(
    url: &str,
    cfg: &crate::config::PostgresConfig,
) -> DbResult<sqlx::postgres::PgConnectOptions> {
    use std::str::FromStr;

    let options = sqlx::postgres::PgConnectOptions::from_str(url)?;
    Ok(options.ssl_mode(cfg.ssl_mode.to_sqlx()))
}
