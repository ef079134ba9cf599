//! Database module for persistent storage.
//!
//! Provides async SQLite database access using SQLx for:
//! - User accounts
//! - Devices and their API keys
//! - Streams
//! - Phone carriers
//!
//! [`Database`] implements [`Storage`](crate::storage::Storage) by delegating
//! to the per-entity repositories.

mod carriers;
mod devices;
mod storage;
mod streams;
mod users;

pub use carriers::CarrierRepository;
pub use devices::DeviceRepository;
pub(crate) use devices::generate_api_key;
pub use streams::StreamRepository;
pub use users::UserRepository;
pub(crate) use users::hash_password;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("stream not found: {0}")]
    StreamNotFound(String),
    #[error("phone carrier not found: {0}")]
    CarrierNotFound(String),
    #[error("user already exists: {0}")]
    UserExists(String),
    #[error("device already exists: {0}")]
    DeviceExists(String),
    #[error("stream already exists: {0}")]
    StreamExists(String),
    #[error("phone carrier already exists: {0}")]
    CarrierExists(String),
    #[error("invalid password")]
    InvalidPassword,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether this error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::UserNotFound(_)
                | DbError::DeviceNotFound(_)
                | DbError::StreamNotFound(_)
                | DbError::CarrierNotFound(_)
        )
    }
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents connection storms from blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Open a database, running migrations if needed.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let pool = if path == ":memory:" {
            // Uniquely named shared-cache database per call so parallel tests
            // never see each other's rows.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:streamgate-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .foreign_keys(true)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            // Foreign keys are a per-connection setting, so they go on the
            // connect options rather than a one-off PRAGMA.
            let options = SqliteConnectOptions::new()
                .filename(path)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::run_migrations(&pool).await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Internal(format!(
                "integrity check failed: {integrity_result}"
            )));
        }

        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }

    /// Get user repository.
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Get device repository.
    pub fn devices(&self) -> DeviceRepository<'_> {
        DeviceRepository::new(&self.pool)
    }

    /// Get stream repository.
    pub fn streams(&self) -> StreamRepository<'_> {
        StreamRepository::new(&self.pool)
    }

    /// Get phone carrier repository.
    pub fn carriers(&self) -> CarrierRepository<'_> {
        CarrierRepository::new(&self.pool)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}

/// Map a UNIQUE constraint violation to a domain error, anything else to `Sqlx`.
fn unique_or(err: sqlx::Error, exists: impl FnOnce() -> DbError) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return exists();
    }
    DbError::from(err)
}

/// Current unix timestamp in seconds.
fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
