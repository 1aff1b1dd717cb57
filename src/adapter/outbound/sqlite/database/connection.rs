//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, connection configuration
//! and the mapping from Diesel failures onto transient/permanent store errors.

use std::path::Path;
use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::result::Error as DieselError;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result, StoreError};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const MEMORY_URL: &str = ":memory:";
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Applies per-connection pragmas whenever the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!("PRAGMA busy_timeout={BUSY_TIMEOUT_MS}"))
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// Every `:memory:` connection is a separate database, so an in-memory
/// pool is capped at a single connection that is never recycled.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder()
        .connection_timeout(Duration::from_secs(10))
        .connection_customizer(Box::new(SqlitePragmas));

    let builder = if database_url == MEMORY_URL {
        builder.max_size(1).max_lifetime(None).idle_timeout(None)
    } else {
        builder.max_size(5)
    };

    builder.build(manager).map_err(pool_error)
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(pool_error)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Permanent(format!("migration failed: {e}")))?;
    Ok(())
}

/// Create a pool and bring its schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open(database_url: &str) -> Result<DbPool> {
    let pool = create_pool(database_url)?;
    run_migrations(&pool)?;
    Ok(pool)
}

#[derive(diesel::QueryableByName)]
struct TableCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    tables: i64,
}

/// Open an existing database without creating or migrating anything.
///
/// # Errors
/// Returns a permanent error if the file does not exist or `table` is
/// missing from its schema.
pub fn open_existing(database_url: &str, table: &str) -> Result<DbPool> {
    if database_url != MEMORY_URL && !Path::new(database_url).exists() {
        return Err(StoreError::Permanent(format!("database '{database_url}' does not exist")).into());
    }

    let pool = create_pool(database_url)?;
    let mut conn = pool.get().map_err(pool_error)?;
    let found: TableCount = diesel::sql_query(
        "SELECT COUNT(*) AS tables FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind::<diesel::sql_types::Text, _>(table)
    .get_result(&mut conn)
    .map_err(query_error)?;
    if found.tables == 0 {
        return Err(StoreError::Permanent(format!(
            "database '{database_url}' has no '{table}' table; run `matchstats serve` once to create it"
        ))
        .into());
    }
    drop(conn);
    Ok(pool)
}

/// Failing to check out a connection means the pool is exhausted or the
/// file is momentarily unavailable; both may clear up on retry.
pub(crate) fn pool_error(err: PoolError) -> Error {
    StoreError::Transient(format!("connection pool: {err}")).into()
}

/// Classify a query failure.
pub(crate) fn query_error(err: DieselError) -> Error {
    let transient = match &err {
        DieselError::DatabaseError(_, info) => is_busy(info.message()),
        _ => false,
    };
    if transient {
        StoreError::Transient(err.to_string()).into()
    } else {
        StoreError::Permanent(err.to_string()).into()
    }
}

fn is_busy(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("database is locked") || message.contains("busy")
}
