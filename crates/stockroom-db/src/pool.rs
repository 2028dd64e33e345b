//! # Database Handle
//!
//! Opens the SQLite database and hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Lifetime                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← inventory.db by default                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config).await ← connect + schema::initialize           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  SqlitePool (one connection, kept open) │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├──► db.operators()        (CredentialStore)                     │
//! │       ├──► db.goods_receiving()                                        │
//! │       ├──► db.sales()                                                  │
//! │       └──► db.products()                                               │
//! │                                                                         │
//! │  App Exit ──► db.close().await                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is passed explicitly to every repository; there is no
//! global connection. Tests open their own `DbConfig::in_memory()`
//! database so each one starts from an empty, freshly seeded schema.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::goods_receiving::GoodsReceivingRepository;
use crate::repository::operator::OperatorRepository;
use crate::repository::product_master::ProductMasterRepository;
use crate::repository::sales::SalesRepository;
use crate::schema;

/// Path value that selects a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("inventory.db")
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections.
    /// Default: 1 (one operator, one connection)
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to create tables and seed operators on open.
    /// Default: true
    pub initialize_schema: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(30),
            initialize_schema: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to initialize the schema on open.
    pub fn initialize_schema(mut self, initialize: bool) -> Self {
        self.initialize_schema = initialize;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::open(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            connect_timeout: Duration::from_secs(5),
            initialize_schema: true,
        }
    }

    /// True when this config selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            // Create file if it doesn't exist
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Opens the connection and keeps it for the life of the handle
    /// 3. Creates tables and seeds operators (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError::ConnectionFailed)` - File could not be opened
    /// * `Err(DbError::SchemaFailed)` - Tables could not be created
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        // The connection must outlive idle periods: an in-memory database
        // disappears with its last connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database connection open"
        );

        let db = Database { pool };

        if config.initialize_schema {
            db.initialize_schema().await?;
        }

        Ok(db)
    }

    /// Creates missing tables and seeds operators. Safe to call again.
    pub async fn initialize_schema(&self) -> DbResult<()> {
        schema::initialize(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods; this is for diagnostics and tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the operator repository (the credential store).
    pub fn operators(&self) -> OperatorRepository {
        OperatorRepository::new(self.pool.clone())
    }

    /// Returns the goods receiving repository.
    pub fn goods_receiving(&self) -> GoodsReceivingRepository {
        GoodsReceivingRepository::new(self.pool.clone())
    }

    /// Returns the sales repository.
    pub fn sales(&self) -> SalesRepository {
        SalesRepository::new(self.pool.clone())
    }

    /// Returns the product master repository.
    pub fn products(&self) -> ProductMasterRepository {
        ProductMasterRepository::new(self.pool.clone())
    }

    /// Closes the connection.
    ///
    /// ## Note
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.operators().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::open(DbConfig::in_memory()).await.unwrap();
        let second = Database::open(DbConfig::in_memory()).await.unwrap();

        sqlx::query("DELETE FROM users")
            .execute(first.pool())
            .await
            .unwrap();

        assert_eq!(first.operators().count().await.unwrap(), 0);
        assert_eq!(second.operators().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(0)
            .connect_timeout(Duration::from_secs(2))
            .initialize_schema(false);

        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(!config.initialize_schema);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_unwritable_location_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("inventory.db");

        let result = Database::open(DbConfig::new(path)).await;
        assert!(matches!(result, Err(DbError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_closed_database_rejects_queries() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let result = db.operators().count().await;
        assert!(matches!(result, Err(DbError::ConnectionFailed(_))));
    }
}
