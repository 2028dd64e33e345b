//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_sales(db: &DbState) -> Result<Vec<SaleDto>, ApiError> {
//!     let sales = db.inner().sales().list_all().await?;
//!     Ok(sales.into_iter().map(SaleDto::from).collect())
//! }
//! ```

use stockroom_db::{Database, DbConfig, DbResult};

/// Wrapper around `Database` handed to every command.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens a private in-memory database (for tests).
    pub async fn in_memory() -> DbResult<Self> {
        Ok(DbState::new(Database::open(DbConfig::in_memory()).await?))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
