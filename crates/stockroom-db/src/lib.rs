//! # stockroom-db: Database Layer for Stockroom
//!
//! This crate provides database access for the Stockroom inventory app.
//! It uses a single SQLite file for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Console command (record_sale)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories   │   │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │                 │   │ (schema.rs)  │  │   │
//! │  │   │               │    │ OperatorRepo    │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ GoodsReceiving  │   │ CREATE TABLE │  │   │
//! │  │   │ Open / Close  │    │ Sales           │   │ seed users   │  │   │
//! │  │   │               │    │ ProductMaster   │   │              │  │   │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./inventory.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database and handing out repositories
//! - [`schema`] - Table creation and operator seeding
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{CredentialStore, Database, DbConfig};
//!
//! // Open (and if needed create) the database
//! let db = Database::open(DbConfig::new("inventory.db")).await?;
//!
//! // Check a login
//! let ok = db.operators().authenticate("operator1", "password123").await?;
//!
//! // Use repositories
//! let id = db.sales().insert(&form).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::goods_receiving::GoodsReceivingRepository;
pub use repository::operator::{CredentialStore, OperatorRepository};
pub use repository::product_master::ProductMasterRepository;
pub use repository::sales::SalesRepository;
