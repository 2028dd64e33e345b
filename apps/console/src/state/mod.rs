//! # State Module
//!
//! Long-lived values the console and commands share.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                        │
//! │          ▼                                     ▼                        │
//! │  ┌──────────────────┐                 ┌──────────────────┐              │
//! │  │     DbState      │                 │    AppConfig     │              │
//! │  │                  │                 │                  │              │
//! │  │  Database        │                 │  database_path   │              │
//! │  │  (one SQLite     │                 │  image_dir       │              │
//! │  │   connection)    │                 │                  │              │
//! │  └──────────────────┘                 └──────────────────┘              │
//! │                                                                         │
//! │  • DbState: the pool is safe to share; no locking needed               │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{AppConfig, DEFAULT_DB_PATH, DEFAULT_IMAGE_DIR};
pub use db::DbState;
