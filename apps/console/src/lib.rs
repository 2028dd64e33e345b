//! # Stockroom Console Library
//!
//! Core library for the Stockroom operator console.
//! This is the main entry point that opens the database and runs the
//! console loop.
//!
//! ## Module Organization
//! ```text
//! stockroom_console/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── console.rs      ◄─── Login prompt, menu and forms
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Shared DTOs
//! │   ├── auth.rs     ◄─── Login
//! │   ├── receiving.rs◄─── Goods receiving
//! │   ├── sales.rs    ◄─── Sales
//! │   └── product.rs  ◄─── Product master
//! └── error.rs        ◄─── ApiError and StartupError
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use console::Console;
use error::StartupError;
use state::{AppConfig, DbState};
use stockroom_db::{Database, DbConfig};

/// Runs the console application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Read Configuration ───────────────────────────────────────────────► │
/// │     • INVENTORY_DB_PATH   (default inventory.db)                        │
/// │     • INVENTORY_IMAGE_DIR (default product_images)                      │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • Create file and tables if missing                                 │
/// │     • Seed operators into an empty users table                          │
/// │                                                                         │
/// │  4. Run Console on stdin/stdout ──────────────────────────────────────► │
/// │                                                                         │
/// │  5. Close Database ───────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Errors
/// Any `StartupError` is fatal; `main` prints it and exits with status 1.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    info!("Starting Stockroom");

    let config = AppConfig::from_env();
    let db = start(&config).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(&db, &config, stdin, tokio::io::stdout());
    let result = console.run().await;

    db.inner().close().await;
    info!("Stockroom stopped");

    Ok(result?)
}

/// Prepares the image directory and opens the database.
///
/// ## Returns
/// * `Ok(DbState)` - Database open, tables present, operators seeded
/// * `Err(StartupError)` - The app cannot run
pub async fn start(config: &AppConfig) -> Result<DbState, StartupError> {
    std::fs::create_dir_all(&config.image_dir).map_err(|source| StartupError::ImageDir {
        path: config.image_dir.clone(),
        source,
    })?;

    info!(path = %config.database_path.display(), "Database path determined");

    let db = Database::open(DbConfig::new(&config.database_path))
        .await
        .map_err(|source| StartupError::Database {
            path: config.database_path.clone(),
            source,
        })?;

    info!("Database ready");
    Ok(DbState::new(db))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Show trace for stockroom crates only
/// - Default: `info,stockroom=debug,sqlx=warn`
///
/// Logs go to stderr so they never mix with the prompts on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_creates_database_and_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("inventory.db"),
            image_dir: dir.path().join("images"),
        };

        let db = start(&config).await.unwrap();

        assert!(config.database_path.exists());
        assert!(config.image_dir.is_dir());
        assert_eq!(db.inner().operators().count().await.unwrap(), 2);
        db.inner().close().await;
    }

    #[tokio::test]
    async fn test_restart_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("inventory.db"),
            image_dir: dir.path().join("images"),
        };
        let form = stockroom_core::forms::SaleForm {
            customer_name: "Jane".to_string(),
            product_name: "Rice".to_string(),
            quantity: "1".to_string(),
            unit: "kg".to_string(),
            unit_price: "3".to_string(),
            tax_percent: String::new(),
        };

        let db = start(&config).await.unwrap();
        commands::sales::record_sale(&db, &form).await.unwrap();
        db.inner().close().await;

        let db = start(&config).await.unwrap();
        assert_eq!(commands::sales::list_sales(&db).await.unwrap().len(), 1);
        assert_eq!(db.inner().operators().count().await.unwrap(), 2);
        db.inner().close().await;
    }

    #[tokio::test]
    async fn test_unopenable_database_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("missing").join("inventory.db"),
            image_dir: dir.path().join("images"),
        };

        let err = start(&config).await.unwrap_err();
        assert!(matches!(err, StartupError::Database { .. }));
    }

    #[tokio::test]
    async fn test_incompatible_existing_database_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("inventory.db"),
            image_dir: dir.path().join("images"),
        };

        let legacy = Database::open(DbConfig::new(&config.database_path).initialize_schema(false))
            .await
            .unwrap();
        sqlx::query("CREATE TABLE product_master (id INTEGER PRIMARY KEY, price REAL)")
            .execute(legacy.pool())
            .await
            .unwrap();
        legacy.close().await;

        let err = start(&config).await.unwrap_err();
        assert!(matches!(err, StartupError::Database { .. }));
        assert!(err.to_string().contains(&config.database_path.display().to_string()));
    }

    #[tokio::test]
    async fn test_image_dir_blocked_by_file_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("images");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let config = AppConfig {
            database_path: dir.path().join("inventory.db"),
            image_dir: blocker,
        };

        let err = start(&config).await.unwrap_err();
        assert!(matches!(err, StartupError::ImageDir { .. }));
    }
}
