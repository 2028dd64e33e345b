//! # Schema Initializer
//!
//! Creates the four Stockroom tables and seeds the default operators.
//!
//! ## Startup Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Initialization                              │
//! │                                                                         │
//! │  Database::open                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CREATE TABLE IF NOT EXISTS users                                      │
//! │  CREATE TABLE IF NOT EXISTS goods_receiving                            │
//! │  CREATE TABLE IF NOT EXISTS sales                                      │
//! │  CREATE TABLE IF NOT EXISTS product_master                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pragma_table_info(<table>) == expected columns?                       │
//! │       ├── no  → DbError::SchemaFailed                                  │
//! │       ▼ yes                                                             │
//! │  SELECT COUNT(*) FROM users                                            │
//! │       │                                                                 │
//! │       ├── 0 → INSERT operator1, operator2                              │
//! │       └── >0 → nothing to do                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is a no-op on an existing database, so this runs on every
//! start. The schema is fixed: there is no migration mechanism, and a
//! table that already exists is never altered. An existing table whose
//! columns differ from the ones below (a file written by another program
//! under the same name) fails startup with `DbError::SchemaFailed`
//! instead of failing every later read and write.
//!
//! `product_master.barcode` carries no UNIQUE index; the
//! master list accepts the same barcode twice.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Operators inserted into an empty `users` table.
pub const SEED_OPERATORS: [(&str, &str); 2] =
    [("operator1", "password123"), ("operator2", "password123")];

/// Names of the tables this module creates.
pub const TABLES: [&str; 4] = ["users", "goods_receiving", "sales", "product_master"];

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL CHECK (username <> ''),
        password TEXT NOT NULL
    )
"#;

const CREATE_GOODS_RECEIVING: &str = r#"
    CREATE TABLE IF NOT EXISTS goods_receiving (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name TEXT NOT NULL,
        supplier_name TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        unit_of_measurement TEXT NOT NULL,
        unit_cost_cents INTEGER NOT NULL CHECK (unit_cost_cents >= 0),
        tax_rate_bps INTEGER NOT NULL DEFAULT 0,
        total_cents INTEGER NOT NULL,
        received_at TEXT NOT NULL
    )
"#;

const CREATE_SALES: &str = r#"
    CREATE TABLE IF NOT EXISTS sales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name TEXT NOT NULL,
        customer_name TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        unit_of_measurement TEXT NOT NULL,
        unit_price_cents INTEGER NOT NULL CHECK (unit_price_cents >= 0),
        tax_rate_bps INTEGER NOT NULL DEFAULT 0,
        total_cents INTEGER NOT NULL,
        sold_at TEXT NOT NULL
    )
"#;

const CREATE_PRODUCT_MASTER: &str = r#"
    CREATE TABLE IF NOT EXISTS product_master (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        barcode TEXT NOT NULL,
        sku_id TEXT NOT NULL,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL,
        product_image_path TEXT,
        product_name TEXT NOT NULL,
        description TEXT,
        tax_rate_bps INTEGER NOT NULL DEFAULT 0,
        price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
        default_unit_of_measurement TEXT NOT NULL
    )
"#;

/// Columns each table must have, in declaration order.
const EXPECTED_COLUMNS: [(&str, &[&str]); 4] = [
    ("users", &["id", "username", "password"]),
    (
        "goods_receiving",
        &[
            "id",
            "product_name",
            "supplier_name",
            "quantity",
            "unit_of_measurement",
            "unit_cost_cents",
            "tax_rate_bps",
            "total_cents",
            "received_at",
        ],
    ),
    (
        "sales",
        &[
            "id",
            "product_name",
            "customer_name",
            "quantity",
            "unit_of_measurement",
            "unit_price_cents",
            "tax_rate_bps",
            "total_cents",
            "sold_at",
        ],
    ),
    (
        "product_master",
        &[
            "id",
            "barcode",
            "sku_id",
            "category",
            "subcategory",
            "product_image_path",
            "product_name",
            "description",
            "tax_rate_bps",
            "price_cents",
            "default_unit_of_measurement",
        ],
    ),
];

/// Creates missing tables and seeds the default operators.
///
/// ## Safety
/// - Idempotent: safe to run on every start
/// - Seeds only when `users` is empty, so a second run adds nothing
///
/// ## Errors
/// Any failure is reported as `DbError::SchemaFailed`; the caller cannot
/// continue without these tables. That includes a table left by an
/// earlier, incompatible layout.
pub async fn initialize(pool: &SqlitePool) -> DbResult<()> {
    info!("Initializing schema");

    for ddl in [
        CREATE_USERS,
        CREATE_GOODS_RECEIVING,
        CREATE_SALES,
        CREATE_PRODUCT_MASTER,
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }

    verify_columns(pool).await?;
    debug!(tables = ?TABLES, "Tables present");

    seed_operators(pool).await?;

    info!("Schema ready");
    Ok(())
}

/// Checks every table against `EXPECTED_COLUMNS`.
async fn verify_columns(pool: &SqlitePool) -> DbResult<()> {
    for (table, expected) in EXPECTED_COLUMNS {
        let found: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
                .bind(table)
                .fetch_all(pool)
                .await
                .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

        if found != expected {
            warn!(table, ?found, ?expected, "Incompatible table layout");
            return Err(DbError::SchemaFailed(format!(
                "table {table} has columns ({}), expected ({})",
                found.join(", "),
                expected.join(", ")
            )));
        }
    }

    Ok(())
}

/// Inserts the default operators if `users` is empty.
///
/// Both rows go in one statement, so a failure leaves the table empty
/// rather than half seeded.
async fn seed_operators(pool: &SqlitePool) -> DbResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    if count > 0 {
        debug!(count, "Operators already present, skipping seed");
        return Ok(());
    }

    let [(first_user, first_pass), (second_user, second_pass)] = SEED_OPERATORS;

    sqlx::query("INSERT INTO users (username, password) VALUES (?1, ?2), (?3, ?4)")
        .bind(first_user)
        .bind(first_pass)
        .bind(second_user)
        .bind(second_pass)
        .execute(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    info!(count = SEED_OPERATORS.len(), "Seeded default operators");
    Ok(())
}

/// Lists the application tables present in the database, sorted by name.
///
/// ## Usage
/// For diagnostics and tests.
pub async fn table_names(pool: &SqlitePool) -> DbResult<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}
