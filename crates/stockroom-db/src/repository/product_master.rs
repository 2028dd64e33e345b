//! # Product Master Repository
//!
//! The shop's product list: barcode, SKU, category, price, tax and the
//! default unit for each product.
//!
//! ## Key Operations
//! - Append a product
//! - List every product, or just the distinct names for pickers
//! - Look up a product's defaults by name to prefill a sale or receipt
//!
//! ## Name Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Name Lookup Works                                │
//! │                                                                         │
//! │  Operator types product: "Widget"                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ product_master                          │                           │
//! │  │                                         │                           │
//! │  │ id 1 | 0123 | W-1 | Widget | $9.99     │ ← first match wins        │
//! │  │ id 2 | 0456 | G-1 | Gadget | $4.00     │                           │
//! │  │ id 3 | 0789 | W-2 | Widget | $8.50     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Defaults: $9.99, tax, pcs (operator may still change them)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither barcode nor name is unique, so duplicates are kept as
//! separate rows.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::forms::{NewProduct, ProductForm};
use stockroom_core::{ProductMasterEntry, RecordId};

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        barcode,
        sku_id AS sku,
        category,
        subcategory,
        product_name AS name,
        description,
        price_cents AS unit_price_cents,
        tax_rate_bps,
        default_unit_of_measurement AS default_unit,
        product_image_path AS image_path
    FROM product_master
"#;

/// Repository for the `product_master` table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let id = repo.insert(&form).await?;
/// let names = repo.list_names().await?;
/// let widget = repo.find_by_name("Widget").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductMasterRepository {
    pool: SqlitePool,
}

impl ProductMasterRepository {
    /// Creates a new ProductMasterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductMasterRepository { pool }
    }

    /// Validates a product form and appends it to the master list.
    ///
    /// ## Returns
    /// * `Ok(RecordId)` - Id of the new row
    /// * `Err(DbError::Validation)` - Bad input, no row written
    /// * `Err(_)` - Storage failure
    pub async fn insert(&self, form: &ProductForm) -> DbResult<RecordId> {
        let product = form.validate()?;
        self.insert_validated(&product).await
    }

    /// Appends an already validated product.
    ///
    /// The image path is stored as given; the file itself is not copied
    /// or checked.
    pub async fn insert_validated(&self, product: &NewProduct) -> DbResult<RecordId> {
        debug!(
            barcode = %product.barcode,
            sku = %product.sku,
            name = %product.name,
            "Inserting product"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO product_master (
                barcode, sku_id, category, subcategory, product_image_path,
                product_name, description, tax_rate_bps, price_cents,
                default_unit_of_measurement
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.barcode)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(&product.image_path)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.tax_rate.bps())
        .bind(product.unit_price.cents())
        .bind(product.default_unit)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Product added to master list");
        Ok(id)
    }

    /// Lists every product in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<ProductMasterEntry>> {
        let sql = format!("{SELECT_PRODUCT} ORDER BY id");
        let products = sqlx::query_as::<_, ProductMasterEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Lists distinct product names, sorted ascending.
    ///
    /// Feeds the product picker on the sale and receiving screens.
    pub async fn list_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT product_name FROM product_master ORDER BY product_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Finds the earliest product with exactly this name.
    ///
    /// ## Returns
    /// * `Ok(Some(entry))` - Lowest-id row named `name`
    /// * `Ok(None)` - No product has this name
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<ProductMasterEntry>> {
        let sql = format!("{SELECT_PRODUCT} WHERE product_name = ?1 ORDER BY id LIMIT 1");
        let product = sqlx::query_as::<_, ProductMasterEntry>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_master")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
