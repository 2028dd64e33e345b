//! # Sales Repository
//!
//! Append-only log of sales to customers.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. VALIDATE                                                           │
//! │     └── SaleForm::validate() → NewSale                                 │
//! │                                                                         │
//! │  2. RECORD                                                             │
//! │     └── insert_validated() → one row, total and sold_at filled in      │
//! │                                                                         │
//! │  There is no draft, void, or edit step: a recorded sale is final.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product names are free text here. A sale for a product missing from
//! the master list is still recorded.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::forms::{NewSale, SaleForm};
use stockroom_core::{RecordId, SaleRecord};

/// Repository for the `sales` table.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    /// Creates a new SalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRepository { pool }
    }

    /// Validates a sale form and records it.
    ///
    /// ## Returns
    /// * `Ok(RecordId)` - Id of the new row
    /// * `Err(DbError::Validation)` - Bad input, no row written
    /// * `Err(_)` - Storage failure
    pub async fn insert(&self, form: &SaleForm) -> DbResult<RecordId> {
        let sale = form.validate()?;
        self.insert_validated(&sale).await
    }

    /// Records an already validated sale.
    pub async fn insert_validated(&self, sale: &NewSale) -> DbResult<RecordId> {
        debug!(
            customer = %sale.customer_name,
            product = %sale.product_name,
            quantity = sale.quantity,
            "Inserting sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                product_name, customer_name, quantity, unit_of_measurement,
                unit_price_cents, tax_rate_bps, total_cents, sold_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.product_name)
        .bind(&sale.customer_name)
        .bind(sale.quantity)
        .bind(sale.unit)
        .bind(sale.unit_price.cents())
        .bind(sale.tax_rate.bps())
        .bind(sale.total().cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Sale recorded");
        Ok(id)
    }

    /// Lists every sale in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT
                id,
                customer_name,
                product_name,
                quantity,
                unit_of_measurement AS unit,
                unit_price_cents,
                tax_rate_bps,
                total_cents,
                sold_at
            FROM sales
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use stockroom_core::{UnitOfMeasure, ValidationError};

    async fn repo() -> SalesRepository {
        Database::open(DbConfig::in_memory()).await.unwrap().sales()
    }

    fn form(customer: &str, product: &str, qty: &str, price: &str) -> SaleForm {
        SaleForm {
            customer_name: customer.to_string(),
            product_name: product.to_string(),
            quantity: qty.to_string(),
            unit: "kg".to_string(),
            unit_price: price.to_string(),
            tax_percent: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_returns_row() {
        let repo = repo().await;
        let before = Utc::now();

        let id = repo.insert(&form("Jane", "Rice", "2", "3.10")).await.unwrap();

        let sales = repo.list_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        let sale = &sales[0];
        assert_eq!(sale.id, id);
        assert_eq!(sale.customer_name, "Jane");
        assert_eq!(sale.product_name, "Rice");
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.unit, UnitOfMeasure::Kg);
        assert_eq!(sale.unit_price_cents, 310);
        assert_eq!(sale.total_cents, 620);
        assert!(sale.sold_at >= before);
    }

    #[tokio::test]
    async fn test_append_only_in_insertion_order() {
        let repo = repo().await;

        repo.insert(&form("Jane", "Rice", "2", "3.10")).await.unwrap();
        let snapshot = repo.list_all().await.unwrap();
        repo.insert(&form("Sam", "Flour", "1", "4")).await.unwrap();
        repo.insert(&form("Ali", "Sugar", "5", "1.25")).await.unwrap();

        let sales = repo.list_all().await.unwrap();
        let customers: Vec<&str> = sales.iter().map(|s| s.customer_name.as_str()).collect();
        assert_eq!(customers, ["Jane", "Sam", "Ali"]);
        assert_eq!(sales[0], snapshot[0]);
        assert!(sales.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_product_need_not_exist_in_master() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();

        db.sales()
            .insert(&form("Jane", "Unlisted thing", "1", "1"))
            .await
            .unwrap();

        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_writes_nothing() {
        let repo = repo().await;

        let err = repo.insert(&form("Jane", "Rice", "0", "3")).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_price_writes_nothing() {
        let repo = repo().await;

        let err = repo.insert(&form("Jane", "Rice", "1", "abc")).await.unwrap_err();

        match err {
            DbError::Validation(e) => assert_eq!(e.field(), "unit_price"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_unit_rejected() {
        let repo = repo().await;
        let mut input = form("Jane", "Rice", "1", "1");
        input.unit = "bushels".to_string();

        let err = repo.insert(&input).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::NotAllowed { .. })
        ));
    }
}
