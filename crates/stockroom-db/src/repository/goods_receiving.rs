//! # Goods Receiving Repository
//!
//! Append-only log of stock received from suppliers.
//!
//! ## Insert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  insert(&GoodsReceiptForm)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  form.validate() ── Err ──► DbError::Validation (nothing written)      │
//! │       │ Ok(NewGoodsReceipt)                                             │
//! │       ▼                                                                 │
//! │  total = qty × unit cost + tax, received_at = now                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO goods_receiving ── Err ──► storage DbError                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  last_insert_rowid() → RecordId                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::forms::{GoodsReceiptForm, NewGoodsReceipt};
use stockroom_core::{GoodsReceipt, RecordId};

/// Repository for the `goods_receiving` table.
#[derive(Debug, Clone)]
pub struct GoodsReceivingRepository {
    pool: SqlitePool,
}

impl GoodsReceivingRepository {
    /// Creates a new GoodsReceivingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GoodsReceivingRepository { pool }
    }

    /// Validates a receiving form and records it.
    ///
    /// ## Returns
    /// * `Ok(RecordId)` - Id of the new row
    /// * `Err(DbError::Validation)` - Bad input, no row written
    /// * `Err(_)` - Storage failure
    pub async fn insert(&self, form: &GoodsReceiptForm) -> DbResult<RecordId> {
        let receipt = form.validate()?;
        self.insert_validated(&receipt).await
    }

    /// Records an already validated receipt.
    pub async fn insert_validated(&self, receipt: &NewGoodsReceipt) -> DbResult<RecordId> {
        debug!(
            supplier = %receipt.supplier_name,
            product = %receipt.product_name,
            quantity = receipt.quantity,
            "Inserting goods receipt"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO goods_receiving (
                product_name, supplier_name, quantity, unit_of_measurement,
                unit_cost_cents, tax_rate_bps, total_cents, received_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&receipt.product_name)
        .bind(&receipt.supplier_name)
        .bind(receipt.quantity)
        .bind(receipt.unit)
        .bind(receipt.unit_cost.cents())
        .bind(receipt.tax_rate.bps())
        .bind(receipt.total().cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Goods receipt recorded");
        Ok(id)
    }

    /// Lists every receipt in insertion order.
    ///
    /// Reads the table afresh on every call.
    pub async fn list_all(&self) -> DbResult<Vec<GoodsReceipt>> {
        let receipts = sqlx::query_as::<_, GoodsReceipt>(
            r#"
            SELECT
                id,
                supplier_name,
                product_name,
                quantity,
                unit_of_measurement AS unit,
                unit_cost_cents,
                tax_rate_bps,
                total_cents,
                received_at
            FROM goods_receiving
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = receipts.len(), "Listed goods receipts");
        Ok(receipts)
    }

    /// Counts receipts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goods_receiving")
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

    async fn repo() -> GoodsReceivingRepository {
        Database::open(DbConfig::in_memory())
            .await
            .unwrap()
            .goods_receiving()
    }

    fn form(supplier: &str, product: &str, qty: &str, cost: &str) -> GoodsReceiptForm {
        GoodsReceiptForm {
            supplier_name: supplier.to_string(),
            product_name: product.to_string(),
            quantity: qty.to_string(),
            unit: "pcs".to_string(),
            unit_cost: cost.to_string(),
            tax_percent: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_returns_row() {
        let repo = repo().await;
        let before = Utc::now();

        let id = repo.insert(&form("Acme", "Widget", "10", "2.50")).await.unwrap();

        let receipts = repo.list_all().await.unwrap();
        let last = receipts.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.supplier_name, "Acme");
        assert_eq!(last.product_name, "Widget");
        assert_eq!(last.quantity, 10);
        assert_eq!(last.unit, UnitOfMeasure::Pcs);
        assert_eq!(last.unit_cost_cents, 250);
        assert_eq!(last.tax_rate_bps, 0);
        assert_eq!(last.total_cents, 2500);
        assert!(last.received_at >= before);
    }

    #[tokio::test]
    async fn test_append_only_keeps_prior_rows() {
        let repo = repo().await;

        let first = repo.insert(&form("Acme", "Widget", "10", "2.50")).await.unwrap();
        let snapshot = repo.list_all().await.unwrap();

        let second = repo.insert(&form("Globex", "Gadget", "3", "7")).await.unwrap();
        let receipts = repo.list_all().await.unwrap();

        assert!(second > first);
        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0], snapshot[0]);
        assert_eq!(receipts[1].supplier_name, "Globex");
        assert_eq!(receipts[1].total_cents, 2100);
    }

    #[tokio::test]
    async fn test_tax_is_stored_with_total() {
        let repo = repo().await;
        let mut input = form("Acme", "Widget", "10", "2.50");
        input.tax_percent = "8.25".to_string();
        input.unit = "boxes".to_string();

        repo.insert(&input).await.unwrap();

        let receipt = &repo.list_all().await.unwrap()[0];
        assert_eq!(receipt.unit, UnitOfMeasure::Boxes);
        assert_eq!(receipt.tax_rate_bps, 825);
        // $25.00 + 8.25% ($2.0625 → $2.06)
        assert_eq!(receipt.total_cents, 2706);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_writes_nothing() {
        let repo = repo().await;

        for qty in ["0", "-4"] {
            let err = repo
                .insert(&form("Acme", "Widget", qty, "2.50"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DbError::Validation(ValidationError::MustBePositive { .. })
            ));
        }

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_cost_writes_nothing() {
        let repo = repo().await;

        let err = repo
            .insert(&form("Acme", "Widget", "10", "two fifty"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_supplier_rejected() {
        let repo = repo().await;

        let err = repo.insert(&form("  ", "Widget", "1", "1")).await.unwrap_err();

        match err {
            DbError::Validation(e) => assert_eq!(e.field(), "supplier_name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_closed_pool_is_storage_error() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.goods_receiving();
        db.close().await;

        let err = repo.insert(&form("Acme", "Widget", "1", "1")).await.unwrap_err();
        assert!(!err.is_validation());
    }
}
