//! # Sales Commands

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::RecordedDto;
use crate::error::ApiError;
use crate::state::DbState;
use stockroom_core::forms::SaleForm;
use stockroom_core::{RecordId, SaleRecord, UnitOfMeasure};

/// Sale DTO for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: RecordId,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub total_cents: i64,
    pub sold_at: DateTime<Utc>,
}

impl From<SaleRecord> for SaleDto {
    fn from(s: SaleRecord) -> Self {
        SaleDto {
            id: s.id,
            customer_name: s.customer_name,
            product_name: s.product_name,
            quantity: s.quantity,
            unit: s.unit,
            unit_price_cents: s.unit_price_cents,
            tax_rate_bps: s.tax_rate_bps,
            total_cents: s.total_cents,
            sold_at: s.sold_at,
        }
    }
}

/// Validates and records one sale.
///
/// The product name is not checked against the master list.
pub async fn record_sale(db: &DbState, form: &SaleForm) -> Result<RecordedDto, ApiError> {
    let sale = form.validate()?;
    let total = sale.total();

    let id = db.inner().sales().insert_validated(&sale).await?;

    info!(id, total = %total, "record_sale complete");
    Ok(RecordedDto {
        id,
        total_cents: total.cents(),
    })
}

/// Lists all sales, oldest first.
pub async fn list_sales(db: &DbState) -> Result<Vec<SaleDto>, ApiError> {
    let sales = db.inner().sales().list_all().await?;
    debug!(count = sales.len(), "list_sales");

    Ok(sales.into_iter().map(SaleDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sale(qty: &str, price: &str, tax: &str) -> SaleForm {
        SaleForm {
            customer_name: "Jane".to_string(),
            product_name: "Rice".to_string(),
            quantity: qty.to_string(),
            unit: "kg".to_string(),
            unit_price: price.to_string(),
            tax_percent: tax.to_string(),
        }
    }

    #[tokio::test]
    async fn test_total_includes_rounded_tax() {
        let db = DbState::in_memory().await.unwrap();

        // 3 × $1.99 = $5.97, 7.5% tax = $0.44775 → $0.45
        let recorded = record_sale(&db, &sale("3", "1.99", "7.5")).await.unwrap();

        assert_eq!(recorded.total_cents, 642);
        assert_eq!(list_sales(&db).await.unwrap()[0].total_cents, 642);
    }

    #[tokio::test]
    async fn test_non_numeric_price_reports_field() {
        let db = DbState::in_memory().await.unwrap();

        let err = record_sale(&db, &sale("1", "free", "")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("unit_price"));
        assert!(list_sales(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let db = DbState::in_memory().await.unwrap();

        let first = record_sale(&db, &sale("1", "1", "")).await.unwrap();
        let second = record_sale(&db, &sale("2", "1", "")).await.unwrap();

        let ids: Vec<RecordId> = list_sales(&db).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }
}
