//! # Goods Receiving Commands

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::RecordedDto;
use crate::error::ApiError;
use crate::state::DbState;
use stockroom_core::forms::GoodsReceiptForm;
use stockroom_core::{GoodsReceipt, RecordId, UnitOfMeasure};

/// Goods receipt DTO for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsReceiptDto {
    pub id: RecordId,
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    pub unit_cost_cents: i64,
    pub tax_rate_bps: u32,
    pub total_cents: i64,
    pub received_at: DateTime<Utc>,
}

impl From<GoodsReceipt> for GoodsReceiptDto {
    fn from(r: GoodsReceipt) -> Self {
        GoodsReceiptDto {
            id: r.id,
            supplier_name: r.supplier_name,
            product_name: r.product_name,
            quantity: r.quantity,
            unit: r.unit,
            unit_cost_cents: r.unit_cost_cents,
            tax_rate_bps: r.tax_rate_bps,
            total_cents: r.total_cents,
            received_at: r.received_at,
        }
    }
}

/// Validates and records one goods receipt.
///
/// ## Returns
/// * `Ok(RecordedDto)` - New row id and its total
/// * `Err(VALIDATION_ERROR)` - `field` names the bad input; nothing written
/// * `Err(STORAGE_ERROR)` - The insert failed; nothing written
pub async fn record_goods_receipt(
    db: &DbState,
    form: &GoodsReceiptForm,
) -> Result<RecordedDto, ApiError> {
    let receipt = form.validate()?;
    let total = receipt.total();

    let id = db.inner().goods_receiving().insert_validated(&receipt).await?;

    info!(id, total = %total, "record_goods_receipt complete");
    Ok(RecordedDto {
        id,
        total_cents: total.cents(),
    })
}

/// Lists all goods receipts, oldest first.
pub async fn list_goods_receipts(db: &DbState) -> Result<Vec<GoodsReceiptDto>, ApiError> {
    let receipts = db.inner().goods_receiving().list_all().await?;
    debug!(count = receipts.len(), "list_goods_receipts");

    Ok(receipts.into_iter().map(GoodsReceiptDto::from).collect())
}
