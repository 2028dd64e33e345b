//! # Commands Module
//!
//! One async function per operator action.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (shared DTOs)
//! ├── auth.rs       ◄─── login
//! ├── receiving.rs  ◄─── record_goods_receipt, list_goods_receipts
//! ├── sales.rs      ◄─── record_sale, list_sales
//! └── product.rs    ◄─── add_product, list_products, product_names,
//!                        product_defaults
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Console                                                                │
//! │  ───────                                                                │
//! │  commands::sales::record_sale(&db, &form).await                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command                                                                │
//! │  ───────                                                                │
//! │  form.validate()?            ◄── ValidationError → ApiError            │
//! │  db.inner().sales()                                                     │
//! │    .insert_validated(&sale)? ◄── DbError → ApiError                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Console receives: RecordedDto or ApiError                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never prompt or print; that is the console's job.

pub mod auth;
pub mod product;
pub mod receiving;
pub mod sales;

use serde::Serialize;
use stockroom_core::{Money, RecordId};

/// Result of a successful receipt or sale insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedDto {
    /// Id of the new row
    pub id: RecordId,

    /// Line total stored with the row
    pub total_cents: i64,
}

impl RecordedDto {
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}
