//! # Domain Types
//!
//! Record types stored by Stockroom, one per table.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  GoodsReceipt    │  │   SaleRecord     │  │ ProductMasterEntry   │  │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────────  │  │
//! │  │  id              │  │  id              │  │  id                  │  │
//! │  │  supplier_name   │  │  customer_name   │  │  barcode, sku        │  │
//! │  │  product_name ┄┄┄┼┄┄┼┄ product_name ┄┄┄┼┄┄┼┄ name (soft ref)     │  │
//! │  │  quantity, unit  │  │  quantity, unit  │  │  category, image     │  │
//! │  │  unit_cost_cents │  │  unit_price_cents│  │  unit_price_cents    │  │
//! │  │  received_at     │  │  sold_at         │  │  default_unit        │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  ┄┄┄ free-text match only: no foreign key is enforced                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All three tables are append-only: rows are inserted and listed, never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, TaxRate};

/// Generated row identifier (SQLite `INTEGER PRIMARY KEY`).
///
/// Ids grow with every insert, so ordering by id is insertion order.
pub type RecordId = i64;

// =============================================================================
// Unit of Measure
// =============================================================================

/// The fixed set of units an item can be counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Pcs,
    Kg,
    Liters,
    Boxes,
    Packs,
}

impl UnitOfMeasure {
    /// Every unit, in the order the forms list them.
    pub const ALL: [UnitOfMeasure; 5] = [
        UnitOfMeasure::Pcs,
        UnitOfMeasure::Kg,
        UnitOfMeasure::Liters,
        UnitOfMeasure::Boxes,
        UnitOfMeasure::Packs,
    ];

    /// Stored and displayed name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Pcs => "pcs",
            UnitOfMeasure::Kg => "kg",
            UnitOfMeasure::Liters => "liters",
            UnitOfMeasure::Boxes => "boxes",
            UnitOfMeasure::Packs => "packs",
        }
    }

    /// Parses a unit name, ignoring surrounding whitespace and case.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::UnitOfMeasure;
    ///
    /// assert_eq!(UnitOfMeasure::parse(" KG "), Some(UnitOfMeasure::Kg));
    /// assert_eq!(UnitOfMeasure::parse("dozen"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        UnitOfMeasure::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(input))
    }

    /// Names of every unit, for error messages and prompts.
    pub fn names() -> Vec<String> {
        UnitOfMeasure::ALL
            .iter()
            .map(|unit| unit.as_str().to_string())
            .collect()
    }
}

impl Default for UnitOfMeasure {
    fn default() -> Self {
        UnitOfMeasure::Pcs
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Goods Receipt
// =============================================================================

/// One delivery of stock from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct GoodsReceipt {
    pub id: RecordId,
    pub supplier_name: String,
    /// Free-text product reference (not checked against the master list).
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    /// Cost per unit in cents.
    pub unit_cost_cents: i64,
    pub tax_rate_bps: u32,
    /// quantity × unit cost + tax, in cents.
    pub total_cents: i64,
    pub received_at: DateTime<Utc>,
}

impl GoodsReceipt {
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One sale of stock to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub id: RecordId,
    pub customer_name: String,
    /// Free-text product reference (not checked against the master list).
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    /// Price per unit in cents.
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    /// quantity × unit price + tax, in cents.
    pub total_cents: i64,
    pub sold_at: DateTime<Utc>,
}

impl SaleRecord {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Product Master Entry
// =============================================================================

/// A product in the master list.
///
/// `barcode` is meant to identify a product but uniqueness is not
/// enforced; submitting the same barcode twice yields two rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductMasterEntry {
    pub id: RecordId,
    pub barcode: String,
    pub sku: String,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub default_unit: UnitOfMeasure,
    /// Path of the product image inside the image directory. Only the
    /// path is stored; the file itself is managed elsewhere.
    pub image_path: Option<String>,
}

impl ProductMasterEntry {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse() {
        assert_eq!(UnitOfMeasure::parse("pcs"), Some(UnitOfMeasure::Pcs));
        assert_eq!(UnitOfMeasure::parse("Liters"), Some(UnitOfMeasure::Liters));
        assert_eq!(UnitOfMeasure::parse(""), None);
        assert_eq!(UnitOfMeasure::parse("litres"), None);
    }

    #[test]
    fn test_unit_names_match_display() {
        let names = UnitOfMeasure::names();
        assert_eq!(names, vec!["pcs", "kg", "liters", "boxes", "packs"]);
        for unit in UnitOfMeasure::ALL {
            assert_eq!(UnitOfMeasure::parse(&unit.to_string()), Some(unit));
        }
    }

    #[test]
    fn test_unit_default() {
        assert_eq!(UnitOfMeasure::default(), UnitOfMeasure::Pcs);
    }
}
