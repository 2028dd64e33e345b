//! # Forms
//!
//! Raw operator input for the three entry screens, and the validated
//! values each one turns into.
//!
//! ## Form Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GoodsReceiptForm (all String)                                         │
//! │       │                                                                 │
//! │       ▼  validate()                                                     │
//! │  ┌─────────────┐   Err(ValidationError { field, .. })                  │
//! │  │ field rules │ ───────────────────────────────► re-prompt that field │
//! │  └─────┬───────┘                                  (form kept intact)   │
//! │        │ Ok                                                             │
//! │        ▼                                                                │
//! │  NewGoodsReceipt (typed) ──► repository insert ──► RecordId            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields are checked in the order they appear on screen, so the error
//! reported is always the first bad field the operator would see.

use serde::{Deserialize, Serialize};

use crate::money::{Money, TaxRate};
use crate::types::UnitOfMeasure;
use crate::validation::{
    optional_text, parse_money, parse_quantity, parse_tax_percent, parse_unit, require_text,
    ValidationResult,
};

// =============================================================================
// Field Access
// =============================================================================

/// Describes one input on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// Key used in `ValidationError::field()`.
    pub name: &'static str,
    /// Prompt shown to the operator.
    pub label: &'static str,
}

impl FormField {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        FormField { name, label }
    }
}

/// Uniform access to a form's raw text fields.
///
/// Lets a front-end fill any form field by field and re-prompt the one
/// named by a `ValidationError`.
pub trait FormInput: Default {
    /// Fields in display order.
    fn fields() -> &'static [FormField];

    /// Mutable access to a field's raw text by name.
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    /// Label for a field name, falling back to the name itself.
    fn label_for(name: &str) -> &str {
        Self::fields()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.label)
            .unwrap_or(name)
    }
}

// =============================================================================
// Goods Receiving
// =============================================================================

/// Goods receiving form as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceiptForm {
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: String,
    pub unit: String,
    pub unit_cost: String,
    pub tax_percent: String,
}

/// A validated goods receipt ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoodsReceipt {
    pub supplier_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    pub unit_cost: Money,
    pub tax_rate: TaxRate,
}

impl NewGoodsReceipt {
    /// quantity × unit cost + tax.
    pub fn total(&self) -> Money {
        self.unit_cost.line_total(self.quantity, self.tax_rate)
    }
}

impl GoodsReceiptForm {
    pub fn validate(&self) -> ValidationResult<NewGoodsReceipt> {
        Ok(NewGoodsReceipt {
            supplier_name: require_text("supplier_name", &self.supplier_name)?,
            product_name: require_text("product_name", &self.product_name)?,
            quantity: parse_quantity("quantity", &self.quantity)?,
            unit: parse_unit("unit", &self.unit)?,
            unit_cost: parse_money("unit_cost", &self.unit_cost)?,
            tax_rate: parse_tax_percent("tax_percent", &self.tax_percent)?,
        })
    }
}

impl FormInput for GoodsReceiptForm {
    fn fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::new("supplier_name", "Supplier name"),
            FormField::new("product_name", "Product name"),
            FormField::new("quantity", "Quantity"),
            FormField::new("unit", "Unit of measurement"),
            FormField::new("unit_cost", "Rate per unit"),
            FormField::new("tax_percent", "Tax (%)"),
        ];
        FIELDS
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "supplier_name" => Some(&mut self.supplier_name),
            "product_name" => Some(&mut self.product_name),
            "quantity" => Some(&mut self.quantity),
            "unit" => Some(&mut self.unit),
            "unit_cost" => Some(&mut self.unit_cost),
            "tax_percent" => Some(&mut self.tax_percent),
            _ => None,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Sales form as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleForm {
    pub customer_name: String,
    pub product_name: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub tax_percent: String,
}

/// A validated sale ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit: UnitOfMeasure,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

impl NewSale {
    /// quantity × unit price + tax.
    pub fn total(&self) -> Money {
        self.unit_price.line_total(self.quantity, self.tax_rate)
    }
}

impl SaleForm {
    pub fn validate(&self) -> ValidationResult<NewSale> {
        Ok(NewSale {
            customer_name: require_text("customer_name", &self.customer_name)?,
            product_name: require_text("product_name", &self.product_name)?,
            quantity: parse_quantity("quantity", &self.quantity)?,
            unit: parse_unit("unit", &self.unit)?,
            unit_price: parse_money("unit_price", &self.unit_price)?,
            tax_rate: parse_tax_percent("tax_percent", &self.tax_percent)?,
        })
    }
}

impl FormInput for SaleForm {
    fn fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::new("customer_name", "Customer name"),
            FormField::new("product_name", "Product name"),
            FormField::new("quantity", "Quantity"),
            FormField::new("unit", "Unit of measurement"),
            FormField::new("unit_price", "Rate per unit"),
            FormField::new("tax_percent", "Tax (%)"),
        ];
        FIELDS
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "customer_name" => Some(&mut self.customer_name),
            "product_name" => Some(&mut self.product_name),
            "quantity" => Some(&mut self.quantity),
            "unit" => Some(&mut self.unit),
            "unit_price" => Some(&mut self.unit_price),
            "tax_percent" => Some(&mut self.tax_percent),
            _ => None,
        }
    }
}

// =============================================================================
// Product Master
// =============================================================================

/// Product master form as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub barcode: String,
    pub sku: String,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub description: String,
    pub unit_price: String,
    pub tax_percent: String,
    pub default_unit: String,
    /// Path to an image already placed in the image directory. Blank for
    /// no image.
    pub image_path: String,
}

/// A validated product ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub barcode: String,
    pub sku: String,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    pub default_unit: UnitOfMeasure,
    pub image_path: Option<String>,
}

impl ProductForm {
    pub fn validate(&self) -> ValidationResult<NewProduct> {
        Ok(NewProduct {
            barcode: require_text("barcode", &self.barcode)?,
            sku: require_text("sku", &self.sku)?,
            category: require_text("category", &self.category)?,
            subcategory: require_text("subcategory", &self.subcategory)?,
            name: require_text("name", &self.name)?,
            description: optional_text("description", &self.description)?,
            unit_price: parse_money("unit_price", &self.unit_price)?,
            tax_rate: parse_tax_percent("tax_percent", &self.tax_percent)?,
            default_unit: parse_unit("default_unit", &self.default_unit)?,
            image_path: optional_text("image_path", &self.image_path)?,
        })
    }
}

impl FormInput for ProductForm {
    fn fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::new("barcode", "Barcode"),
            FormField::new("sku", "SKU ID"),
            FormField::new("category", "Category"),
            FormField::new("subcategory", "Subcategory"),
            FormField::new("name", "Product name"),
            FormField::new("description", "Description (optional)"),
            FormField::new("unit_price", "Price"),
            FormField::new("tax_percent", "Tax (%)"),
            FormField::new("default_unit", "Default unit of measurement"),
            FormField::new("image_path", "Product image (optional)"),
        ];
        FIELDS
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "barcode" => Some(&mut self.barcode),
            "sku" => Some(&mut self.sku),
            "category" => Some(&mut self.category),
            "subcategory" => Some(&mut self.subcategory),
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "unit_price" => Some(&mut self.unit_price),
            "tax_percent" => Some(&mut self.tax_percent),
            "default_unit" => Some(&mut self.default_unit),
            "image_path" => Some(&mut self.image_path),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
