//! # Product Commands
//!
//! Commands for the product master list.
//!
//! ## Prefill Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Prefill Flow                                 │
//! │                                                                         │
//! │  Operator opens the sale form                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product_names() → "Known products: Bolt, Widget"                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator types product: "Widget"                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product_defaults("Widget")                                            │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Found?  YES: unit, price, tax offered    │──► [pcs] [9.99] [5.00]  │
//! │  │          NO:  fields start empty          │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator accepts (blank) or overrides each default                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product names elsewhere are free text; an unknown name simply gets no
//! defaults.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppConfig, DbState};
use stockroom_core::forms::ProductForm;
use stockroom_core::{ProductMasterEntry, RecordId, UnitOfMeasure};

/// Product DTO for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
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
    pub image_path: Option<String>,
}

impl From<ProductMasterEntry> for ProductDto {
    fn from(p: ProductMasterEntry) -> Self {
        ProductDto {
            id: p.id,
            barcode: p.barcode,
            sku: p.sku,
            category: p.category,
            subcategory: p.subcategory,
            name: p.name,
            description: p.description,
            unit_price_cents: p.unit_price_cents,
            tax_rate_bps: p.tax_rate_bps,
            default_unit: p.default_unit,
            image_path: p.image_path,
        }
    }
}

/// Values a sale or receipt form can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDefaultsDto {
    pub unit: UnitOfMeasure,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
}

impl ProductDefaultsDto {
    /// Price as the operator would type it ("9.99").
    pub fn price_input(&self) -> String {
        let cents = self.unit_price_cents;
        format!("{}.{:02}", cents / 100, (cents % 100).abs())
    }

    /// Tax as the operator would type it ("8.25").
    pub fn tax_input(&self) -> String {
        format!("{}.{:02}", self.tax_rate_bps / 100, self.tax_rate_bps % 100)
    }
}

impl From<&ProductMasterEntry> for ProductDefaultsDto {
    fn from(p: &ProductMasterEntry) -> Self {
        ProductDefaultsDto {
            unit: p.default_unit,
            unit_price_cents: p.unit_price_cents,
            tax_rate_bps: p.tax_rate_bps,
        }
    }
}

/// Validates and appends a product to the master list.
///
/// A bare image file name is stored under the configured image directory;
/// the file itself is not copied.
pub async fn add_product(
    db: &DbState,
    config: &AppConfig,
    form: &ProductForm,
) -> Result<RecordId, ApiError> {
    let mut form = form.clone();
    form.image_path = config.resolve_image_path(&form.image_path);

    let product = form.validate()?;
    let id = db.inner().products().insert_validated(&product).await?;

    info!(id, sku = %product.sku, "add_product complete");
    Ok(id)
}

/// Lists the whole master list, oldest first.
pub async fn list_products(db: &DbState) -> Result<Vec<ProductDto>, ApiError> {
    let products = db.inner().products().list_all().await?;
    debug!(count = products.len(), "list_products");

    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Distinct product names, sorted, for the product picker.
pub async fn product_names(db: &DbState) -> Result<Vec<String>, ApiError> {
    Ok(db.inner().products().list_names().await?)
}

/// Defaults for a product name, or `None` if it is not on the list.
pub async fn product_defaults(
    db: &DbState,
    name: &str,
) -> Result<Option<ProductDefaultsDto>, ApiError> {
    let product = db.inner().products().find_by_name(name.trim()).await?;
    debug!(name = %name, found = product.is_some(), "product_defaults");

    Ok(product.as_ref().map(ProductDefaultsDto::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::path::Path;

    fn widget() -> ProductForm {
        ProductForm {
            barcode: "123".to_string(),
            sku: "W-1".to_string(),
            category: "Hardware".to_string(),
            subcategory: "Fasteners".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            unit_price: "9.99".to_string(),
            tax_percent: "8.25".to_string(),
            default_unit: "boxes".to_string(),
            image_path: String::new(),
        }
    }

    #[tokio::test]
    async fn test_same_barcode_different_sku_gives_two_rows() {
        let db = DbState::in_memory().await.unwrap();
        let config = AppConfig::default();
        let mut second = widget();
        second.sku = "W-2".to_string();

        add_product(&db, &config, &widget()).await.unwrap();
        add_product(&db, &config, &second).await.unwrap();

        let products = list_products(&db).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].barcode, "123");
        assert_eq!(products[1].barcode, "123");
        assert_ne!(products[0].sku, products[1].sku);
    }

    #[tokio::test]
    async fn test_bare_image_name_resolved() {
        let db = DbState::in_memory().await.unwrap();
        let config = AppConfig::default();
        let mut form = widget();
        form.image_path = "widget.png".to_string();

        add_product(&db, &config, &form).await.unwrap();

        let stored = list_products(&db).await.unwrap()[0].image_path.clone().unwrap();
        assert_eq!(Path::new(&stored), config.image_dir.join("widget.png"));
    }

    #[tokio::test]
    async fn test_missing_name_reports_field() {
        let db = DbState::in_memory().await.unwrap();
        let mut form = widget();
        form.name = " ".to_string();

        let err = add_product(&db, &AppConfig::default(), &form).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_names_sorted_and_distinct() {
        let db = DbState::in_memory().await.unwrap();
        let config = AppConfig::default();

        for name in ["Widget", "Bolt", "Widget"] {
            let mut form = widget();
            form.name = name.to_string();
            add_product(&db, &config, &form).await.unwrap();
        }

        assert_eq!(product_names(&db).await.unwrap(), ["Bolt", "Widget"]);
    }

    #[tokio::test]
    async fn test_defaults_for_known_and_unknown_products() {
        let db = DbState::in_memory().await.unwrap();
        add_product(&db, &AppConfig::default(), &widget()).await.unwrap();

        let defaults = product_defaults(&db, "Widget").await.unwrap().unwrap();
        assert_eq!(defaults.unit, UnitOfMeasure::Boxes);
        assert_eq!(defaults.price_input(), "9.99");
        assert_eq!(defaults.tax_input(), "8.25");

        assert_eq!(product_defaults(&db, "Gizmo").await.unwrap(), None);
    }

    #[test]
    fn test_default_inputs_pad_cents() {
        let defaults = ProductDefaultsDto {
            unit: UnitOfMeasure::Pcs,
            unit_price_cents: 1205,
            tax_rate_bps: 500,
        };

        assert_eq!(defaults.price_input(), "12.05");
        assert_eq!(defaults.tax_input(), "5.00");
    }
}
