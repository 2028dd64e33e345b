//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! Record types, money arithmetic and form validation for the shop
//! inventory tracker. Everything here is a pure function of its input.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/console)                       │   │
//! │  │    Login ──► Receiving form ──► Sales form ──► Product master   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   forms   │  │ validation│  │   │
//! │  │   │  records  │  │   Money   │  │  raw text │  │  parsers  │  │   │
//! │  │   │   units   │  │  TaxRate  │  │  → New*   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │          Schema, credential store, record repositories          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (GoodsReceipt, SaleRecord, ProductMasterEntry)
//! - [`money`] - Money and TaxRate with integer arithmetic
//! - [`forms`] - Raw form input and its validated counterpart
//! - [`validation`] - Field parsers and rules
//! - [`error`] - ValidationError
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::forms::GoodsReceiptForm;
//!
//! let form = GoodsReceiptForm {
//!     supplier_name: "Acme".to_string(),
//!     product_name: "Widget".to_string(),
//!     quantity: "10".to_string(),
//!     unit: "pcs".to_string(),
//!     unit_cost: "2.50".to_string(),
//!     tax_percent: String::new(),
//! };
//!
//! let receipt = form.validate().unwrap();
//! assert_eq!(receipt.total().cents(), 2500);
//! ```

pub mod error;
pub mod forms;
pub mod money;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use money::{Money, TaxRate};
pub use types::*;

/// Largest quantity accepted on a receiving or sales form.
///
/// Upper bound of the quantity selector on the receiving and sales forms.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest unit price or cost accepted, in cents ($1,000,000.00).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Longest free-text field accepted (names, codes, descriptions).
pub const MAX_TEXT_LEN: usize = 200;
