//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository per Table                             │
//! │                                                                         │
//! │  Console command                                                       │
//! │       │                                                                 │
//! │       │  db.goods_receiving().insert(&form)                            │
//! │       ▼                                                                 │
//! │  GoodsReceivingRepository                                              │
//! │  ├── insert(&self, form)   → validate, write one row, return id        │
//! │  └── list_all(&self)       → every row, insertion order                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  No repository updates or deletes rows, and none reads another         │
//! │  repository's table.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OperatorRepository`](operator::OperatorRepository) - Credential lookup
//! - [`GoodsReceivingRepository`](goods_receiving::GoodsReceivingRepository) - Receiving log
//! - [`SalesRepository`](sales::SalesRepository) - Sales log
//! - [`ProductMasterRepository`](product_master::ProductMasterRepository) - Product list

pub mod goods_receiving;
pub mod operator;
pub mod product_master;
pub mod sales;
