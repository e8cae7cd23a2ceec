//! # shopfloor-core: Order-Building Engine
//!
//! Everything a counter operator does to a sale or a workshop job before it
//! is sent off: carts, stock admission, totals, submission validation and
//! payload construction. Pure functions and plain data, no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfloor Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/console)                       │   │
//! │  │    REPL ──► commands ──► SessionState ──► ConsoleSink           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfloor-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   stock   │  │  pricing  │  │   cart    │  │work_order │  │   │
//! │  │   │  admit    │  │  totals   │  │RetailCart │  │WorkOrder- │  │   │
//! │  │   │StockLevels│  │  16% tax  │  │ LineItem  │  │   Cart    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO NOTIFICATIONS                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ payloads                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               shopfloor-client (HTTP + submission)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Lookup references, payment method, tax rate
//! - [`stock`] - Stock admission policy
//! - [`pricing`] - Totals for both carts
//! - [`cart`] - Retail cart
//! - [`work_order`] - Work order cart
//! - [`payload`] - Submission payloads
//! - [`validation`] - Single-value input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use shopfloor_core::{CustomerRef, Money, ProductRef, RetailCart};
//!
//! let brake_pads = ProductRef {
//!     id: "p-1".to_string(),
//!     sku: "BRK-01".to_string(),
//!     name: "Brake pads".to_string(),
//!     unit_price: Money::from_cents(10000),
//!     available_stock: 5,
//! };
//!
//! let mut cart = RetailCart::new();
//! cart.add_item(&brake_pads, 2).unwrap();
//! cart.set_customer(Some(CustomerRef {
//!     id: "c-1".to_string(),
//!     name: "Ana Torres".to_string(),
//!     phone: None,
//!     email: None,
//! }));
//! cart.set_discount(Money::from_cents(2000)).unwrap();
//! cart.set_manual_tax(Some(Money::from_cents(3420))).unwrap();
//!
//! assert_eq!(cart.totals().total, Money::from_cents(21420));
//!
//! let live: HashMap<String, i64> = [("p-1".to_string(), 5)].into_iter().collect();
//! let payload = cart.prepare_submission_payload(&live).unwrap();
//! assert!((payload.tax_percentage - 17.1).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payload;
pub mod pricing;
pub mod stock;
pub mod types;
pub mod validation;
pub mod work_order;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{LineItem, RetailCart};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError, ValidationFailures, ValidationIssue};
pub use money::Money;
pub use payload::{SalePayload, WorkOrderPayload};
pub use pricing::{RetailTotals, WorkOrderTotals};
pub use stock::StockLevels;
pub use types::*;
pub use work_order::{PartLineItem, ServiceLineItem, WorkOrderCart};
