//! # Commands Module
//!
//! Everything the operator can do, as plain functions over the state types.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── lookup.rs      ◄─── Product, customer, vehicle, technician, service search
//! ├── cart.rs        ◄─── Retail cart manipulation
//! ├── work_order.rs  ◄─── Work order assembly
//! └── submit.rs      ◄─── Sale / work order submission
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console Command Flow                                 │
//! │                                                                         │
//! │  Operator                                                               │
//! │  ────────                                                               │
//! │  > add p-17 2                                                           │
//! │         │                                                               │
//! │         │ (repl::parse)                                                 │
//! │         ▼                                                               │
//! │  Command::Add { product_id: "p-17", quantity: Some(2) }                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      api: &ApiState,          ◄── only the state it needs              │
//! │      session: &SessionState,                                            │
//! │      product_id: &str,                                                  │
//! │      quantity: Option<i64>,                                             │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (repl::render_cart)                                           │
//! │         ▼                                                               │
//! │  Operator sees the updated cart and totals                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod lookup;
pub mod submit;
pub mod work_order;
