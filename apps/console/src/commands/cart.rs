//! # Cart Commands
//!
//! Commands for retail cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Customer │────►│ Submitted│       │
//! │  │  Cart    │     │          │     │ + Payment│     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       submit_sale                        │
//! │                   update_item       (submit.rs)                        │
//! │                   remove_item                                           │
//! │                   set_discount                                          │
//! │                   set_manual_tax                                        │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the full cart so the caller can redraw it.

use serde::Serialize;
use tracing::{debug, warn};

use shopfloor_core::validation::validate_quantity;
use shopfloor_core::{CoreError, CustomerRef, LineItem, Money, PaymentMethod, RetailCart, RetailTotals};

use crate::error::ApiError;
use crate::state::{ApiState, SessionState};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: RetailTotals,
    pub customer: Option<CustomerRef>,
    pub payment_method: Option<PaymentMethod>,
}

impl From<&RetailCart> for CartResponse {
    fn from(cart: &RetailCart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: cart.totals(),
            customer: cart.customer().cloned(),
            payment_method: cart.payment_method(),
        }
    }
}

fn log_denied(err: &CoreError) {
    if let CoreError::AdmissionDenied {
        product_id,
        available,
        requested,
        ..
    } = err
    {
        warn!(product_id = %product_id, available, requested, "Quantity not admitted");
    }
}

/// Gets the current cart contents.
pub fn get_cart(session: &SessionState) -> CartResponse {
    debug!("get_cart command");
    session.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - The product is fetched fresh so the stock check uses current stock
/// - If the product is already in the cart: quantity increases
/// - Price is frozen the first time the product is added
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  > add p-17 2                                                           │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Reject quantity ≤ 0 before any remote call                │    │
/// │  │  2. get_product(p-17) for current price and stock              │    │
/// │  │  3. Admit existing + requested against stock                   │    │
/// │  │     - Yes: merge or append                                     │    │
/// │  │     - No: INSUFFICIENT_STOCK, cart unchanged                   │    │
/// │  │  4. Return updated cart                                        │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn add_to_cart(
    api: &ApiState,
    session: &SessionState,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");

    validate_quantity(quantity)?;

    let product = api
        .products
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    session.with_cart_mut(|c| {
        c.add_item(&product, quantity).map_err(|e| {
            log_denied(&e);
            e
        })?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })
}

/// Sets the quantity of a cart line. Zero or less removes it.
pub fn update_cart_item(session: &SessionState, item_id: &str, quantity: i64) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, quantity = %quantity, "update_cart_item command");

    session.with_cart_mut(|c| {
        c.update_quantity(item_id, quantity).map_err(|e| {
            log_denied(&e);
            e
        })?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })
}

/// Removes a line from the cart. Removing an absent line is not an error.
pub fn remove_from_cart(session: &SessionState, item_id: &str) -> CartResponse {
    debug!(item_id = %item_id, "remove_from_cart command");

    session.with_cart_mut(|c| {
        if !c.remove_item(item_id) {
            debug!(item_id = %item_id, "Line was not in the cart");
        }
        CartResponse::from(&*c)
    })
}

/// Clears items, customer, payment method, discount and manual tax.
pub fn clear_cart(session: &SessionState) -> CartResponse {
    debug!("clear_cart command");

    // a new sale starts from Idle; an in-flight attempt keeps its status
    if session.sale_submission().reset().is_err() {
        debug!("Sale submission in flight, status kept");
    }

    session.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

/// Selects (or clears) the customer for the sale.
pub fn set_cart_customer(session: &SessionState, customer: Option<CustomerRef>) -> CartResponse {
    debug!(customer_id = ?customer.as_ref().map(|c| c.id.as_str()), "set_cart_customer command");

    session.with_cart_mut(|c| {
        c.set_customer(customer);
        CartResponse::from(&*c)
    })
}

/// Selects (or clears) the payment method.
pub fn set_payment_method(session: &SessionState, method: Option<PaymentMethod>) -> CartResponse {
    debug!(payment_method = ?method, "set_payment_method command");

    session.with_cart_mut(|c| {
        c.set_payment_method(method);
        CartResponse::from(&*c)
    })
}

/// Sets the discount amount. Totals never discount more than the subtotal.
pub fn set_discount(session: &SessionState, amount: Money) -> Result<CartResponse, ApiError> {
    debug!(amount = %amount, "set_discount command");

    session.with_cart_mut(|c| {
        c.set_discount(amount)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })
}

/// Sets or clears the manual tax amount.
pub fn set_manual_tax(session: &SessionState, amount: Option<Money>) -> Result<CartResponse, ApiError> {
    debug!(amount = ?amount, "set_manual_tax command");

    session.with_cart_mut(|c| {
        c.set_manual_tax(amount)?;
        Ok::<CartResponse, ApiError>(CartResponse::from(&*c))
    })
}
