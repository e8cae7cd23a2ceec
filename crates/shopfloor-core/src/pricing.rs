//! # Pricing Engine
//!
//! Pure totals for both carts. Called after every mutation to refresh the
//! live display, and once more when a payload is built.
//!
//! ## Retail Totals
//! ```text
//! subtotal               = Σ quantity × unit_price
//! discount               = min(discount_amount, subtotal)
//! subtotal_after_discount = max(0, subtotal − discount_amount)
//! tax                    = manual_tax, or 0 when unset
//! total                  = subtotal_after_discount + tax
//! ```
//!
//! ## Work Order Totals
//! ```text
//! subtotal = Σ services + Σ parts
//! tax      = subtotal × 16%
//! total    = subtotal + tax
//! ```
//!
//! The retail cart never applies an implicit rate: until the operator enters
//! a manual tax, tax is zero. The work order always applies 16%.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};
use crate::types::TaxRate;

/// Fixed tax rate applied to every work order.
pub const WORK_ORDER_TAX_RATE: TaxRate = TaxRate::from_bps(1600);

/// A line that contributes to a subtotal.
pub trait Priced {
    fn quantity(&self) -> i64;

    fn unit_price(&self) -> Money;

    fn line_subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity())
    }
}

/// Sum of line subtotals.
pub fn subtotal<L: Priced>(lines: &[L]) -> Money {
    lines.iter().map(Priced::line_subtotal).sum()
}

// =============================================================================
// Retail
// =============================================================================

/// Totals snapshot for the retail cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RetailTotals {
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub subtotal: Money,
    /// Discount actually applied (never more than the subtotal).
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub discount: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub subtotal_after_discount: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub tax: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub total: Money,
    /// Sum of quantities, not distinct lines.
    pub item_count: i64,
    pub tax_is_manual: bool,
}

/// Computes retail totals.
pub fn retail_totals<L: Priced>(
    lines: &[L],
    discount_amount: Money,
    manual_tax: Option<Money>,
) -> RetailTotals {
    let subtotal = subtotal(lines);
    let subtotal_after_discount = (subtotal - discount_amount).floor_zero();
    let tax = manual_tax.unwrap_or_default();

    RetailTotals {
        subtotal,
        discount: discount_amount.min(subtotal).floor_zero(),
        subtotal_after_discount,
        tax,
        total: subtotal_after_discount + tax,
        item_count: lines.iter().fold(0i64, |n, l| n.saturating_add(l.quantity())),
        tax_is_manual: manual_tax.is_some(),
    }
}

/// Backs an absolute tax amount out into a percentage of the subtotal.
///
/// The sale endpoint expects a rate, not an amount. A zero subtotal yields
/// a zero rate rather than a division by zero.
///
/// ```rust
/// use shopfloor_core::money::Money;
/// use shopfloor_core::pricing::implied_tax_percentage;
///
/// let pct = implied_tax_percentage(Money::from_cents(3420), Money::from_cents(20000));
/// assert!((pct - 17.1).abs() < 1e-9);
/// assert_eq!(implied_tax_percentage(Money::from_cents(500), Money::zero()), 0.0);
/// ```
pub fn implied_tax_percentage(tax: Money, subtotal: Money) -> f64 {
    if subtotal.is_zero() {
        return 0.0;
    }
    tax.cents() as f64 * 100.0 / subtotal.cents() as f64
}

// =============================================================================
// Work Order
// =============================================================================

/// Totals snapshot for a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderTotals {
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub subtotal_services: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub subtotal_parts: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub subtotal: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub tax: Money,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub total: Money,
}

/// Computes work order totals at [`WORK_ORDER_TAX_RATE`].
pub fn work_order_totals<S: Priced, P: Priced>(services: &[S], parts: &[P]) -> WorkOrderTotals {
    let subtotal_services = subtotal(services);
    let subtotal_parts = subtotal(parts);
    let subtotal = subtotal_services + subtotal_parts;
    let tax = subtotal.calculate_tax(WORK_ORDER_TAX_RATE);

    WorkOrderTotals {
        subtotal_services,
        subtotal_parts,
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
