//! # Retail Cart
//!
//! The point-of-sale cart: products, customer, payment method, discount and
//! an optional manual tax amount.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Retail Cart Operations                               │
//! │                                                                         │
//! │  Operator Action         Operation                 Cart Change          │
//! │  ───────────────         ─────────                 ───────────          │
//! │  Pick product ─────────► add_item(p, n) ─────────► merge or append      │
//! │  Edit quantity ────────► update_quantity(id, n) ─► replace (≤0 removes) │
//! │  Remove line ──────────► remove_item(id) ────────► delete if present    │
//! │  Pick customer ────────► set_customer(c)                                │
//! │  Pick payment ─────────► set_payment_method(m)                          │
//! │  Enter discount ───────► set_discount(amount)      rejects negatives    │
//! │  Enter tax ────────────► set_manual_tax(amount)    rejects negatives    │
//! │  Cancel ───────────────► clear()                                        │
//! │  Charge ───────────────► prepare_submission_payload(live_stock)         │
//! │                                                                         │
//! │  Every failed operation leaves the cart exactly as it was.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - One line per catalog product; the line id is the product id
//! - Every line quantity is > 0 and was admissible when it was set
//! - Discount and manual tax are never negative
//! - Subtotal, discount and manual tax stay under `MAX_CART_AMOUNT`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationFailures, ValidationIssue};
use crate::money::{self, Money};
use crate::payload::{SaleLinePayload, SalePayload};
use crate::pricing::{self, Priced, RetailTotals};
use crate::stock::{self, StockLevels, Stocked};
use crate::types::{CustomerRef, PaymentMethod, ProductRef};
use crate::validation::{validate_line_amount, validate_non_negative, validate_quantity, validate_within_limit};

// =============================================================================
// Line Item
// =============================================================================

/// A product line in the retail cart.
///
/// Name, price and stock are frozen copies taken from the lookup result
/// when the line was created (stock is refreshed on later adds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line id. Equal to `product_id`.
    pub id: String,
    pub product_id: String,
    pub sku: String,
    pub name: String,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub unit_price: Money,
    pub quantity: i64,
    /// Stock figure seen at the last add.
    pub available_stock: i64,
}

impl LineItem {
    fn from_product(product: &ProductRef, quantity: i64) -> Self {
        LineItem {
            id: product.id.clone(),
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            available_stock: product.available_stock,
        }
    }

    /// Quantity × unit price.
    pub fn line_subtotal(&self) -> Money {
        Priced::line_subtotal(self)
    }
}

impl Priced for LineItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl Stocked for LineItem {
    fn stock_id(&self) -> &str {
        &self.product_id
    }

    fn stock_name(&self) -> &str {
        &self.name
    }

    fn available_stock(&self) -> i64 {
        self.available_stock
    }
}

// =============================================================================
// Retail Cart
// =============================================================================

/// The retail cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetailCart {
    items: Vec<LineItem>,
    customer: Option<CustomerRef>,
    payment_method: Option<PaymentMethod>,
    discount_amount: Money,
    manual_tax: Option<Money>,
}

impl RetailCart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn manual_tax(&self) -> Option<Money> {
        self.manual_tax
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Item Mutations
    // =========================================================================

    /// Adds `quantity` units of a product, merging into its existing line.
    ///
    /// ## Behavior
    /// - Existing line: the new total (`existing + quantity`) must be
    ///   admissible against the product's stock
    /// - New line: `quantity` itself must be admissible, and the catalog
    ///   price must not be negative
    /// - The cart subtotal must stay under the amount ceiling
    /// - Refusal leaves the cart unchanged
    pub fn add_item(&mut self, product: &ProductRef, quantity: i64) -> CoreResult<&LineItem> {
        validate_quantity(quantity)?;

        match self.items.iter().position(|i| i.id == product.id) {
            Some(index) => {
                let line = &self.items[index];
                let new_qty = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| stock::refusal(product, i64::MAX))?;
                stock::admit(product, new_qty)?;
                validate_line_amount(line.unit_price, new_qty, self.subtotal_without(&product.id))?;

                let line = &mut self.items[index];
                line.quantity = new_qty;
                line.available_stock = product.available_stock;
                Ok(&self.items[index])
            }
            None => {
                validate_non_negative("unit price", product.unit_price)?;
                stock::admit(product, quantity)?;
                validate_line_amount(product.unit_price, quantity, self.totals().subtotal)?;

                self.items.push(LineItem::from_product(product, quantity));
                Ok(&self.items[self.items.len() - 1])
            }
        }
    }

    /// Replaces a line's quantity.
    ///
    /// ## Behavior
    /// - `new_quantity <= 0`: same as [`remove_item`](Self::remove_item),
    ///   returns `Ok(None)`
    /// - Otherwise the full new quantity must be admissible against the
    ///   line's stock snapshot
    pub fn update_quantity(&mut self, item_id: &str, new_quantity: i64) -> CoreResult<Option<&LineItem>> {
        if new_quantity <= 0 {
            self.remove_item(item_id);
            return Ok(None);
        }

        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        let line = &self.items[index];
        stock::admit(line, new_quantity)?;
        validate_line_amount(line.unit_price, new_quantity, self.subtotal_without(item_id))?;
        self.items[index].quantity = new_quantity;

        Ok(Some(&self.items[index]))
    }

    /// Removes a line. Returns false if there was no such line.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.items.len() != initial_len
    }

    /// Resets items, customer, payment method, discount and manual tax.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Subtotal of every line except `item_id`.
    fn subtotal_without(&self, item_id: &str) -> Money {
        self.items
            .iter()
            .filter(|i| i.id != item_id)
            .map(LineItem::line_subtotal)
            .sum()
    }

    // =========================================================================
    // Context Setters
    // =========================================================================

    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    /// Sets the discount amount. Not clamped here; totals clamp it.
    pub fn set_discount(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("discount", amount)?;
        validate_within_limit("discount", amount)?;
        self.discount_amount = amount;
        Ok(())
    }

    /// Sets or clears the manual tax amount.
    pub fn set_manual_tax(&mut self, amount: Option<Money>) -> CoreResult<()> {
        if let Some(amount) = amount {
            validate_non_negative("manual tax", amount)?;
            validate_within_limit("manual tax", amount)?;
        }
        self.manual_tax = amount;
        Ok(())
    }

    // =========================================================================
    // Totals & Submission
    // =========================================================================

    /// Current totals. Pure: repeated calls return the same snapshot.
    pub fn totals(&self) -> RetailTotals {
        pricing::retail_totals(&self.items, self.discount_amount, self.manual_tax)
    }

    /// Checks every submission precondition and reports all failures.
    ///
    /// Quantities are re-checked against `live_stock`, not the snapshot
    /// taken at add time.
    pub fn validate_for_submission<L>(&self, live_stock: &L) -> Result<(), ValidationFailures>
    where
        L: StockLevels + ?Sized,
    {
        let mut issues = Vec::new();

        if self.items.is_empty() {
            issues.push(ValidationIssue::EmptyCart);
        }

        if self.customer.is_none() {
            issues.push(ValidationIssue::MissingCustomer);
        }

        for line in &self.items {
            let available = live_stock.available_or_zero(&line.product_id);
            if line.quantity > available {
                issues.push(ValidationIssue::InsufficientStock {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                });
            }
        }

        ValidationFailures::check(issues)
    }

    /// Builds the sale payload. Fails with every validation issue if the
    /// cart is not ready.
    pub fn prepare_submission_payload<L>(&self, live_stock: &L) -> CoreResult<SalePayload>
    where
        L: StockLevels + ?Sized,
    {
        self.validate_for_submission(live_stock)?;

        let customer = self.customer.as_ref().ok_or_else(|| {
            CoreError::ValidationFailed(ValidationFailures::single(ValidationIssue::MissingCustomer))
        })?;

        let totals = self.totals();

        Ok(SalePayload {
            customer_id: customer.id.clone(),
            tax_percentage: pricing::implied_tax_percentage(totals.tax, totals.subtotal),
            lines: self
                .items
                .iter()
                .map(|line| SaleLinePayload {
                    catalog_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            payment_method: self.payment_method,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::validation::MAX_CART_AMOUNT;
    use std::collections::HashMap;

    fn product(id: &str, price_cents: i64, stock: i64) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            unit_price: Money::from_cents(price_cents),
            available_stock: stock,
        }
    }

    fn customer() -> CustomerRef {
        CustomerRef {
            id: "c-1".to_string(),
            name: "Ana Torres".to_string(),
            phone: None,
            email: None,
        }
    }

    fn stock_of(entries: &[(&str, i64)]) -> HashMap<String, i64> {
        entries.iter().map(|(id, qty)| (id.to_string(), *qty)).collect()
    }

    #[test]
    fn test_add_item() {
        let mut cart = RetailCart::new();
        let line = cart.add_item(&product("1", 999, 10), 2).unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_subtotal(), Money::from_cents(1998));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = RetailCart::new();
        let p = product("1", 500, 10);

        cart.add_item(&p, 2).unwrap();
        cart.add_item(&p, 3).unwrap();
        cart.add_item(&p, 1).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 6);
        assert_eq!(cart.totals().item_count, 6);
    }

    #[test]
    fn test_add_checks_new_total_not_delta() {
        let mut cart = RetailCart::new();
        let p = product("1", 500, 5);

        cart.add_item(&p, 4).unwrap();
        let before = cart.clone();
        let totals_before = cart.totals();

        let err = cart.add_item(&p, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AdmissionDenied { available: 5, requested: 6, .. }
        ));
        assert_eq!(cart, before);
        assert_eq!(cart.totals(), totals_before);
    }

    #[test]
    fn test_merge_overflowing_quantity_is_refused() {
        let mut cart = RetailCart::new();
        let p = product("1", 500, 5);
        cart.add_item(&p, 1).unwrap();
        let before = cart.clone();

        let err = cart.add_item(&p, i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AdmissionDenied { available: 5, requested: i64::MAX, .. }
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = RetailCart::new();
        let err = cart.add_item(&product("1", -100, 5), 1).unwrap_err();

        assert!(matches!(err, CoreError::InputRejected(ValidationError::Negative { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_total_beyond_ceiling_is_refused() {
        let mut cart = RetailCart::new();
        let bulk = product("1", MAX_CART_AMOUNT.cents(), i64::MAX);

        cart.add_item(&bulk, 1).unwrap();
        let before = cart.clone();

        assert!(matches!(
            cart.add_item(&bulk, 1),
            Err(CoreError::InputRejected(ValidationError::TooLarge { .. }))
        ));
        assert!(cart.update_quantity("1", 3).is_err());
        assert!(cart.add_item(&product("2", 1, 10), 1).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_beyond_stock_to_empty_cart_is_refused() {
        let mut cart = RetailCart::new();
        assert!(cart.add_item(&product("1", 500, 1), 2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = RetailCart::new();
        let err = cart.add_item(&product("1", 500, 5), 0).unwrap_err();
        assert!(matches!(err, CoreError::InputRejected(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 250, 8), 1).unwrap();

        let line = cart.update_quantity("1", 8).unwrap().unwrap();
        assert_eq!(line.quantity, 8);
        assert_eq!(cart.totals().subtotal, Money::from_cents(2000));
    }

    #[test]
    fn test_update_quantity_beyond_stock_is_noop() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 250, 8), 3).unwrap();
        let before = cart.clone();

        assert!(cart.update_quantity("1", 9).is_err());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 250, 8), 3).unwrap();

        assert!(cart.update_quantity("1", 0).unwrap().is_none());
        assert!(cart.is_empty());
        assert!(cart.update_quantity("1", -1).unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_item() {
        let mut cart = RetailCart::new();
        assert!(matches!(
            cart.update_quantity("missing", 2),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 250, 8), 3).unwrap();

        assert!(!cart.remove_item("other"));
        assert_eq!(cart.items().len(), 1);
        assert!(cart.remove_item("1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_then_add_matches_fresh_cart() {
        let p = product("1", 300, 10);

        let mut cart = RetailCart::new();
        cart.add_item(&p, 5).unwrap();
        cart.remove_item("1");
        cart.add_item(&p, 2).unwrap();

        let mut fresh = RetailCart::new();
        fresh.add_item(&p, 2).unwrap();

        assert_eq!(cart.items(), fresh.items());
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        let mut cart = RetailCart::new();
        cart.set_discount(Money::from_cents(500)).unwrap();
        cart.set_manual_tax(Some(Money::from_cents(100))).unwrap();

        assert!(cart.set_discount(Money::from_cents(-1)).is_err());
        assert!(cart.set_manual_tax(Some(Money::from_cents(-1))).is_err());

        assert_eq!(cart.discount_amount(), Money::from_cents(500));
        assert_eq!(cart.manual_tax(), Some(Money::from_cents(100)));

        cart.set_manual_tax(None).unwrap();
        assert_eq!(cart.manual_tax(), None);

        let huge = Money::from_cents(MAX_CART_AMOUNT.cents() + 1);
        assert!(cart.set_discount(huge).is_err());
        assert!(cart.set_manual_tax(Some(huge)).is_err());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 250, 8), 3).unwrap();
        cart.set_customer(Some(customer()));
        cart.set_payment_method(Some(PaymentMethod::Cash));
        cart.set_discount(Money::from_cents(100)).unwrap();
        cart.set_manual_tax(Some(Money::from_cents(50))).unwrap();

        cart.clear();
        assert_eq!(cart, RetailCart::new());
    }

    #[test]
    fn test_totals_idempotent() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 333, 8), 3).unwrap();
        cart.set_discount(Money::from_cents(50)).unwrap();
        assert_eq!(cart.totals(), cart.totals());
    }

    #[test]
    fn test_validate_empty_cart() {
        let cart = RetailCart::new();
        let failures = cart.validate_for_submission(&stock_of(&[])).unwrap_err();
        assert!(failures.contains(&ValidationIssue::EmptyCart));
        assert!(failures.contains(&ValidationIssue::MissingCustomer));
    }

    #[test]
    fn test_validate_missing_customer() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 100, 5), 1).unwrap();

        let failures = cart.validate_for_submission(&stock_of(&[("1", 5)])).unwrap_err();
        assert_eq!(failures.issues(), &[ValidationIssue::MissingCustomer]);
    }

    #[test]
    fn test_validate_rechecks_live_stock() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 100, 5), 4).unwrap();
        cart.add_item(&product("2", 100, 5), 1).unwrap();
        cart.set_customer(Some(customer()));

        let failures = cart
            .validate_for_submission(&stock_of(&[("1", 2), ("2", 5)]))
            .unwrap_err();
        assert_eq!(
            failures.issues(),
            &[ValidationIssue::InsufficientStock {
                product_id: "1".to_string(),
                name: "Product 1".to_string(),
                available: 2,
                requested: 4,
            }]
        );

        assert!(cart.prepare_submission_payload(&stock_of(&[("1", 2), ("2", 5)])).is_err());
        assert!(cart.validate_for_submission(&stock_of(&[("1", 4), ("2", 5)])).is_ok());
    }

    #[test]
    fn test_validate_product_gone_from_catalog() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 100, 5), 1).unwrap();
        cart.set_customer(Some(customer()));

        let failures = cart.validate_for_submission(&stock_of(&[])).unwrap_err();
        assert!(matches!(
            failures.issues(),
            [ValidationIssue::InsufficientStock { available: 0, .. }]
        ));
    }

    #[test]
    fn test_payload_example() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("1", 10000, 5), 2).unwrap();
        cart.set_customer(Some(customer()));
        cart.set_discount(Money::from_cents(2000)).unwrap();
        cart.set_manual_tax(Some(Money::from_cents(3420))).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::from_cents(20000));
        assert_eq!(totals.subtotal_after_discount, Money::from_cents(18000));
        assert_eq!(totals.total, Money::from_cents(21420));

        let payload = cart.prepare_submission_payload(&stock_of(&[("1", 5)])).unwrap();
        assert_eq!(payload.customer_id, "c-1");
        assert!((payload.tax_percentage - 17.1).abs() < 1e-9);
        assert_eq!(
            payload.lines,
            vec![SaleLinePayload {
                catalog_id: "1".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(10000),
            }]
        );
        assert_eq!(payload.payment_method, None);
    }

    #[test]
    fn test_payload_zero_subtotal_has_zero_rate() {
        let mut cart = RetailCart::new();
        cart.add_item(&product("free", 0, 5), 1).unwrap();
        cart.set_customer(Some(customer()));
        cart.set_manual_tax(Some(Money::from_cents(100))).unwrap();
        cart.set_payment_method(Some(PaymentMethod::Transfer));

        let payload = cart.prepare_submission_payload(&stock_of(&[("free", 5)])).unwrap();
        assert_eq!(payload.tax_percentage, 0.0);
        assert_eq!(payload.payment_method, Some(PaymentMethod::Transfer));
    }
}
