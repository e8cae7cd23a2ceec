//! # Stock Policy
//!
//! Decides whether a requested quantity of a catalog item may enter a cart.
//!
//! ## When It Runs
//! ```text
//! add_item(product, +2)      existing 3 ──► admit(product, 5)   (new total)
//! update_quantity(id, 7)                ──► admit(line, 7)      (full value)
//! validate_for_submission               ──► live stock re-check (StockLevels)
//! ```
//!
//! The add-time figure is a snapshot; the submission re-check against
//! [`StockLevels`] is what catches stock that moved since.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::types::ProductRef;

/// Anything carrying an available-stock figure.
pub trait Stocked {
    /// Catalog id the stock belongs to.
    fn stock_id(&self) -> &str;

    /// Name used in operator-facing messages.
    fn stock_name(&self) -> &str;

    /// Units available.
    fn available_stock(&self) -> i64;
}

impl Stocked for ProductRef {
    fn stock_id(&self) -> &str {
        &self.id
    }

    fn stock_name(&self) -> &str {
        &self.name
    }

    fn available_stock(&self) -> i64 {
        self.available_stock
    }
}

/// Returns true if `requested` units of `item` may be held in a cart.
///
/// Admissible iff `0 < requested <= available`.
pub fn can_admit<S: Stocked + ?Sized>(item: &S, requested: i64) -> bool {
    requested > 0 && requested <= item.available_stock()
}

/// Like [`can_admit`], but explains a refusal.
pub fn admit<S: Stocked + ?Sized>(item: &S, requested: i64) -> CoreResult<()> {
    if can_admit(item, requested) {
        return Ok(());
    }

    Err(refusal(item, requested))
}

/// The `AdmissionDenied` error for `requested` units of `item`.
pub fn refusal<S: Stocked + ?Sized>(item: &S, requested: i64) -> CoreError {
    CoreError::AdmissionDenied {
        product_id: item.stock_id().to_string(),
        name: item.stock_name().to_string(),
        available: item.available_stock(),
        requested,
    }
}

// =============================================================================
// Live Stock
// =============================================================================

/// Current stock figures, fetched just before submission.
pub trait StockLevels {
    /// Units available for `product_id`, or `None` if the catalog no longer
    /// knows the product.
    fn available(&self, product_id: &str) -> Option<i64>;

    /// Units available, counting an unknown product as out of stock.
    fn available_or_zero(&self, product_id: &str) -> i64 {
        self.available(product_id).unwrap_or(0)
    }
}

impl StockLevels for HashMap<String, i64> {
    fn available(&self, product_id: &str) -> Option<i64> {
        self.get(product_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(i64);

    impl Stocked for Item {
        fn stock_id(&self) -> &str {
            "p-1"
        }
        fn stock_name(&self) -> &str {
            "Oil filter"
        }
        fn available_stock(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_can_admit_bounds() {
        let item = Item(5);
        assert!(can_admit(&item, 1));
        assert!(can_admit(&item, 5));
        assert!(!can_admit(&item, 6));
        assert!(!can_admit(&item, 0));
        assert!(!can_admit(&item, -2));
    }

    #[test]
    fn test_nothing_admitted_without_stock() {
        assert!(!can_admit(&Item(0), 1));
        assert!(!can_admit(&Item(-4), 1));
    }

    #[test]
    fn test_admit_explains_refusal() {
        let err = admit(&Item(3), 5).unwrap_err();
        match err {
            CoreError::AdmissionDenied {
                product_id,
                available,
                requested,
                ..
            } => {
                assert_eq!(product_id, "p-1");
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_live_levels_unknown_product() {
        let mut levels = HashMap::new();
        levels.insert("p-1".to_string(), 4);
        assert_eq!(levels.available("p-1"), Some(4));
        assert_eq!(levels.available("gone"), None);
        assert_eq!(levels.available_or_zero("gone"), 0);
    }
}
