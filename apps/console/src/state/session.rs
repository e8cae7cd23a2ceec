//! # Session State
//!
//! The two carts an operator works on, and one submission guard for each.
//!
//! ## Thread Safety
//! Each cart sits behind its own `Mutex`. Locks are taken inside
//! `with_*` closures and released before any `.await`, so a submission in
//! flight never blocks cart edits.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Operator Action          Command                  State Change         │
//! │  ───────────────          ───────                  ────────────         │
//! │                                                                         │
//! │  add p-17 2 ─────────────► add_to_cart() ────────► cart.add_item        │
//! │                                                                         │
//! │  qty p-17 3 ─────────────► update_cart_item() ───► cart.update_quantity │
//! │                                                                         │
//! │  wo service 1 ───────────► add_service() ────────► work_order.add_...   │
//! │                                                                         │
//! │  submit ─────────────────► submit_sale() ────────► clone cart, send,    │
//! │                                                    clear on success     │
//! │                                                                         │
//! │  NOTE: Write operations hold the cart lock only for the mutation.       │
//! │        The submission guard has its own lock.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use shopfloor_client::OrderSubmission;
use shopfloor_core::{RetailCart, WorkOrderCart};

/// Carts and submission guards for one operator session.
#[derive(Debug, Default)]
pub struct SessionState {
    cart: Mutex<RetailCart>,
    work_order: Mutex<WorkOrderCart>,
    sale_submission: OrderSubmission,
    work_order_submission: OrderSubmission,
}

/// A poisoned cart is still a valid cart: every mutation either completes
/// or leaves it untouched.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionState {
    /// Creates a session with two empty carts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the retail cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = session.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RetailCart) -> R,
    {
        f(&lock(&self.cart))
    }

    /// Executes a function with write access to the retail cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.with_cart_mut(|cart| cart.add_item(&product, 1).map(|_| ()))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RetailCart) -> R,
    {
        f(&mut lock(&self.cart))
    }

    /// Executes a function with read access to the work order.
    pub fn with_work_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&WorkOrderCart) -> R,
    {
        f(&lock(&self.work_order))
    }

    /// Executes a function with write access to the work order.
    pub fn with_work_order_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut WorkOrderCart) -> R,
    {
        f(&mut lock(&self.work_order))
    }

    pub fn sale_submission(&self) -> &OrderSubmission {
        &self.sale_submission
    }

    pub fn work_order_submission(&self) -> &OrderSubmission {
        &self.work_order_submission
    }
}
