//! # Order Submission
//!
//! Turns a finished cart into a created order, at most one call at a time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Submission Lifecycle                                │
//! │                                                                         │
//! │   ┌──────┐  submit (claimed)    ┌────────────┐   API ok   ┌───────────┐ │
//! │   │ Idle │ ───────────────────► │ Submitting │ ─────────► │ Succeeded │ │
//! │   └──────┘                      └─────┬──────┘            └───────────┘ │
//! │      ▲                                │ transport / server error        │
//! │      │                                ▼                                 │
//! │      │                          ┌────────────┐                          │
//! │      └──────── reset() ──────── │   Failed   │  (resubmit is manual)    │
//! │                                 └────────────┘                          │
//! │                                                                         │
//! │   Validation failure: prior state restored, nothing sent.               │
//! │   Submit while Submitting: AlreadySubmitting, nothing sent.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retail Flow
//! ```text
//! claim guard ──► get_product(id) per line ──► live StockLevels
//!                                                     │
//!               prepare_submission_payload(live) ◄────┘
//!                        │ Ok(payload)
//!                        ▼
//!               create_sale_order(payload) ──► Succeeded { id } | Failed
//! ```
//!
//! The caller clears its cart after `Succeeded`. On `Failed` the cart is left
//! as it was so the operator can correct it and try again.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use shopfloor_core::{ErrorKind, RetailCart, WorkOrderCart};

use crate::api::{OrderCreateApi, OrderId, ProductLookup};
use crate::error::{ClientError, ClientResult};

// =============================================================================
// State & Outcome
// =============================================================================

/// Where a submission attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded { id: OrderId },
    Failed { reason: String },
}

/// Result event reported to the front end after a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Succeeded { id: OrderId },
    Failed { reason: String, kind: ErrorKind },
}

impl SubmissionOutcome {
    pub fn from_result(result: &ClientResult<OrderId>) -> Self {
        match result {
            Ok(id) => SubmissionOutcome::Succeeded { id: id.clone() },
            Err(e) => SubmissionOutcome::Failed {
                reason: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

// =============================================================================
// Order Submission
// =============================================================================

/// Submission guard for one cart.
///
/// The state lock is only held for state transitions, never across the
/// remote call, so cart edits are not blocked while a submission is out.
#[derive(Debug, Default)]
pub struct OrderSubmission {
    state: Mutex<SubmissionState>,
}

impl OrderSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state (cloned).
    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(*self.lock(), SubmissionState::Submitting)
    }

    /// Back to `Idle`. Refused while a call is in flight.
    pub fn reset(&self) -> ClientResult<()> {
        let mut state = self.lock();
        if matches!(*state, SubmissionState::Submitting) {
            return Err(ClientError::AlreadySubmitting);
        }
        *state = SubmissionState::Idle;
        Ok(())
    }

    /// Claims the guard: under one lock, refuses if a submission is in
    /// flight, otherwise moves to `Submitting`.
    ///
    /// The returned [`Claim`] puts the previous state back if it is dropped
    /// before [`Claim::finish`], so an attempt that fails validation (or is
    /// cancelled) leaves no trace.
    fn claim(&self) -> ClientResult<Claim<'_>> {
        let mut state = self.lock();
        if matches!(*state, SubmissionState::Submitting) {
            warn!("Submission refused: one is already in flight");
            return Err(ClientError::AlreadySubmitting);
        }

        let prior = std::mem::replace(&mut *state, SubmissionState::Submitting);
        Ok(Claim {
            submission: self,
            prior: Some(prior),
        })
    }

    // =========================================================================
    // Retail
    // =========================================================================

    /// Validates a retail cart against live stock and creates the sale.
    ///
    /// The guard is claimed before the stock fetch, so a second submit
    /// arriving during that round trip is refused.
    ///
    /// ## Errors
    /// - `AlreadySubmitting` if a call is in flight
    /// - `Rejected(ValidationFailed)` with every issue; nothing is sent
    /// - transport / server errors from the stock fetch or the create call
    pub async fn submit_sale<P, O>(&self, cart: &RetailCart, products: &P, orders: &O) -> ClientResult<OrderId>
    where
        P: ProductLookup + ?Sized,
        O: OrderCreateApi + ?Sized,
    {
        let claim = self.claim()?;

        let live_stock = match fetch_live_stock(cart, products).await {
            Ok(levels) => levels,
            Err(e) => return claim.finish(Err(e)),
        };
        let payload = cart.prepare_submission_payload(&live_stock).map_err(|e| {
            warn!(error = %e, "Sale failed validation");
            ClientError::from(e)
        })?;

        debug!(lines = payload.lines.len(), customer_id = %payload.customer_id, "Creating sale");

        let result = orders.create_sale_order(&payload).await;
        claim.finish(result)
    }

    // =========================================================================
    // Work Order
    // =========================================================================

    /// Validates a work order and creates it.
    pub async fn submit_work_order<O>(&self, order: &WorkOrderCart, orders: &O) -> ClientResult<OrderId>
    where
        O: OrderCreateApi + ?Sized,
    {
        let claim = self.claim()?;

        let payload = order.prepare_submission_payload().map_err(|e| {
            warn!(error = %e, "Work order failed validation");
            ClientError::from(e)
        })?;

        debug!(
            vehicle_id = %payload.vehicle_id,
            services = payload.services.len(),
            parts = payload.parts.len(),
            "Creating work order"
        );

        let result = orders.create_work_order(&payload).await;
        claim.finish(result)
    }
}

/// An in-flight attempt holding the `Submitting` state.
struct Claim<'a> {
    submission: &'a OrderSubmission,
    prior: Option<SubmissionState>,
}

impl Claim<'_> {
    /// Records the result of the attempt as `Succeeded` or `Failed`.
    fn finish(mut self, result: ClientResult<OrderId>) -> ClientResult<OrderId> {
        let next = match &result {
            Ok(id) => {
                info!(order_id = %id, "Submission succeeded");
                SubmissionState::Succeeded { id: id.clone() }
            }
            Err(e) => {
                error!(error = %e, retryable = e.is_retryable(), "Submission failed");
                SubmissionState::Failed { reason: e.to_string() }
            }
        };
        self.prior = None;
        *self.submission.lock() = next;
        result
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            *self.submission.lock() = prior;
        }
    }
}

/// Current stock for every product in the cart. Products the catalog no
/// longer returns are left out and count as zero.
async fn fetch_live_stock<P>(cart: &RetailCart, products: &P) -> ClientResult<HashMap<String, i64>>
where
    P: ProductLookup + ?Sized,
{
    let mut levels = HashMap::with_capacity(cart.items().len());

    for line in cart.items() {
        if let Some(product) = products.get_product(&line.product_id).await? {
            levels.insert(line.product_id.clone(), product.available_stock);
        }
    }

    Ok(levels)
}

// =============================================================================
// Unit Tests
// =============================================================================
