//! # Submit Commands
//!
//! Sends the retail cart or the work order to the back office.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_sale / submit_work_order                      │
//! │                                                                         │
//! │  1. Snapshot the cart (clone under the lock, release it)                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  2. OrderSubmission::submit_*(snapshot)                                 │
//! │     • refuses if one is already in flight                               │
//! │     • validates (retail: against live stock), nothing sent on failure   │
//! │     • one create call                                                   │
//! │                              │                                          │
//! │              ┌───────────────┴───────────────┐                          │
//! │              ▼                               ▼                          │
//! │  3a. Ok(id): clear the cart          3b. Err: cart kept as it was       │
//! │              │                               │                          │
//! │              └───────────────┬───────────────┘                          │
//! │                              ▼                                          │
//! │  4. Notification::from_outcome → sink                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use shopfloor_client::{ClientResult, Notification, NotificationSink, OrderId, SubmissionOutcome, SubmissionState};

use crate::error::ApiError;
use crate::state::{ApiState, SessionState};

/// Submission state of both carts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatus {
    pub sale: SubmissionState,
    pub work_order: SubmissionState,
}

pub fn get_submission_status(session: &SessionState) -> SubmissionStatus {
    SubmissionStatus {
        sale: session.sale_submission().state(),
        work_order: session.work_order_submission().state(),
    }
}

fn report(sink: &dyn NotificationSink, what: &str, result: &ClientResult<OrderId>) {
    let outcome = SubmissionOutcome::from_result(result);
    sink.notify(Notification::from_outcome(what, &outcome));
}

/// Submits the retail cart as a sale.
///
/// ## Behavior
/// - Stock is re-checked against the catalog before anything is sent
/// - On success the cart is cleared
/// - On any failure the cart is left untouched so the operator can fix it
pub async fn submit_sale(
    api: &ApiState,
    session: &SessionState,
    sink: &dyn NotificationSink,
) -> Result<OrderId, ApiError> {
    debug!("submit_sale command");

    let snapshot = session.with_cart(|c| c.clone());
    let result = session
        .sale_submission()
        .submit_sale(&snapshot, api.products.as_ref(), api.orders.as_ref())
        .await;

    report(sink, "Sale", &result);

    let id = result?;
    session.with_cart_mut(|c| c.clear());
    info!(order_id = %id, "Sale submitted, cart cleared");
    Ok(id)
}

/// Submits the work order.
pub async fn submit_work_order(
    api: &ApiState,
    session: &SessionState,
    sink: &dyn NotificationSink,
) -> Result<OrderId, ApiError> {
    debug!("submit_work_order command");

    let snapshot = session.with_work_order(|w| w.clone());
    let result = session
        .work_order_submission()
        .submit_work_order(&snapshot, api.orders.as_ref())
        .await;

    report(sink, "Work order", &result);

    let id = result?;
    session.with_work_order_mut(|w| w.clear());
    info!(order_id = %id, "Work order submitted, order cleared");
    Ok(id)
}
