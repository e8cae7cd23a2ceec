//! # Submission Payloads
//!
//! The exact JSON bodies sent to the order-creation endpoints. Built only by
//! `RetailCart::prepare_submission_payload` and
//! `WorkOrderCart::prepare_submission_payload`, after validation passed.
//!
//! ## Sale
//! ```json
//! {
//!   "customerId": "c-1",
//!   "taxPercentage": 17.1,
//!   "lines": [{ "catalogId": "p-1", "quantity": 2, "unitPrice": 100.0 }],
//!   "paymentMethod": "cash"
//! }
//! ```
//! `paymentMethod` is left out entirely when none was chosen.
//!
//! ## Work Order
//! ```json
//! {
//!   "vehicleId": "v-1", "technicianId": "t-1",
//!   "intakeDate": "2026-10-19", "dueDate": null,
//!   "odometer": 120500, "problemDescription": "Noise when braking",
//!   "diagnosis": "", "status": "pending",
//!   "services": [{ "serviceId": "s-1", "price": 50.0, "notes": "" }],
//!   "parts": [{ "partId": "p-9", "quantity": 3, "unitPrice": 10.0 }],
//!   "total": 92.8
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::{self, Money};
use crate::types::{PaymentMethod, WorkOrderStatus};

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub customer_id: String,
    pub tax_percentage: f64,
    pub lines: Vec<SaleLinePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    pub catalog_id: String,
    pub quantity: i64,
    #[serde(with = "money::major_units")]
    pub unit_price: Money,
}

// =============================================================================
// Work Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderPayload {
    pub vehicle_id: String,
    pub technician_id: String,
    pub intake_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub odometer: u32,
    pub problem_description: String,
    /// Empty when no diagnosis has been written yet.
    pub diagnosis: String,
    pub status: WorkOrderStatus,
    pub services: Vec<WorkOrderServicePayload>,
    pub parts: Vec<WorkOrderPartPayload>,
    #[serde(with = "money::major_units")]
    pub total: Money,
}

/// One service line. `price` is the line subtotal (unit price × quantity),
/// since the endpoint takes no service quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderServicePayload {
    pub service_id: String,
    #[serde(with = "money::major_units")]
    pub price: Money,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderPartPayload {
    pub part_id: String,
    pub quantity: i64,
    #[serde(with = "money::major_units")]
    pub unit_price: Money,
}
