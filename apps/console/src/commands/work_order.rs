//! # Work Order Commands
//!
//! Commands for building a workshop work order: services, parts, vehicle,
//! technician, dates, odometer and the free-text fields.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Work Order Assembly                                  │
//! │                                                                         │
//! │  vehicle ──┐                                                            │
//! │  technician┼──► header ──┐                                              │
//! │  customer ─┘             │                                              │
//! │  intake / due / odometer ┼──► WorkOrderCart ──► submit_work_order      │
//! │  problem / diagnosis ────┘        ▲                                     │
//! │                                   │                                     │
//! │  services (search → pick) ────────┤                                     │
//! │  parts (catalog id, no stock check)┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use shopfloor_core::{
    CustomerRef, PartLineItem, ServiceLineItem, ServiceRef, TechnicianRef, VehicleRef, WorkOrderCart,
    WorkOrderTotals,
};

use crate::error::ApiError;
use crate::state::{ApiState, SessionState};

/// Work order response: every field plus totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderResponse {
    pub customer: Option<CustomerRef>,
    pub vehicle: Option<VehicleRef>,
    pub technician: Option<TechnicianRef>,
    pub services: Vec<ServiceLineItem>,
    pub parts: Vec<PartLineItem>,
    pub intake_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub odometer: Option<u32>,
    pub problem_description: String,
    pub diagnosis: Option<String>,
    pub totals: WorkOrderTotals,
}

impl From<&WorkOrderCart> for WorkOrderResponse {
    fn from(order: &WorkOrderCart) -> Self {
        WorkOrderResponse {
            customer: order.customer().cloned(),
            vehicle: order.vehicle().cloned(),
            technician: order.technician().cloned(),
            services: order.services().to_vec(),
            parts: order.parts().to_vec(),
            intake_date: order.intake_date(),
            due_date: order.due_date(),
            odometer: order.odometer(),
            problem_description: order.problem_description().to_string(),
            diagnosis: order.diagnosis().map(str::to_string),
            totals: order.totals(),
        }
    }
}

fn respond(session: &SessionState) -> WorkOrderResponse {
    session.with_work_order(|w| WorkOrderResponse::from(w))
}

pub fn get_work_order(session: &SessionState) -> WorkOrderResponse {
    debug!("get_work_order command");
    respond(session)
}

// =============================================================================
// Services
// =============================================================================

/// Adds a service, or bumps its quantity by one if already present.
pub fn add_service(session: &SessionState, service: &ServiceRef) -> Result<WorkOrderResponse, ApiError> {
    debug!(service_id = %service.id, "add_service command");

    session.with_work_order_mut(|w| {
        w.add_service(service)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn update_service_quantity(
    session: &SessionState,
    service_id: &str,
    quantity: i64,
) -> Result<WorkOrderResponse, ApiError> {
    debug!(service_id = %service_id, quantity = %quantity, "update_service_quantity command");

    session.with_work_order_mut(|w| {
        w.update_service_quantity(service_id, quantity)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn set_service_notes(session: &SessionState, service_id: &str, notes: &str) -> Result<WorkOrderResponse, ApiError> {
    debug!(service_id = %service_id, "set_service_notes command");

    session.with_work_order_mut(|w| {
        w.set_service_notes(service_id, notes)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn remove_service(session: &SessionState, service_id: &str) -> WorkOrderResponse {
    debug!(service_id = %service_id, "remove_service command");

    session.with_work_order_mut(|w| {
        w.remove_service(service_id);
        WorkOrderResponse::from(&*w)
    })
}

// =============================================================================
// Parts
// =============================================================================

/// Adds a catalog product as a part. Parts are not checked against stock.
pub async fn add_part(api: &ApiState, session: &SessionState, product_id: &str) -> Result<WorkOrderResponse, ApiError> {
    debug!(product_id = %product_id, "add_part command");

    let product = api
        .products
        .get_product(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    session.with_work_order_mut(|w| {
        w.add_part(&product)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn update_part_quantity(session: &SessionState, part_id: &str, quantity: i64) -> Result<WorkOrderResponse, ApiError> {
    debug!(part_id = %part_id, quantity = %quantity, "update_part_quantity command");

    session.with_work_order_mut(|w| {
        w.update_part_quantity(part_id, quantity)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn remove_part(session: &SessionState, part_id: &str) -> WorkOrderResponse {
    debug!(part_id = %part_id, "remove_part command");

    session.with_work_order_mut(|w| {
        w.remove_part(part_id);
        WorkOrderResponse::from(&*w)
    })
}

// =============================================================================
// Header Fields
// =============================================================================

pub fn set_vehicle(session: &SessionState, vehicle: Option<VehicleRef>) -> WorkOrderResponse {
    debug!(vehicle_id = ?vehicle.as_ref().map(|v| v.id.as_str()), "set_vehicle command");

    session.with_work_order_mut(|w| {
        w.set_vehicle(vehicle);
        WorkOrderResponse::from(&*w)
    })
}

pub fn set_technician(session: &SessionState, technician: Option<TechnicianRef>) -> WorkOrderResponse {
    debug!(technician_id = ?technician.as_ref().map(|t| t.id.as_str()), "set_technician command");

    session.with_work_order_mut(|w| {
        w.set_technician(technician);
        WorkOrderResponse::from(&*w)
    })
}

pub fn set_work_order_customer(session: &SessionState, customer: Option<CustomerRef>) -> WorkOrderResponse {
    debug!(customer_id = ?customer.as_ref().map(|c| c.id.as_str()), "set_work_order_customer command");

    session.with_work_order_mut(|w| {
        w.set_customer(customer);
        WorkOrderResponse::from(&*w)
    })
}

pub fn set_intake_date(session: &SessionState, date: Option<NaiveDate>) -> WorkOrderResponse {
    debug!(intake_date = ?date, "set_intake_date command");

    session.with_work_order_mut(|w| {
        w.set_intake_date(date);
        WorkOrderResponse::from(&*w)
    })
}

pub fn set_due_date(session: &SessionState, date: Option<NaiveDate>) -> WorkOrderResponse {
    debug!(due_date = ?date, "set_due_date command");

    session.with_work_order_mut(|w| {
        w.set_due_date(date);
        WorkOrderResponse::from(&*w)
    })
}

/// Sets the odometer reading. Negative readings are rejected.
pub fn set_odometer(session: &SessionState, reading: Option<i64>) -> Result<WorkOrderResponse, ApiError> {
    debug!(odometer = ?reading, "set_odometer command");

    session.with_work_order_mut(|w| {
        w.set_odometer(reading)?;
        Ok::<WorkOrderResponse, ApiError>(WorkOrderResponse::from(&*w))
    })
}

pub fn set_problem_description(session: &SessionState, text: &str) -> WorkOrderResponse {
    debug!("set_problem_description command");

    session.with_work_order_mut(|w| {
        w.set_problem_description(text);
        WorkOrderResponse::from(&*w)
    })
}

pub fn set_diagnosis(session: &SessionState, text: Option<String>) -> WorkOrderResponse {
    debug!("set_diagnosis command");

    session.with_work_order_mut(|w| {
        w.set_diagnosis(text);
        WorkOrderResponse::from(&*w)
    })
}

pub fn clear_work_order(session: &SessionState) -> WorkOrderResponse {
    debug!("clear_work_order command");

    if session.work_order_submission().reset().is_err() {
        debug!("Work order submission in flight, status kept");
    }

    session.with_work_order_mut(|w| {
        w.clear();
        WorkOrderResponse::from(&*w)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{api_with_products, product, service};
    use shopfloor_client::api::MockProductLookup;
    use shopfloor_core::Money;

    #[test]
    fn test_services_merge_and_totals() {
        let session = SessionState::new();
        let oil_change = service("s-1", 4500);

        add_service(&session, &oil_change).unwrap();
        let order = add_service(&session, &oil_change).unwrap();

        assert_eq!(order.services.len(), 1);
        assert_eq!(order.services[0].quantity, 2);
        assert_eq!(order.totals.subtotal_services, Money::from_cents(9000));
        assert_eq!(order.totals.tax, Money::from_cents(1440));
        assert_eq!(order.totals.total, Money::from_cents(10440));
    }

    #[test]
    fn test_service_notes_and_quantity() {
        let session = SessionState::new();
        add_service(&session, &service("s-1", 4500)).unwrap();

        let order = set_service_notes(&session, "s-1", "Use synthetic oil").unwrap();
        assert_eq!(order.services[0].notes, "Use synthetic oil");

        let err = set_service_notes(&session, "s-9", "x").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let order = update_service_quantity(&session, "s-1", 0).unwrap();
        assert!(order.services.is_empty());
    }

    #[tokio::test]
    async fn test_add_part_skips_stock_check() {
        let mut products = MockProductLookup::new();
        products
            .expect_get_product()
            .once()
            .returning(|_| Ok(Some(product("p-7", 2500, 0))));

        let api = api_with_products(products);
        let session = SessionState::new();

        let order = add_part(&api, &session, "p-7").await.unwrap();
        assert_eq!(order.parts.len(), 1);
        assert_eq!(order.totals.subtotal_parts, Money::from_cents(2500));

        let order = update_part_quantity(&session, "p-7", 3).unwrap();
        assert_eq!(order.parts[0].quantity, 3);

        let err = update_part_quantity(&session, "p-7", 10_000_000_000_000_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_work_order(&session).parts[0].quantity, 3);

        let order = remove_part(&session, "p-7");
        assert!(order.parts.is_empty());
    }

    #[test]
    fn test_odometer_rejects_negative() {
        let session = SessionState::new();

        let err = set_odometer(&session, Some(-5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let order = set_odometer(&session, Some(84_250)).unwrap();
        assert_eq!(order.odometer, Some(84_250));
    }

    #[test]
    fn test_header_fields_and_clear() {
        let session = SessionState::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        set_intake_date(&session, Some(date));
        set_problem_description(&session, "Grinding noise when braking");
        let order = set_diagnosis(&session, Some("Worn front pads".to_string()));

        assert_eq!(order.intake_date, Some(date));
        assert_eq!(order.problem_description, "Grinding noise when braking");
        assert_eq!(order.diagnosis.as_deref(), Some("Worn front pads"));

        let order = clear_work_order(&session);
        assert!(order.intake_date.is_none());
        assert!(order.problem_description.is_empty());
        assert_eq!(order.totals.total, Money::zero());
    }
}
