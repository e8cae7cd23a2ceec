//! # Work Order Cart
//!
//! A maintenance or repair job: who brought which vehicle, which technician
//! takes it, the services performed and the parts used.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          WorkOrderCart                                  │
//! │                                                                         │
//! │  Context            customer? vehicle? technician?                      │
//! │  Job metadata       intake_date? due_date? odometer?                    │
//! │                     problem_description, diagnosis?                     │
//! │                                                                         │
//! │  ┌───────────────────────────┐     ┌───────────────────────────┐        │
//! │  │  services                 │     │  parts                    │        │
//! │  │  ServiceLineItem × n      │     │  PartLineItem × n         │        │
//! │  │  merge: +1 per add        │     │  merge: +1 per add        │        │
//! │  │  no stock                 │     │  no stock check           │        │
//! │  └─────────────┬─────────────┘     └─────────────┬─────────────┘        │
//! │                └──────────────┬──────────────────┘                      │
//! │                               ▼                                         │
//! │            subtotal × 16% = tax, subtotal + tax = total                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parts are catalog products, but the work order does not consult stock:
//! stock is enforced by the catalog when the order is processed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError, ValidationFailures, ValidationIssue};
use crate::money::{self, Money};
use crate::payload::{WorkOrderPartPayload, WorkOrderPayload, WorkOrderServicePayload};
use crate::pricing::{self, Priced, WorkOrderTotals};
use crate::types::{CustomerRef, ProductRef, ServiceRef, TechnicianRef, VehicleRef, WorkOrderStatus};
use crate::validation::{is_present, validate_line_amount, validate_non_negative, validate_odometer};

// =============================================================================
// Line Items
// =============================================================================

/// A service line. The id is the service id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLineItem {
    pub id: String,
    pub service_id: String,
    pub name: String,
    pub quantity: i64,
    /// Price at the time the service was first added.
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub unit_price: Money,
    pub notes: String,
}

impl ServiceLineItem {
    fn from_service(service: &ServiceRef) -> Self {
        ServiceLineItem {
            id: service.id.clone(),
            service_id: service.id.clone(),
            name: service.name.clone(),
            quantity: 1,
            unit_price: service.price,
            notes: String::new(),
        }
    }
}

impl Priced for ServiceLineItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

/// A part line. The id is the catalog product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartLineItem {
    pub id: String,
    pub part_id: String,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub unit_price: Money,
}

impl PartLineItem {
    fn from_product(product: &ProductRef) -> Self {
        PartLineItem {
            id: product.id.clone(),
            part_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.unit_price,
        }
    }
}

impl Priced for PartLineItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

// =============================================================================
// Work Order Cart
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderCart {
    customer: Option<CustomerRef>,
    vehicle: Option<VehicleRef>,
    technician: Option<TechnicianRef>,
    services: Vec<ServiceLineItem>,
    parts: Vec<PartLineItem>,
    intake_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    odometer: Option<u32>,
    problem_description: String,
    diagnosis: Option<String>,
}

impl WorkOrderCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn vehicle(&self) -> Option<&VehicleRef> {
        self.vehicle.as_ref()
    }

    pub fn technician(&self) -> Option<&TechnicianRef> {
        self.technician.as_ref()
    }

    pub fn services(&self) -> &[ServiceLineItem] {
        &self.services
    }

    pub fn parts(&self) -> &[PartLineItem] {
        &self.parts
    }

    pub fn intake_date(&self) -> Option<NaiveDate> {
        self.intake_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn odometer(&self) -> Option<u32> {
        self.odometer
    }

    pub fn problem_description(&self) -> &str {
        &self.problem_description
    }

    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }

    /// True when there are no services and no parts.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.parts.is_empty()
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Adds one unit of a service, merging into its existing line.
    ///
    /// A new line snapshots the catalog price, which must not be negative.
    pub fn add_service(&mut self, service: &ServiceRef) -> CoreResult<&ServiceLineItem> {
        match self.services.iter().position(|s| s.id == service.id) {
            Some(index) => {
                let line = &self.services[index];
                let quantity = bump(line.quantity)?;
                validate_line_amount(line.unit_price, quantity, self.subtotal_without(&service.id, ""))?;

                self.services[index].quantity = quantity;
                Ok(&self.services[index])
            }
            None => {
                validate_non_negative("unit price", service.price)?;
                validate_line_amount(service.price, 1, self.totals().subtotal)?;

                self.services.push(ServiceLineItem::from_service(service));
                Ok(&self.services[self.services.len() - 1])
            }
        }
    }

    /// Replaces a service line's quantity. `<= 0` removes the line.
    pub fn update_service_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<Option<&ServiceLineItem>> {
        if quantity <= 0 {
            self.remove_service(id);
            return Ok(None);
        }

        let index = self
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        validate_line_amount(self.services[index].unit_price, quantity, self.subtotal_without(id, ""))?;

        self.services[index].quantity = quantity;
        Ok(Some(&self.services[index]))
    }

    pub fn set_service_notes(&mut self, id: &str, notes: impl Into<String>) -> CoreResult<()> {
        let line = self
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        line.notes = notes.into();
        Ok(())
    }

    pub fn remove_service(&mut self, id: &str) -> bool {
        let initial_len = self.services.len();
        self.services.retain(|s| s.id != id);
        self.services.len() != initial_len
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Adds one unit of a part, merging into its existing line.
    ///
    /// Stock is not checked here. A new line snapshots the catalog price,
    /// which must not be negative.
    pub fn add_part(&mut self, product: &ProductRef) -> CoreResult<&PartLineItem> {
        match self.parts.iter().position(|p| p.id == product.id) {
            Some(index) => {
                let line = &self.parts[index];
                let quantity = bump(line.quantity)?;
                validate_line_amount(line.unit_price, quantity, self.subtotal_without("", &product.id))?;

                self.parts[index].quantity = quantity;
                Ok(&self.parts[index])
            }
            None => {
                validate_non_negative("unit price", product.unit_price)?;
                validate_line_amount(product.unit_price, 1, self.totals().subtotal)?;

                self.parts.push(PartLineItem::from_product(product));
                Ok(&self.parts[self.parts.len() - 1])
            }
        }
    }

    /// Replaces a part line's quantity. `<= 0` removes the line.
    pub fn update_part_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<Option<&PartLineItem>> {
        if quantity <= 0 {
            self.remove_part(id);
            return Ok(None);
        }

        let index = self
            .parts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        validate_line_amount(self.parts[index].unit_price, quantity, self.subtotal_without("", id))?;

        self.parts[index].quantity = quantity;
        Ok(Some(&self.parts[index]))
    }

    pub fn remove_part(&mut self, id: &str) -> bool {
        let initial_len = self.parts.len();
        self.parts.retain(|p| p.id != id);
        self.parts.len() != initial_len
    }

    // =========================================================================
    // Context & Metadata
    // =========================================================================

    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    pub fn set_vehicle(&mut self, vehicle: Option<VehicleRef>) {
        self.vehicle = vehicle;
    }

    pub fn set_technician(&mut self, technician: Option<TechnicianRef>) {
        self.technician = technician;
    }

    pub fn set_intake_date(&mut self, date: Option<NaiveDate>) {
        self.intake_date = date;
    }

    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.due_date = date;
    }

    /// Sets the odometer reading. Negative readings are rejected.
    pub fn set_odometer(&mut self, reading: Option<i64>) -> CoreResult<()> {
        self.odometer = reading.map(validate_odometer).transpose()?;
        Ok(())
    }

    pub fn set_problem_description(&mut self, text: impl Into<String>) {
        self.problem_description = text.into();
    }

    pub fn set_diagnosis(&mut self, text: Option<String>) {
        self.diagnosis = text;
    }

    /// Resets the whole order.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Order subtotal leaving out one service line and one part line.
    /// An empty id leaves nothing out of that collection.
    fn subtotal_without(&self, service_id: &str, part_id: &str) -> Money {
        let services: Money = self
            .services
            .iter()
            .filter(|s| s.id != service_id)
            .map(Priced::line_subtotal)
            .sum();
        let parts: Money = self
            .parts
            .iter()
            .filter(|p| p.id != part_id)
            .map(Priced::line_subtotal)
            .sum();
        services + parts
    }

    // =========================================================================
    // Totals & Submission
    // =========================================================================

    pub fn totals(&self) -> WorkOrderTotals {
        pricing::work_order_totals(&self.services, &self.parts)
    }

    /// Checks every submission precondition and reports all failures.
    pub fn validate_for_submission(&self) -> Result<(), ValidationFailures> {
        let mut issues = Vec::new();

        if self.vehicle.is_none() {
            issues.push(ValidationIssue::MissingVehicle);
        }
        if self.technician.is_none() {
            issues.push(ValidationIssue::MissingTechnician);
        }
        if self.intake_date.is_none() {
            issues.push(ValidationIssue::MissingIntakeDate);
        }
        if self.odometer.is_none() {
            issues.push(ValidationIssue::MissingOdometer);
        }
        if !is_present(&self.problem_description) {
            issues.push(ValidationIssue::MissingProblemDescription);
        }
        if self.is_empty() {
            issues.push(ValidationIssue::EmptyOrder);
        }

        ValidationFailures::check(issues)
    }

    /// Builds the work order payload. Fails with every validation issue if
    /// the order is not ready.
    pub fn prepare_submission_payload(&self) -> CoreResult<WorkOrderPayload> {
        self.validate_for_submission()?;

        let (vehicle, technician, intake_date, odometer) =
            match (&self.vehicle, &self.technician, self.intake_date, self.odometer) {
                (Some(v), Some(t), Some(d), Some(o)) => (v, t, d, o),
                _ => {
                    return Err(ValidationFailures::single(ValidationIssue::MissingVehicle).into());
                }
            };

        Ok(WorkOrderPayload {
            vehicle_id: vehicle.id.clone(),
            technician_id: technician.id.clone(),
            intake_date,
            due_date: self.due_date,
            odometer,
            problem_description: self.problem_description.trim().to_string(),
            diagnosis: self.diagnosis.clone().unwrap_or_default(),
            status: WorkOrderStatus::Pending,
            services: self
                .services
                .iter()
                .map(|s| WorkOrderServicePayload {
                    service_id: s.service_id.clone(),
                    price: s.line_subtotal(),
                    notes: s.notes.clone(),
                })
                .collect(),
            parts: self
                .parts
                .iter()
                .map(|p| WorkOrderPartPayload {
                    part_id: p.part_id.clone(),
                    quantity: p.quantity,
                    unit_price: p.unit_price,
                })
                .collect(),
            total: self.totals().total,
        })
    }
}

/// One more unit on a merged line.
fn bump(quantity: i64) -> CoreResult<i64> {
    quantity.checked_add(1).ok_or_else(|| {
        ValidationError::TooLarge {
            field: "quantity".to_string(),
        }
        .into()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, price_cents: i64) -> ServiceRef {
        ServiceRef {
            id: id.to_string(),
            name: format!("Service {}", id),
            price: Money::from_cents(price_cents),
            estimated_minutes: None,
        }
    }

    fn part(id: &str, price_cents: i64, stock: i64) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            sku: format!("P-{}", id),
            name: format!("Part {}", id),
            unit_price: Money::from_cents(price_cents),
            available_stock: stock,
        }
    }

    fn ready_order() -> WorkOrderCart {
        let mut order = WorkOrderCart::new();
        order.set_vehicle(Some(VehicleRef {
            id: "v-1".to_string(),
            plate: "ABC-123".to_string(),
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: Some(2018),
            customer_id: None,
        }));
        order.set_technician(Some(TechnicianRef {
            id: "t-1".to_string(),
            name: "Luis".to_string(),
            specialty: None,
        }));
        order.set_intake_date(NaiveDate::from_ymd_opt(2026, 10, 19));
        order.set_odometer(Some(120_500)).unwrap();
        order.set_problem_description("Noise when braking");
        order
    }

    #[test]
    fn test_add_service_merges_by_id() {
        let mut order = WorkOrderCart::new();
        let oil = service("s-1", 4500);

        order.add_service(&oil).unwrap();
        let line = order.add_service(&oil).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(order.services().len(), 1);
    }

    #[test]
    fn test_service_price_is_snapshotted() {
        let mut order = WorkOrderCart::new();
        order.add_service(&service("s-1", 4500)).unwrap();
        order.add_service(&service("s-1", 9900)).unwrap();

        assert_eq!(order.services()[0].unit_price, Money::from_cents(4500));
        assert_eq!(order.totals().subtotal_services, Money::from_cents(9000));
    }

    #[test]
    fn test_service_quantity_and_notes() {
        let mut order = WorkOrderCart::new();
        order.add_service(&service("s-1", 4500)).unwrap();

        order.update_service_quantity("s-1", 3).unwrap();
        order.set_service_notes("s-1", "synthetic oil").unwrap();
        assert_eq!(order.services()[0].quantity, 3);
        assert_eq!(order.services()[0].notes, "synthetic oil");

        assert!(matches!(
            order.set_service_notes("s-9", "x"),
            Err(CoreError::ItemNotFound(_))
        ));
        assert!(order.update_service_quantity("s-1", 0).unwrap().is_none());
        assert!(order.services().is_empty());
    }

    #[test]
    fn test_parts_ignore_stock() {
        let mut order = WorkOrderCart::new();
        let pads = part("p-1", 1000, 0);

        order.add_part(&pads).unwrap();
        order.add_part(&pads).unwrap();
        assert_eq!(order.parts()[0].quantity, 2);

        order.update_part_quantity("p-1", 40).unwrap();
        assert_eq!(order.parts()[0].quantity, 40);
    }

    #[test]
    fn test_overflowing_part_quantity_is_refused() {
        let mut order = WorkOrderCart::new();
        order.add_part(&part("p-1", 1000, 5)).unwrap();
        let before = order.clone();

        let err = order.update_part_quantity("p-1", 10_000_000_000_000_000).unwrap_err();
        assert!(matches!(err, CoreError::InputRejected(ValidationError::TooLarge { .. })));
        assert_eq!(order, before);
        assert_eq!(order.totals().subtotal_parts, Money::from_cents(1000));
    }

    #[test]
    fn test_overflowing_service_quantity_is_refused() {
        let mut order = WorkOrderCart::new();
        order.add_service(&service("s-1", 4500)).unwrap();
        order.add_part(&part("p-1", 1000, 5)).unwrap();

        assert!(order.update_service_quantity("s-1", i64::MAX).is_err());
        assert_eq!(order.services()[0].quantity, 1);
        assert_eq!(order.totals().total, Money::from_cents(6380));
    }

    #[test]
    fn test_merge_at_max_quantity_is_refused() {
        let mut order = WorkOrderCart::new();
        let free = part("p-0", 0, 0);
        order.add_part(&free).unwrap();
        order.update_part_quantity("p-0", i64::MAX).unwrap();

        assert!(order.add_part(&free).is_err());
        assert_eq!(order.parts()[0].quantity, i64::MAX);
    }

    #[test]
    fn test_negative_catalog_prices_rejected() {
        let mut order = WorkOrderCart::new();

        let err = order.add_service(&service("s-1", -500)).unwrap_err();
        assert!(matches!(err, CoreError::InputRejected(ValidationError::Negative { .. })));
        let err = order.add_part(&part("p-1", -100, 5)).unwrap_err();
        assert!(matches!(err, CoreError::InputRejected(ValidationError::Negative { .. })));

        assert!(order.is_empty());
        assert_eq!(order.totals().total, Money::zero());
    }

    #[test]
    fn test_remove_part() {
        let mut order = WorkOrderCart::new();
        order.add_part(&part("p-1", 1000, 5)).unwrap();

        assert!(!order.remove_part("p-2"));
        assert!(order.remove_part("p-1"));
        assert!(order.is_empty());
        assert!(matches!(
            order.update_part_quantity("p-1", 2),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_negative_odometer_rejected() {
        let mut order = WorkOrderCart::new();
        order.set_odometer(Some(1000)).unwrap();

        let err = order.set_odometer(Some(-5)).unwrap_err();
        assert!(matches!(err, CoreError::InputRejected(_)));
        assert_eq!(order.odometer(), Some(1000));

        order.set_odometer(None).unwrap();
        assert_eq!(order.odometer(), None);
    }

    #[test]
    fn test_totals_example() {
        let mut order = WorkOrderCart::new();
        order.add_service(&service("s-1", 5000)).unwrap();
        order.add_part(&part("p-9", 1000, 10)).unwrap();
        order.update_part_quantity("p-9", 3).unwrap();

        let totals = order.totals();
        assert_eq!(totals.subtotal_services, Money::from_cents(5000));
        assert_eq!(totals.subtotal_parts, Money::from_cents(3000));
        assert_eq!(totals.subtotal, Money::from_cents(8000));
        assert_eq!(totals.tax, Money::from_cents(1280));
        assert_eq!(totals.total, Money::from_cents(9280));
    }

    #[test]
    fn test_validate_reports_everything() {
        let order = WorkOrderCart::new();
        let failures = order.validate_for_submission().unwrap_err();

        assert_eq!(
            failures.issues(),
            &[
                ValidationIssue::MissingVehicle,
                ValidationIssue::MissingTechnician,
                ValidationIssue::MissingIntakeDate,
                ValidationIssue::MissingOdometer,
                ValidationIssue::MissingProblemDescription,
                ValidationIssue::EmptyOrder,
            ]
        );
    }

    #[test]
    fn test_blank_problem_description_is_missing() {
        let mut order = ready_order();
        order.add_service(&service("s-1", 5000)).unwrap();
        order.set_problem_description("   ");

        let failures = order.validate_for_submission().unwrap_err();
        assert_eq!(failures.issues(), &[ValidationIssue::MissingProblemDescription]);
    }

    #[test]
    fn test_empty_order_only() {
        let order = ready_order();
        let failures = order.validate_for_submission().unwrap_err();
        assert_eq!(failures.issues(), &[ValidationIssue::EmptyOrder]);
    }

    #[test]
    fn test_prepare_payload() {
        let mut order = ready_order();
        order.add_service(&service("s-1", 5000)).unwrap();
        order.set_service_notes("s-1", "front axle").unwrap();
        order.add_part(&part("p-9", 1000, 10)).unwrap();
        order.update_part_quantity("p-9", 3).unwrap();

        let payload = order.prepare_submission_payload().unwrap();
        assert_eq!(payload.vehicle_id, "v-1");
        assert_eq!(payload.technician_id, "t-1");
        assert_eq!(payload.odometer, 120_500);
        assert_eq!(payload.due_date, None);
        assert_eq!(payload.diagnosis, "");
        assert_eq!(payload.status, WorkOrderStatus::Pending);
        assert_eq!(
            payload.services,
            vec![WorkOrderServicePayload {
                service_id: "s-1".to_string(),
                price: Money::from_cents(5000),
                notes: "front axle".to_string(),
            }]
        );
        assert_eq!(payload.parts[0].quantity, 3);
        assert_eq!(payload.total, Money::from_cents(9280));
    }

    #[test]
    fn test_service_payload_price_is_line_subtotal() {
        let mut order = ready_order();
        order.add_service(&service("s-1", 2500)).unwrap();
        order.add_service(&service("s-1", 2500)).unwrap();
        order.set_diagnosis(Some("Worn pads".to_string()));

        let payload = order.prepare_submission_payload().unwrap();
        assert_eq!(payload.services[0].price, Money::from_cents(5000));
        assert_eq!(payload.diagnosis, "Worn pads");
    }

    #[test]
    fn test_invalid_order_builds_no_payload() {
        let mut order = ready_order();
        order.set_technician(None);
        order.add_part(&part("p-1", 100, 1)).unwrap();

        let err = order.prepare_submission_payload().unwrap_err();
        match err {
            CoreError::ValidationFailed(failures) => {
                assert_eq!(failures.issues(), &[ValidationIssue::MissingTechnician]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clear() {
        let mut order = ready_order();
        order.add_service(&service("s-1", 5000)).unwrap();
        order.clear();
        assert_eq!(order, WorkOrderCart::new());
    }
}
