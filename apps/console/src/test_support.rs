//! Fixtures shared by the command and REPL tests.

use std::sync::Arc;

use shopfloor_client::api::{
    MockCustomerLookup, MockOrderCreateApi, MockProductLookup, MockServiceLookup, MockTechnicianLookup,
    MockVehicleLookup,
};
use shopfloor_core::{CustomerRef, Money, ProductRef, ServiceRef, TechnicianRef, VehicleRef};

use crate::state::ApiState;

/// One mock per API seam. Set expectations, then call [`Mocks::into_api`].
pub struct Mocks {
    pub products: MockProductLookup,
    pub customers: MockCustomerLookup,
    pub technicians: MockTechnicianLookup,
    pub vehicles: MockVehicleLookup,
    pub services: MockServiceLookup,
    pub orders: MockOrderCreateApi,
}

impl Mocks {
    pub fn new() -> Self {
        Mocks {
            products: MockProductLookup::new(),
            customers: MockCustomerLookup::new(),
            technicians: MockTechnicianLookup::new(),
            vehicles: MockVehicleLookup::new(),
            services: MockServiceLookup::new(),
            orders: MockOrderCreateApi::new(),
        }
    }

    pub fn into_api(self) -> ApiState {
        ApiState {
            products: Arc::new(self.products),
            customers: Arc::new(self.customers),
            technicians: Arc::new(self.technicians),
            vehicles: Arc::new(self.vehicles),
            services: Arc::new(self.services),
            orders: Arc::new(self.orders),
        }
    }
}

pub fn api_with_products(products: MockProductLookup) -> ApiState {
    Mocks { products, ..Mocks::new() }.into_api()
}

pub fn product(id: &str, price_cents: i64, stock: i64) -> ProductRef {
    ProductRef {
        id: id.to_string(),
        sku: format!("SKU-{}", id),
        name: format!("Product {}", id),
        unit_price: Money::from_cents(price_cents),
        available_stock: stock,
    }
}

pub fn service(id: &str, price_cents: i64) -> ServiceRef {
    ServiceRef {
        id: id.to_string(),
        name: format!("Service {}", id),
        price: Money::from_cents(price_cents),
        estimated_minutes: None,
    }
}

pub fn customer() -> CustomerRef {
    CustomerRef {
        id: "c-1".to_string(),
        name: "Ana Torres".to_string(),
        phone: None,
        email: None,
    }
}

pub fn vehicle() -> VehicleRef {
    VehicleRef {
        id: "v-1".to_string(),
        plate: "ABC-123".to_string(),
        make: "Toyota".to_string(),
        model: "Hilux".to_string(),
        year: Some(2019),
        customer_id: Some("c-1".to_string()),
    }
}

pub fn technician() -> TechnicianRef {
    TechnicianRef {
        id: "t-1".to_string(),
        name: "Luis Ramos".to_string(),
        specialty: Some("Brakes".to_string()),
    }
}
