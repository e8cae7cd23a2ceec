//! # API State
//!
//! Handles to the back-office API, one per seam.
//!
//! In production every handle points at the same [`HttpApiClient`]. Tests
//! build the state from `mockall` mocks instead, one per trait.

use std::sync::Arc;

use shopfloor_client::{
    CustomerLookup, HttpApiClient, OrderCreateApi, ProductLookup, ServiceLookup, TechnicianLookup,
    VehicleLookup,
};

/// Remote lookups and order creation used by the commands.
#[derive(Clone)]
pub struct ApiState {
    pub products: Arc<dyn ProductLookup>,
    pub customers: Arc<dyn CustomerLookup>,
    pub technicians: Arc<dyn TechnicianLookup>,
    pub vehicles: Arc<dyn VehicleLookup>,
    pub services: Arc<dyn ServiceLookup>,
    pub orders: Arc<dyn OrderCreateApi>,
}

impl ApiState {
    /// Every seam served by one HTTP client.
    pub fn from_http(client: HttpApiClient) -> Self {
        let client = Arc::new(client);
        ApiState {
            products: client.clone(),
            customers: client.clone(),
            technicians: client.clone(),
            vehicles: client.clone(),
            services: client.clone(),
            orders: client,
        }
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState").finish_non_exhaustive()
    }
}
