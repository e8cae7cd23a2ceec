//! # Lookup Commands
//!
//! Reference-data searches for products, customers, vehicles, technicians
//! and services.
//!
//! ## Search Rules
//! - Term is trimmed before sending
//! - Empty term returns the API's default list
//! - Terms longer than 100 characters are rejected locally, no call is made

use tracing::debug;

use shopfloor_core::validation::validate_search_query;
use shopfloor_core::{CustomerRef, ProductRef, ServiceRef, TechnicianRef, VehicleRef};

use crate::error::ApiError;
use crate::state::ApiState;

pub async fn search_products(api: &ApiState, query: &str) -> Result<Vec<ProductRef>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_products command");
    Ok(api.products.search(&query).await?)
}

pub async fn search_customers(api: &ApiState, query: &str) -> Result<Vec<CustomerRef>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_customers command");
    Ok(api.customers.search(&query).await?)
}

pub async fn search_vehicles(api: &ApiState, query: &str) -> Result<Vec<VehicleRef>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_vehicles command");
    Ok(api.vehicles.search(&query).await?)
}

pub async fn search_technicians(api: &ApiState, query: &str) -> Result<Vec<TechnicianRef>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_technicians command");
    Ok(api.technicians.search(&query).await?)
}

pub async fn search_services(api: &ApiState, query: &str) -> Result<Vec<ServiceRef>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, "search_services command");
    Ok(api.services.search(&query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{api_with_products, product};
    use shopfloor_client::api::MockProductLookup;
    use shopfloor_client::ClientError;

    #[tokio::test]
    async fn test_search_trims_term() {
        let mut products = MockProductLookup::new();
        products
            .expect_search()
            .once()
            .withf(|term| term == "brake")
            .returning(|_| Ok(vec![product("p-1", 1000, 4)]));

        let api = api_with_products(products);
        let found = search_products(&api, "  brake ").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_search_too_long_never_calls_api() {
        let mut products = MockProductLookup::new();
        products.expect_search().never();

        let api = api_with_products(products);
        let err = search_products(&api, &"x".repeat(101)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_search_remote_failure() {
        let mut products = MockProductLookup::new();
        products
            .expect_search()
            .once()
            .returning(|_| Err(ClientError::ConnectionFailed("refused".into())));

        let api = api_with_products(products);
        let err = search_products(&api, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RemoteError);
    }
}
