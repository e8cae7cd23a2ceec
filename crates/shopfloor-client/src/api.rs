//! # Remote API Seams
//!
//! The lookups and create commands the console depends on, as async traits.
//! [`HttpApiClient`](crate::http::HttpApiClient) implements all of them;
//! tests use the generated `Mock*` types.
//!
//! ```text
//! ┌──────────────────┐   search(term)          ┌──────────────────────┐
//! │ ProductLookup    │ ──────────────────────► │                      │
//! │ CustomerLookup   │   get_product(id)       │                      │
//! │ TechnicianLookup │ ──────────────────────► │   Back-office API    │
//! │ VehicleLookup    │                         │                      │
//! │ ServiceLookup    │                         │                      │
//! ├──────────────────┤   create_sale_order     │                      │
//! │ OrderCreateApi   │ ──────────────────────► │                      │
//! │                  │   create_work_order     │                      │
//! └──────────────────┘ ◄─────── { "id": … } ── └──────────────────────┘
//! ```

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Deserializer, Serialize};

use shopfloor_core::{
    CustomerRef, ProductRef, SalePayload, ServiceRef, TechnicianRef, VehicleRef, WorkOrderPayload,
};

use crate::error::ClientResult;

// =============================================================================
// Order Id
// =============================================================================

/// Identifier the API assigns to a created sale or work order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => OrderId(text),
            Raw::Number(n) => OrderId(n.to_string()),
        })
    }
}

// =============================================================================
// Lookups
// =============================================================================

#[automock]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Searches the catalog. An empty term returns the API's default list.
    async fn search(&self, term: &str) -> ClientResult<Vec<ProductRef>>;

    /// Fetches one product with its current stock. `None` if it no longer
    /// exists.
    async fn get_product(&self, id: &str) -> ClientResult<Option<ProductRef>>;
}

#[automock]
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn search(&self, term: &str) -> ClientResult<Vec<CustomerRef>>;
}

#[automock]
#[async_trait]
pub trait TechnicianLookup: Send + Sync {
    async fn search(&self, term: &str) -> ClientResult<Vec<TechnicianRef>>;
}

#[automock]
#[async_trait]
pub trait VehicleLookup: Send + Sync {
    async fn search(&self, term: &str) -> ClientResult<Vec<VehicleRef>>;
}

#[automock]
#[async_trait]
pub trait ServiceLookup: Send + Sync {
    async fn search(&self, term: &str) -> ClientResult<Vec<ServiceRef>>;
}

// =============================================================================
// Commands
// =============================================================================

#[automock]
#[async_trait]
pub trait OrderCreateApi: Send + Sync {
    /// Creates a retail sale.
    async fn create_sale_order(&self, payload: &SalePayload) -> ClientResult<OrderId>;

    /// Creates a work order.
    async fn create_work_order(&self, payload: &WorkOrderPayload) -> ClientResult<OrderId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_from_string_or_number() {
        let id: OrderId = serde_json::from_str(r#""WO-2026-0012""#).unwrap();
        assert_eq!(id.as_str(), "WO-2026-0012");

        let id: OrderId = serde_json::from_str("1042").unwrap();
        assert_eq!(id.to_string(), "1042");
    }
}
