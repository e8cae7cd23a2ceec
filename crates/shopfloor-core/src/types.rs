//! # Domain Types
//!
//! Reference objects returned by the remote lookups, plus the small enums a
//! cart carries.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ProductRef    │   │   CustomerRef   │   │   VehicleRef    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, sku, name  │   │  id, name       │   │  id, plate      │       │
//! │  │  unit_price     │   │  phone, email   │   │  make, model    │       │
//! │  │  available_stock│   └─────────────────┘   │  customer_id    │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  TechnicianRef  │   │   ServiceRef    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name       │   │  id, name       │   │  Cash  Card     │       │
//! │  │  specialty      │   │  price          │   │  Transfer Other │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids arrive from the API as strings or integers; both are kept as strings.
//! Parts in a work order are plain catalog products (`ProductRef`).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{self, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1600 bps = 16%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays for a retail sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Transfer => write!(f, "transfer"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "transfer" | "bank" => Ok(PaymentMethod::Transfer),
            "other" => Ok(PaymentMethod::Other),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}', expected cash, card, transfer or other", other),
            }),
        }
    }
}

// =============================================================================
// Work Order Status
// =============================================================================

/// Status sent with a new work order. Orders are always created pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    Pending,
}

// =============================================================================
// Lookup References
// =============================================================================

/// A catalog product as returned by the product lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,

    #[serde(default)]
    pub sku: String,

    pub name: String,

    /// Current catalog price.
    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub unit_price: Money,

    /// Units on hand at lookup time.
    #[serde(default)]
    pub available_stock: i64,
}

/// A customer as returned by the customer lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// A vehicle as returned by the vehicle lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,

    pub plate: String,

    #[serde(default)]
    pub make: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub year: Option<i32>,

    /// Owner, when the API knows it.
    #[serde(default, deserialize_with = "flexible_opt_id")]
    pub customer_id: Option<String>,
}

impl VehicleRef {
    /// Short label, e.g. `ABC-123 (Toyota Corolla)`.
    pub fn label(&self) -> String {
        let description = format!("{} {}", self.make, self.model);
        let description = description.trim();
        if description.is_empty() {
            self.plate.clone()
        } else {
            format!("{} ({})", self.plate, description)
        }
    }
}

/// A technician as returned by the technician lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub specialty: Option<String>,
}

/// A workshop service as returned by the service lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,

    pub name: String,

    #[serde(with = "money::major_units")]
    #[ts(as = "f64")]
    pub price: Money,

    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

// =============================================================================
// Id Deserialization
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn flexible_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

// =============================================================================
// Unit Tests
// =============================================================================
