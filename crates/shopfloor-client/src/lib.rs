//! # shopfloor-client: Remote API and Order Submission
//!
//! The I/O half of the order-building engine. `shopfloor-core` decides what
//! a cart contains and whether it may be sent; this crate fetches the
//! reference data, re-checks live stock and sends the order.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Architecture                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 OrderSubmission (per cart)                       │  │
//! │  │   Idle → Submitting → Succeeded | Failed, double-submit guard    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ traits (api.rs)                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ *Lookup        │  │ OrderCreateApi │  │ NotificationSink       │    │
//! │  │ search(term)   │  │ create_sale_   │  │ operator feedback      │    │
//! │  │ get_product    │  │ order / work_  │  │ (implemented by app)   │    │
//! │  │                │  │ order          │  │                        │    │
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────┘    │
//! │          └──────────┬────────┘                                          │
//! │                     ▼                                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  HttpApiClient (reqwest, JSON, bearer token, X-Request-Id)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`api`] - Lookup and create traits, `OrderId`
//! - [`config`] - Client configuration (TOML + environment)
//! - [`error`] - Client error types
//! - [`http`] - reqwest implementation of the traits
//! - [`notify`] - Notifications and the sink trait
//! - [`submission`] - Submission state machine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfloor_client::{ClientConfig, HttpApiClient, OrderSubmission};
//!
//! let config = ClientConfig::load_or_default(None);
//! let api = HttpApiClient::new(&config.api)?;
//!
//! let submission = OrderSubmission::new();
//! let id = submission.submit_sale(&cart, &api, &api).await?;
//! println!("Sale {} created", id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod submission;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{
    CustomerLookup, OrderCreateApi, OrderId, ProductLookup, ServiceLookup, TechnicianLookup,
    VehicleLookup,
};
pub use config::{ApiSettings, ClientConfig, StoreConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpApiClient;
pub use notify::{Level, Notification, NotificationSink};
pub use submission::{OrderSubmission, SubmissionOutcome, SubmissionState};
