//! # State Module
//!
//! Manages application state for the operator console.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything, commands
//! take only the state they need: lookups need `ApiState`, cart edits need
//! `SessionState`, rendering needs `ConfigState`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Repl (lib.rs run)                          │   │
//! │  │  owns api_state, session_state, config_state, sink              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   ApiState   │  │  SessionState    │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Arc<dyn     │  │  Mutex<Retail    │  │  store_name      │          │
//! │  │   *Lookup>   │  │    Cart>         │  │  currency_symbol │          │
//! │  │  Arc<dyn     │  │  Mutex<WorkOrder │  │  api_url         │          │
//! │  │   OrderCrea- │  │    Cart>         │  │                  │          │
//! │  │   teApi>     │  │  2× OrderSub-    │  │                  │          │
//! │  │              │  │    mission       │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ApiState: handles are Send + Sync, shared through Arc               │
//! │  • SessionState: one Mutex per cart, never held across .await          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod config;
mod session;

pub use api::ApiState;
pub use config::ConfigState;
pub use session::SessionState;
