//! # Shopfloor Console Library
//!
//! Operator console for the Shopfloor POS order-building engine.
//! This is the main entry point that loads configuration and runs the REPL.
//!
//! ## Module Organization
//! ```text
//! shopfloor_console/
//! ├── lib.rs          ◄─── You are here (startup & run loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── api.rs      ◄─── Remote API handles
//! │   ├── session.rs  ◄─── Carts and submission guards
//! │   └── config.rs   ◄─── Store display configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── lookup.rs   ◄─── Search commands
//! │   ├── cart.rs     ◄─── Retail cart commands
//! │   ├── work_order.rs ◄─ Work order commands
//! │   └── submit.rs   ◄─── Submission commands
//! ├── repl.rs         ◄─── Line parser and text rendering
//! ├── notify.rs       ◄─── Terminal notification sink
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod notify;
pub mod repl;
pub mod state;

#[cfg(test)]
mod test_support;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopfloor_client::{ClientConfig, HttpApiClient};

use notify::ConsoleSink;
use repl::Repl;
use state::{ApiState, ConfigState};

/// Runs the console until end of input or `quit`.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,shopfloor=debug, override with RUST_LOG             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • explicit path, else the platform config dir                       │
/// │     • SHOPFLOOR_* environment overrides                                 │
/// │     • falls back to defaults if the file is unreadable                  │
/// │                                                                         │
/// │  3. Build HTTP Client ────────────────────────────────────────────────► │
/// │     • base URL, bearer token, timeouts                                  │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • ApiState: one HTTP client behind every seam                       │
/// │     • SessionState: empty retail cart and work order                    │
/// │     • ConfigState: store name and currency                              │
/// │                                                                         │
/// │  5. Read Lines ───────────────────────────────────────────────────────► │
/// │     • parse, execute, render                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Shopfloor console");

    let config = ClientConfig::load_or_default(config_path);
    let client = HttpApiClient::new(&config.api)?;
    info!(api_url = %config.api.base_url, store = %config.store.name, "Configuration loaded");

    let mut repl = Repl::new(
        ApiState::from_http(client),
        ConfigState::from_config(&config),
        Arc::new(ConsoleSink),
    );

    println!("{} - type 'help' for commands", config.store.name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", repl.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match repl.handle_line(&line).await {
            Some(output) if output.is_empty() => {}
            Some(output) => println!("{}", output),
            None => break,
        }
    }

    info!("Console closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfloor=trace` - Show trace for shopfloor crates only
/// - Default: INFO, DEBUG for shopfloor crates
///
/// Logs go to stderr so they never interleave with REPL output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shopfloor=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
