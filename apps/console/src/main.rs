//! # Shopfloor Console Entry Point
//!
//! ```text
//! shopfloor-console [config.toml]
//! ```
//!
//! The optional argument overrides the platform config path. The actual
//! setup is in lib.rs.

use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    if let Err(e) = shopfloor_console::run(config_path).await {
        eprintln!("shopfloor-console: {}", e);
        std::process::exit(1);
    }
}
