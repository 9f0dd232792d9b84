//! ribbon — keyboard-language and now-playing widgets for a Wayland status bar.
//!
//! Run with:  `RUST_LOG=info ribbon`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("ribbon v{} starting", env!("CARGO_PKG_VERSION"));

    ribbon_wayland::run().map_err(Into::into)
}
