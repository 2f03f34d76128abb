//! Thin wrapper around the `tracing` crate: call sites write
//! `use crate::tracing_support::prelude::*;`, and a single place configures
//! the subscriber for both binaries.

pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
}

/// Installs a stderr `fmt` subscriber honoring `RUST_LOG`, defaulting to
/// `info` when unset. Idempotent within a process: a second call is a no-op
/// if a global subscriber is already installed.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
