//! Tracing setup shared by the binaries.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the binaries so embedders keep control of their own output.

use tracing_subscriber::EnvFilter;

/// Default filter for the HTTP server.
pub const SERVER_FILTER: &str = "info,cloudpoof=debug,tower_http=debug";

/// Default filter for the CLI, which keeps the terminal quiet.
pub const CLI_FILTER: &str = "warn";

/// Install a global fmt subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(CLI_FILTER);
        init_tracing(SERVER_FILTER);
    }
}
