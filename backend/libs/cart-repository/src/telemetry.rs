//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

/// Install a process-wide fmt subscriber honouring `RUST_LOG`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Test-friendly subscriber writing through the libtest capture
pub fn init_test_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cart_repository=debug,sqlx=warn"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}
