//! Diagnostic output for the binaries

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber on stderr filtered by `RUST_LOG`, `warn` when
/// unset
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
