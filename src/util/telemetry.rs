use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Initialize tracing
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Fails if a global subscriber is already set.
pub fn init() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let logger = tracing_subscriber::fmt::layer().compact();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let collector = Registry::default().with(logger).with(env_filter);

    tracing::subscriber::set_global_default(collector)
}
