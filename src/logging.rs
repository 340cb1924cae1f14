use tracing_subscriber::{fmt, EnvFilter};

/// Install a global fmt subscriber. Respects `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"info"`).
///
/// Returns `false` if a global subscriber was already set.
pub fn init_logging(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let subscriber = fmt::Subscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
