use tracing_subscriber::{EnvFilter, fmt};

/// Initialize structured logging to stderr, filtered by `RUST_LOG`.
///
/// Call before the terminal enters raw mode so early diagnostics stay
/// readable.
pub fn init_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Initialize logging for tests; repeated calls are harmless.
pub fn init_for_tests() {
    let _ = fmt().with_target(false).try_init();
}
