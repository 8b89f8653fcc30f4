//! Logging utilities and structured logging support

/// Initialize the logging system
///
/// Reads the filter from `RUST_LOG`, defaulting to `info` when unset.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Initialize logging for unit tests (safe to call more than once)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
