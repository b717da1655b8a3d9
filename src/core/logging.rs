//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```no_run
/// rivergen::core::logging::init();
/// log::info!("Generating riverbed");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}

/// Initialize logging for tests; safe to call more than once.
#[cfg(test)]
pub(crate) fn init_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}
