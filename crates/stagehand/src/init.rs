//! Process-level setup for hosts embedding stagehand.

/// Initializes the `env_logger` backend for the `log` facade.
///
/// Honours `RUST_LOG`. Calling it more than once, or after the host installed
/// its own logger, is harmless.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("stagehand {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
