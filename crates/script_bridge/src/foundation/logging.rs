//! Logging setup
//!
//! The bridge logs through the `log` facade. Script `Debug.Log*` output uses
//! the [`SCRIPT_TARGET`] target so hosts can filter it separately.

pub use log::{debug, error, info, trace, warn};

/// Log target for messages emitted by gameplay scripts
pub const SCRIPT_TARGET: &str = "script";

/// Initialize logging from `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_level("info");
}

/// Initialize logging with a default filter, still overridable by `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("logger already initialized");
    }
}
