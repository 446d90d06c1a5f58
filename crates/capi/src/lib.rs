//! Bulwark C ABI
//!
//! This crate compiles to the static/shared library games link against.
//! It owns no logic of its own: every export forwards through the
//! process-wide [`bulwark_engine::SdkContext`], and every failure comes
//! back as the documented sentinel - never a panic, never a process exit.

pub mod exports;

/// Install a tracing subscriber when diagnostics were requested through
/// the `BULWARK_LOG` environment variable.
///
/// A linked SDK must not hijack the host's logging, so this is strictly
/// opt-in and yields to any subscriber the host installed first.
pub(crate) fn init_tracing() {
    if std::env::var_os("BULWARK_LOG").is_some() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_env("BULWARK_LOG"))
            .try_init();
    }
}
