//! Process-wide SDK context
//!
//! The C ABI cannot thread a context through its callers, so one
//! [`SdkContext`] lives for the process lifetime. Call [`initialize`] once
//! at startup to construct it up front; exports that run earlier fall back
//! to constructing it on first use, which [`std::sync::OnceLock`] makes
//! safe against concurrent first callers.

use std::sync::OnceLock;

use crate::context::SdkContext;

/// Process-wide context storage
static CONTEXT: OnceLock<SdkContext> = OnceLock::new();

/// Construct the process-wide context. Later calls are no-ops.
pub fn initialize() {
    context();
}

/// Process-wide context, constructed on first use.
pub fn context() -> &'static SdkContext {
    CONTEXT.get_or_init(SdkContext::new)
}

/// Process-wide context, only if it has been constructed.
pub fn try_context() -> Option<&'static SdkContext> {
    CONTEXT.get()
}

/// Whether [`initialize`] (or any context-using export) has run.
pub fn is_initialized() -> bool {
    CONTEXT.get().is_some()
}
