//! Bulwark Engine - Module Acquisition and Interface Dispatch
//!
//! This crate handles:
//! - Locating and loading the agent and capsule modules by well-known name
//! - Resolving their exports into typed function pointers
//! - Guarding lazy acquisition against concurrent callers
//! - Forwarding interface creation and capsule calls once acquired
//!
//! # Architecture
//!
//! Each module is owned by a [`module::ModuleState`]: a library handle, the
//! symbol set resolved from it, and the mutex serializing both. Acquisition
//! is lazy and retryable - a failed load or resolve leaves the state ready
//! for the next attempt, never a permanently-failed state.
//!
//! [`SdkContext`] bundles the two module states behind the facade
//! operations. Library consumers construct their own context (tests do this
//! with a scripted loader); the C ABI uses the process-wide context in
//! [`globals`].
//!
//! # Thread Safety
//!
//! All facade operations may be called from any thread. A module's mutex is
//! held across its load, resolve, and the forwarded call, so a slow first
//! load serializes callers of that module; the agent and capsule modules
//! are fully independent of each other.

pub mod config;
pub mod context;
pub mod error;
pub mod globals;
pub mod module;
pub mod platform;
pub mod symbols;

pub use config::ModulePaths;
pub use context::SdkContext;
pub use error::ModuleError;
pub use globals::{initialize, is_initialized, try_context};
pub use module::ModuleState;
pub use platform::{module_file_name, RawSymbol, SharedLibraryLoader, SystemLoader};
