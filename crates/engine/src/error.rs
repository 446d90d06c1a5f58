//! Error types for module acquisition and interface creation

use std::ffi::c_int;

/// Why a facade call could not reach the requested interface.
///
/// Every variant is recoverable at the call site: acquisition failures are
/// retried from scratch on the next call, so "call again after installing
/// the module" is a supported pattern.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The module's shared library could not be opened
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The library loaded but an expected export is absent (ABI mismatch)
    #[error("symbol not found: {symbol} in {module}")]
    SymbolNotFound {
        module: String,
        symbol: &'static str,
    },

    /// The module's factory has no implementation for the requested pair
    #[error("interface not found: {name} version {version}")]
    InterfaceNotFound { name: String, version: c_int },

    /// Interface name was not a valid NUL-terminated string
    #[error("invalid interface name: {0}")]
    InvalidName(String),
}
