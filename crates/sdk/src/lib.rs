//! Bulwark SDK - Shared Type Definitions
//!
//! This crate contains the types shared between the shim and the
//! externally-shipped Bulwark modules: opaque interface types, the C ABI
//! signatures of the module exports, interface name/version constants, and
//! the identifier types that cross the ABI.
//!
//! It deliberately knows nothing about *loading* modules - that lives in
//! `bulwark-engine`.
//!
//! # Modules
//!
//! - [`interfaces`] - Opaque interface types and export signatures
//! - [`versions`] - Interface name/version constants
//! - [`modules`] - Well-known module and export names
//! - [`ids`] - 128-bit identifier types
//! - [`capsule`] - Capsule launch configuration

pub mod capsule;
pub mod ids;
pub mod interfaces;
pub mod modules;
pub mod versions;

pub use capsule::{CapsuleConfig, CapsuleErrorCallback, CapsuleProgressCallback};
pub use ids::{Int128, IntegrationId, PlayerId};
pub use interfaces::*;
pub use versions::INTERFACE_VERSIONS;
