//! Well-known module and export names
//!
//! The modules are looked up by fixed file name (base name plus the
//! platform shared-library extension, appended at load time) and expose a
//! fixed set of exports. Symbol names are passed to the dynamic linker
//! as-is.

/// Agent module base name ("BulwarkAgent.dll" / ".so" / ".dylib")
pub const AGENT_MODULE: &str = "BulwarkAgent";

/// Capsule launcher module base name
pub const CAPSULE_MODULE: &str = "BulwarkCapsule";

/// Factory exported by the agent module
pub const AGENT_CREATE_INTERFACE: &str = "Agent_createInterface";

/// Factory exported by the capsule module
pub const CAPSULE_CREATE_INTERFACE: &str = "Capsule_createInterface";

/// Argument flattening, exported by the capsule module
pub const CAPSULE_FLATTEN_ARGS: &str = "Capsule_flattenArgs";

/// Flattened-length query, exported by the capsule module
pub const CAPSULE_FLATTEN_ARGS_LENGTH: &str = "Capsule_flattenArgsLength";

/// Secure launch entry point, exported by the capsule module
pub const CAPSULE_LAUNCH: &str = "Capsule_launch";
