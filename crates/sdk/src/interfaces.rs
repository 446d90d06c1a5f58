//! Interface types and export signatures of the Bulwark modules
//!
//! These are opaque types representing interfaces implemented inside the
//! agent and capsule shared libraries. We don't need their internal
//! structure - just pointers. Ownership and release rules belong to the
//! module that produced the interface.

use std::ffi::{c_char, c_int, c_long, c_uint, c_void};

use crate::capsule::CapsuleConfig;
use crate::ids::IntegrationId;

/// Opaque type for the anti-cheat client interface ("BulwarkClient")
#[repr(C)]
pub struct BulwarkClient {
    _opaque: [u8; 0],
}

/// Opaque type for the anti-cheat server interface ("BulwarkServer")
/// Used by (typically headless) game servers to register and kick players
#[repr(C)]
pub struct BulwarkServer {
    _opaque: [u8; 0],
}

/// Opaque type for the cheater-report interface ("BulwarkReport")
#[repr(C)]
pub struct BulwarkReport {
    _opaque: [u8; 0],
}

/// Opaque type for the capsule launcher interface ("BulwarkCapsule")
#[repr(C)]
pub struct BulwarkCapsule {
    _opaque: [u8; 0],
}

/// createInterface factory signature
///
/// Both modules export one factory. The name/version pair is matched by
/// the module itself; this SDK passes it through uninterpreted.
///
/// # Returns
/// Pointer to the interface, or a sentinel (see [`is_interface_valid`])
pub type CreateInterfaceFn =
    unsafe extern "C" fn(name: *const c_char, version: c_int) -> *mut c_void;

/// `Capsule_flattenArgs` export signature
///
/// Flattens `main`-style arguments into a single space-separated string,
/// skipping `argv[0]` (the program path). Writes at most `out_len` bytes
/// including the NUL terminator.
pub type FlattenArgsFn =
    unsafe extern "C" fn(argc: c_int, argv: *const *const c_char, out: *mut c_char, out_len: c_uint);

/// `Capsule_flattenArgsLength` export signature
///
/// Byte length of the buffer [`FlattenArgsFn`] needs, terminator included.
pub type FlattenArgsLengthFn =
    unsafe extern "C" fn(argc: c_int, argv: *const *const c_char) -> c_uint;

/// `Capsule_launch` export signature
///
/// Launches the target executable under the capsule. Returns 0 on success
/// or an operating system error code.
pub type CapsuleLaunchFn =
    unsafe extern "C" fn(integration_id: IntegrationId, config: CapsuleConfig) -> c_long;

/// Sentinel returned when an interface (or its module) cannot be produced.
pub const INTERFACE_NOT_FOUND: *mut c_void = std::ptr::null_mut();

/// Returned by `Capsule_launch` when the capsule module is not installed.
/// Real capsule results are 0 or a positive OS error code.
pub const LAUNCH_MODULE_NOT_FOUND: c_long = -1;

/// `true` when a factory result is a usable interface rather than a sentinel.
///
/// Factories report failure as null or as a small negative value cast to a
/// pointer; real interfaces never live in that range.
pub fn is_interface_valid(ptr: *mut c_void) -> bool {
    !ptr.is_null() && (ptr as isize) > 0
}
