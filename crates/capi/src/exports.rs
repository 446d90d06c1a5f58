//! C-compatible exports forming the stable Bulwark surface
//!
//! Exported names match the symbols the modules themselves export, so a
//! game links against this library exactly as it would against the real
//! agent. Acquisition failures surface as the documented sentinels and the
//! caller is free to try again later - after installing the agent, for
//! example.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int, c_long, c_uint, c_void};

use bulwark_engine::globals;
use bulwark_sdk::{
    BulwarkCapsule, BulwarkClient, BulwarkReport, BulwarkServer, CapsuleConfig, Int128,
    IntegrationId, INTERFACE_NOT_FOUND, LAUNCH_MODULE_NOT_FOUND,
};

/// Prepare the process-wide module states.
///
/// Call once at startup before any other export. The exports construct the
/// state lazily if this is skipped, but calling it keeps first-use latency
/// out of the game's hot path.
#[no_mangle]
pub extern "C" fn Bulwark_initialize() {
    crate::init_tracing();
    globals::initialize();
    tracing::debug!("bulwark initialized");
}

/// Build a 128-bit identifier from two 64-bit halves.
#[no_mangle]
pub extern "C" fn Bulwark_createInt128(lo: u64, hi: u64) -> Int128 {
    Int128::new(lo, hi)
}

/// Create an agent interface by name/version pair.
///
/// Returns the agent factory's result verbatim, or the null sentinel when
/// the agent module is not installed (or `name` is null).
///
/// # Safety
/// `name` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn Agent_createInterface(name: *const c_char, version: c_int) -> *mut c_void {
    if name.is_null() {
        return INTERFACE_NOT_FOUND;
    }
    globals::context().agent_interface_raw(name, version)
}

/// Create a capsule interface by name/version pair.
///
/// # Safety
/// `name` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn Capsule_createInterface(
    name: *const c_char,
    version: c_int,
) -> *mut c_void {
    if name.is_null() {
        return INTERFACE_NOT_FOUND;
    }
    globals::context().capsule_interface_raw(name, version)
}

/// Anti-cheat client interface at the version this SDK ships.
#[no_mangle]
pub extern "C" fn Agent_createClient() -> *mut BulwarkClient {
    match globals::context().create_client() {
        Ok(interface) => interface.as_ptr(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Anti-cheat server interface at the version this SDK ships.
#[no_mangle]
pub extern "C" fn Agent_createServer() -> *mut BulwarkServer {
    match globals::context().create_server() {
        Ok(interface) => interface.as_ptr(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Cheater-report interface at the version this SDK ships.
#[no_mangle]
pub extern "C" fn Agent_createReport() -> *mut BulwarkReport {
    match globals::context().create_report() {
        Ok(interface) => interface.as_ptr(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Capsule launcher interface at the version this SDK ships.
#[no_mangle]
pub extern "C" fn Capsule_createCapsule() -> *mut BulwarkCapsule {
    match globals::context().create_capsule() {
        Ok(interface) => interface.as_ptr(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Flatten `main`-style arguments into `out` as a single space-separated
/// string, skipping `argv[0]`. Size the buffer with
/// [`Capsule_flattenArgsLength`].
///
/// Leaves `out` untouched when the capsule module cannot be acquired.
///
/// # Safety
/// `argv` must hold `argc` valid NUL-terminated strings and `out` must be
/// writable for `out_length` bytes.
#[no_mangle]
pub unsafe extern "C" fn Capsule_flattenArgs(
    argc: c_int,
    argv: *const *const c_char,
    out: *mut c_char,
    out_length: c_uint,
) {
    if out.is_null() || (argc > 0 && argv.is_null()) {
        return;
    }
    let _ = globals::context().flatten_args(argc, argv, out, out_length);
}

/// Buffer size [`Capsule_flattenArgs`] needs, terminator included.
///
/// Returns 0 when the capsule module cannot be acquired, which is
/// indistinguishable here from an empty result; callers that need the
/// distinction should use the typed `bulwark_engine` API instead.
///
/// # Safety
/// `argv` must hold `argc` valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn Capsule_flattenArgsLength(
    argc: c_int,
    argv: *const *const c_char,
) -> c_uint {
    if argc > 0 && argv.is_null() {
        return 0;
    }
    globals::context().flatten_args_length(argc, argv).unwrap_or(0)
}

/// Launch the target executable under the capsule.
///
/// Returns 0 on success, a positive OS error code from the capsule, or
/// [`LAUNCH_MODULE_NOT_FOUND`] when the capsule module is not installed.
///
/// # Safety
/// The string pointers inside `config` must stay valid across the call.
#[no_mangle]
pub unsafe extern "C" fn Capsule_launch(
    integration_id: IntegrationId,
    config: CapsuleConfig,
) -> c_long {
    globals::context()
        .launch_capsule(integration_id, config)
        .unwrap_or(LAUNCH_MODULE_NOT_FOUND)
}

/// Unload the agent module. The next agent call loads it afresh.
/// Safe to call even if the module was never loaded.
#[no_mangle]
pub extern "C" fn Agent_release() {
    if let Some(context) = globals::try_context() {
        context.release_agent();
    }
}

/// Unload the capsule module. The next capsule call loads it afresh.
/// Safe to call even if the module was never loaded.
#[no_mangle]
pub extern "C" fn Capsule_release() {
    if let Some(context) = globals::try_context() {
        context.release_capsule();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    // These run without the modules installed, exercising the real system
    // loader's failure path end to end.

    #[test]
    fn test_create_interface_without_modules_returns_sentinel() {
        Bulwark_initialize();

        let name = CString::new("BulwarkClient").unwrap();
        let interface = unsafe { Agent_createInterface(name.as_ptr(), 1) };
        assert_eq!(interface, INTERFACE_NOT_FOUND);

        let interface = unsafe { Capsule_createInterface(name.as_ptr(), 1) };
        assert_eq!(interface, INTERFACE_NOT_FOUND);

        assert!(Agent_createClient().is_null());
        assert!(Agent_createServer().is_null());
        assert!(Agent_createReport().is_null());
        assert!(Capsule_createCapsule().is_null());
    }

    #[test]
    fn test_null_name_returns_sentinel() {
        let interface = unsafe { Agent_createInterface(std::ptr::null(), 1) };
        assert_eq!(interface, INTERFACE_NOT_FOUND);
    }

    #[test]
    fn test_flatten_without_capsule() {
        let program = CString::new("game.exe").unwrap();
        let arg = CString::new("-connect").unwrap();
        let argv = [program.as_ptr(), arg.as_ptr()];

        let len = unsafe { Capsule_flattenArgsLength(2, argv.as_ptr()) };
        assert_eq!(len, 0);

        let mut buffer = [0xAAu8; 16];
        unsafe { Capsule_flattenArgs(2, argv.as_ptr(), buffer.as_mut_ptr() as *mut c_char, 16) };
        assert!(buffer.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_launch_without_capsule() {
        let target = CString::new("game.exe").unwrap();
        let config = CapsuleConfig::new(target.as_ptr(), std::ptr::null());
        let code = unsafe { Capsule_launch(IntegrationId::new(1, 2), config) };
        assert_eq!(code, LAUNCH_MODULE_NOT_FOUND);
    }

    #[test]
    fn test_release_without_load_is_noop() {
        Agent_release();
        Capsule_release();
    }

    #[test]
    fn test_create_int128() {
        let id = Bulwark_createInt128(0x1234, 0x5678);
        assert_eq!(id.lo, 0x1234);
        assert_eq!(id.hi, 0x5678);
    }
}
