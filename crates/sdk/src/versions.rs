//! Interface name and version constants
//!
//! These must match exactly what the shipped modules implement. The pair is
//! matched by the module's factory, never by this SDK; interfaces stay
//! backwards compatible through versioning, so a newer module still serves
//! the versions listed here.

use std::ffi::c_int;

/// Anti-cheat client interface, used by game clients
pub const CLIENT_INTERFACE: &[u8] = b"BulwarkClient\0";
pub const CLIENT_VERSION: c_int = 1;

/// Anti-cheat server interface, used by game servers to register players
pub const SERVER_INTERFACE: &[u8] = b"BulwarkServer\0";
pub const SERVER_VERSION: c_int = 1;

/// Cheater-report interface, usable from client or server
pub const REPORT_INTERFACE: &[u8] = b"BulwarkReport\0";
pub const REPORT_VERSION: c_int = 1;

/// Capsule launcher interface
pub const CAPSULE_INTERFACE: &[u8] = b"BulwarkCapsule\0";
pub const CAPSULE_VERSION: c_int = 1;

/// Collected interface versions for iteration
pub const INTERFACE_VERSIONS: &[(&str, &[u8], c_int)] = &[
    ("Client", CLIENT_INTERFACE, CLIENT_VERSION),
    ("Server", SERVER_INTERFACE, SERVER_VERSION),
    ("Report", REPORT_INTERFACE, REPORT_VERSION),
    ("Capsule", CAPSULE_INTERFACE, CAPSULE_VERSION),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_names_are_nul_terminated() {
        for (label, name, version) in INTERFACE_VERSIONS {
            assert_eq!(name.last(), Some(&0), "{label} missing terminator");
            assert!(*version >= 1, "{label} version must be positive");
            // Exactly one NUL, at the end
            assert_eq!(name.iter().filter(|&&b| b == 0).count(), 1);
        }
    }
}
