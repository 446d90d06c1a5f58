//! Capsule launch configuration
//!
//! Passed by value through `Capsule_launch`; the capsule copies anything it
//! keeps beyond the call.

use std::ffi::{c_char, c_int};

/// Receives a human-readable message when a launch step fails.
/// Only invoked when [`CapsuleConfig::report_errors`] is non-zero.
pub type CapsuleErrorCallback = Option<unsafe extern "C" fn(message: *const c_char)>;

/// Receives launch progress as a fraction on `[0, 1]`.
pub type CapsuleProgressCallback = Option<unsafe extern "C" fn(percent: f32)>;

/// Parameters the capsule needs to launch the protected game process.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CapsuleConfig {
    /// Path to the executable the capsule should start
    pub target_executable: *const c_char,

    /// Command line handed to the target, typically produced by
    /// `Capsule_flattenArgs`
    pub command_line: *const c_char,

    /// Non-zero to deliver failures through `error_callback`
    pub report_errors: c_int,

    pub error_callback: CapsuleErrorCallback,
    pub progress_callback: CapsuleProgressCallback,
}

impl CapsuleConfig {
    /// Config with no callbacks; `target_executable` and `command_line`
    /// must stay alive across the launch call.
    pub fn new(target_executable: *const c_char, command_line: *const c_char) -> Self {
        Self {
            target_executable,
            command_line,
            report_errors: 0,
            error_callback: None,
            progress_callback: None,
        }
    }
}
