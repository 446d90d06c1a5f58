//! OS shared-library primitives
//!
//! Wraps the dynamic linker behind [`SharedLibraryLoader`] so the
//! acquisition protocol stays independent of the operating system and can
//! run against a scripted loader in tests. Nothing here serializes access:
//! calls touching the same module are serialized by that module's mutex in
//! [`crate::module`], while distinct modules may call in concurrently.

use std::ffi::c_void;
use std::ptr::NonNull;

use libloading::Library;

use bulwark_sdk::{CapsuleLaunchFn, CreateInterfaceFn, FlattenArgsFn, FlattenArgsLengthFn};

/// Platform-specific shared library extension
#[cfg(target_os = "windows")]
pub const SHARED_LIB_EXT: &str = ".dll";
#[cfg(target_os = "macos")]
pub const SHARED_LIB_EXT: &str = ".dylib";
#[cfg(all(unix, not(target_os = "macos")))]
pub const SHARED_LIB_EXT: &str = ".so";

/// File name for a module base name, e.g. "BulwarkAgent" -> "BulwarkAgent.dll"
pub fn module_file_name(base: &str) -> String {
    format!("{base}{SHARED_LIB_EXT}")
}

/// Raw address of an exported symbol.
///
/// The `bind_*` methods cast the address to one of the known export
/// signatures and are the only place such casts happen. Each carries the
/// same contract: the export's actual ABI must match the signature it is
/// bound to, and the resulting pointer is valid only while the library it
/// came from stays loaded.
#[derive(Clone, Copy, Debug)]
pub struct RawSymbol(NonNull<c_void>);

impl RawSymbol {
    /// Wrap a symbol address; null means "not exported" and yields `None`.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// # Safety
    /// The export must have the createInterface ABI.
    pub unsafe fn bind_create_interface(self) -> CreateInterfaceFn {
        std::mem::transmute(self.0.as_ptr())
    }

    /// # Safety
    /// The export must have the `Capsule_flattenArgs` ABI.
    pub unsafe fn bind_flatten_args(self) -> FlattenArgsFn {
        std::mem::transmute(self.0.as_ptr())
    }

    /// # Safety
    /// The export must have the `Capsule_flattenArgsLength` ABI.
    pub unsafe fn bind_flatten_args_length(self) -> FlattenArgsLengthFn {
        std::mem::transmute(self.0.as_ptr())
    }

    /// # Safety
    /// The export must have the `Capsule_launch` ABI.
    pub unsafe fn bind_capsule_launch(self) -> CapsuleLaunchFn {
        std::mem::transmute(self.0.as_ptr())
    }
}

/// Uniform contract over the OS library load/resolve/unload primitives.
///
/// Implementations must never panic on failure - a missing file, a load
/// error, or an absent symbol all surface as `None`.
pub trait SharedLibraryLoader: Send + Sync {
    /// Owned handle to one loaded library
    type Handle: Send;

    /// Load a shared library by file name
    fn open(&self, file_name: &str) -> Option<Self::Handle>;

    /// Look up an exported symbol by exact name
    fn symbol(&self, handle: &Self::Handle, name: &str) -> Option<RawSymbol>;

    /// Release the library; symbols resolved from it become invalid
    fn close(&self, handle: Self::Handle);
}

/// Loader backed by the operating system dynamic linker
#[derive(Debug, Default)]
pub struct SystemLoader;

impl SharedLibraryLoader for SystemLoader {
    type Handle = Library;

    fn open(&self, file_name: &str) -> Option<Library> {
        // SAFETY: loading runs the module's initialization routines. The
        // modules named here are shipped alongside this SDK and are
        // expected to have well-behaved initializers.
        match unsafe { Library::new(file_name) } {
            Ok(library) => {
                tracing::debug!(module = file_name, "module loaded");
                Some(library)
            }
            Err(err) => {
                tracing::debug!(module = file_name, %err, "module load failed");
                None
            }
        }
    }

    fn symbol(&self, handle: &Library, name: &str) -> Option<RawSymbol> {
        // SAFETY: the address is only used through the typed binds on
        // RawSymbol, which carry the ABI contract.
        let symbol = unsafe { handle.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        RawSymbol::new(*symbol)
    }

    fn close(&self, handle: Library) {
        if let Err(err) = handle.close() {
            tracing::debug!(%err, "module unload failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{c_char, c_int};

    #[test]
    fn test_module_file_name() {
        #[cfg(target_os = "windows")]
        assert_eq!(module_file_name("BulwarkAgent"), "BulwarkAgent.dll");

        #[cfg(target_os = "macos")]
        assert_eq!(module_file_name("BulwarkAgent"), "BulwarkAgent.dylib");

        #[cfg(all(unix, not(target_os = "macos")))]
        assert_eq!(module_file_name("BulwarkAgent"), "BulwarkAgent.so");
    }

    #[test]
    fn test_raw_symbol_rejects_null() {
        assert!(RawSymbol::new(std::ptr::null_mut()).is_none());
    }

    unsafe extern "C" fn stub_factory(_name: *const c_char, version: c_int) -> *mut c_void {
        version as usize as *mut c_void
    }

    #[test]
    fn test_bind_round_trip() {
        let raw = RawSymbol::new(stub_factory as *mut c_void).expect("non-null");
        let bound = unsafe { raw.bind_create_interface() };
        let result = unsafe { bound(std::ptr::null(), 7) };
        assert_eq!(result as usize, 7);
    }

    #[test]
    fn test_open_missing_library_is_none() {
        let loader = SystemLoader;
        assert!(loader.open("BulwarkDoesNotExist.so").is_none());
    }
}
