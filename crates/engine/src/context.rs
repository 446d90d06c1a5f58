//! SDK context: the two module states behind the facade operations
//!
//! Every facade operation follows the same template: lock the module state,
//! run the acquisition protocol, forward the call with the caller's
//! arguments, unlock, return the result. Failures surface as
//! [`ModuleError`] (typed surface) or as the documented sentinel (raw
//! surface); nothing here panics or logs an error on behalf of the caller.

use std::ffi::{c_char, c_int, c_long, c_uint, c_void, CStr};
use std::ptr::NonNull;

use bulwark_sdk::versions;
use bulwark_sdk::{
    is_interface_valid, BulwarkCapsule, BulwarkClient, BulwarkReport, BulwarkServer, CapsuleConfig,
    IntegrationId,
};

use crate::config::ModulePaths;
use crate::error::ModuleError;
use crate::module::ModuleState;
use crate::platform::{SharedLibraryLoader, SystemLoader};
use crate::symbols::{AgentSymbols, CapsuleSymbols};

/// Owns the agent and capsule module states and the loader they share.
///
/// The two modules are fully independent: a slow or failing agent load
/// never blocks capsule callers. One context normally lives for the whole
/// process (see [`crate::globals`]); tests construct their own with a
/// scripted loader.
pub struct SdkContext<L: SharedLibraryLoader = SystemLoader> {
    loader: L,
    agent: ModuleState<L, AgentSymbols>,
    capsule: ModuleState<L, CapsuleSymbols>,
}

impl SdkContext<SystemLoader> {
    /// Context backed by the operating system loader, with module paths
    /// from [`ModulePaths::resolve`].
    pub fn new() -> Self {
        Self::with_paths(SystemLoader, ModulePaths::resolve())
    }
}

impl Default for SdkContext<SystemLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SharedLibraryLoader> SdkContext<L> {
    /// Context over a custom loader, using the well-known module names.
    pub fn with_loader(loader: L) -> Self {
        Self::with_paths(loader, ModulePaths::default())
    }

    /// Context over a custom loader and explicit module paths.
    pub fn with_paths(loader: L, paths: ModulePaths) -> Self {
        Self {
            loader,
            agent: ModuleState::new(paths.agent),
            capsule: ModuleState::new(paths.capsule),
        }
    }

    /// Create an agent interface by name/version pair.
    ///
    /// `name` must be NUL-terminated (e.g. [`versions::CLIENT_INTERFACE`]).
    /// The pair passes through uninterpreted; matching it against an
    /// implementation is the agent's concern.
    pub fn create_agent_interface(
        &self,
        name: &[u8],
        version: c_int,
    ) -> Result<NonNull<c_void>, ModuleError> {
        let name = checked_name(name)?;
        // SAFETY: the factory stays valid for the duration of the closure
        // because the module lock is held across it.
        let ptr = self
            .agent
            .with_symbols(&self.loader, |s| unsafe {
                (s.create_interface)(name.as_ptr(), version)
            })?;
        interface_from(ptr, name, version)
    }

    /// Create a capsule interface by name/version pair.
    pub fn create_capsule_interface(
        &self,
        name: &[u8],
        version: c_int,
    ) -> Result<NonNull<c_void>, ModuleError> {
        let name = checked_name(name)?;
        // SAFETY: as in create_agent_interface.
        let ptr = self
            .capsule
            .with_symbols(&self.loader, |s| unsafe {
                (s.create_interface)(name.as_ptr(), version)
            })?;
        interface_from(ptr, name, version)
    }

    /// Forward to the agent factory and return its result verbatim,
    /// sentinels included. Acquisition failure yields the null sentinel.
    ///
    /// # Safety
    /// `name` must point to a valid NUL-terminated string.
    pub unsafe fn agent_interface_raw(&self, name: *const c_char, version: c_int) -> *mut c_void {
        self.agent
            .with_symbols(&self.loader, |s| unsafe {
                (s.create_interface)(name, version)
            })
            .unwrap_or(std::ptr::null_mut())
    }

    /// Capsule twin of [`Self::agent_interface_raw`].
    ///
    /// # Safety
    /// `name` must point to a valid NUL-terminated string.
    pub unsafe fn capsule_interface_raw(&self, name: *const c_char, version: c_int) -> *mut c_void {
        self.capsule
            .with_symbols(&self.loader, |s| unsafe {
                (s.create_interface)(name, version)
            })
            .unwrap_or(std::ptr::null_mut())
    }

    /// Anti-cheat client interface at the version this SDK ships.
    pub fn create_client(&self) -> Result<NonNull<BulwarkClient>, ModuleError> {
        self.create_agent_interface(versions::CLIENT_INTERFACE, versions::CLIENT_VERSION)
            .map(NonNull::cast)
    }

    /// Anti-cheat server interface at the version this SDK ships.
    pub fn create_server(&self) -> Result<NonNull<BulwarkServer>, ModuleError> {
        self.create_agent_interface(versions::SERVER_INTERFACE, versions::SERVER_VERSION)
            .map(NonNull::cast)
    }

    /// Cheater-report interface at the version this SDK ships.
    pub fn create_report(&self) -> Result<NonNull<BulwarkReport>, ModuleError> {
        self.create_agent_interface(versions::REPORT_INTERFACE, versions::REPORT_VERSION)
            .map(NonNull::cast)
    }

    /// Capsule launcher interface at the version this SDK ships.
    pub fn create_capsule(&self) -> Result<NonNull<BulwarkCapsule>, ModuleError> {
        self.create_capsule_interface(versions::CAPSULE_INTERFACE, versions::CAPSULE_VERSION)
            .map(NonNull::cast)
    }

    /// Forward argument flattening into the capsule.
    ///
    /// On any acquisition failure the output buffer is left untouched and
    /// the error says why.
    ///
    /// # Safety
    /// `argv` must hold `argc` valid NUL-terminated strings, and `out`
    /// must be writable for `out_len` bytes.
    pub unsafe fn flatten_args(
        &self,
        argc: c_int,
        argv: *const *const c_char,
        out: *mut c_char,
        out_len: c_uint,
    ) -> Result<(), ModuleError> {
        self.capsule.with_symbols(&self.loader, |s| unsafe {
            (s.flatten_args)(argc, argv, out, out_len)
        })
    }

    /// Buffer length [`Self::flatten_args`] needs, terminator included.
    ///
    /// Acquisition failure is an `Err` here, distinct from a genuine
    /// zero-length answer; only the C export collapses both to 0.
    ///
    /// # Safety
    /// `argv` must hold `argc` valid NUL-terminated strings.
    pub unsafe fn flatten_args_length(
        &self,
        argc: c_int,
        argv: *const *const c_char,
    ) -> Result<c_uint, ModuleError> {
        self.capsule
            .with_symbols(&self.loader, |s| unsafe { (s.flatten_args_length)(argc, argv) })
    }

    /// Launch the target executable under the capsule.
    ///
    /// Returns the capsule's own result: 0 on success, an OS error code
    /// otherwise.
    ///
    /// # Safety
    /// The string pointers inside `config` must stay valid across the
    /// call.
    pub unsafe fn launch_capsule(
        &self,
        integration_id: IntegrationId,
        config: CapsuleConfig,
    ) -> Result<c_long, ModuleError> {
        self.capsule
            .with_symbols(&self.loader, |s| unsafe { (s.launch)(integration_id, config) })
    }

    /// Unload the agent module. No-op if it was never loaded.
    pub fn release_agent(&self) {
        self.agent.release(&self.loader);
    }

    /// Unload the capsule module. No-op if it was never loaded.
    pub fn release_capsule(&self) {
        self.capsule.release(&self.loader);
    }

    pub fn is_agent_loaded(&self) -> bool {
        self.agent.is_loaded()
    }

    pub fn is_capsule_loaded(&self) -> bool {
        self.capsule.is_loaded()
    }
}

fn checked_name(name: &[u8]) -> Result<&CStr, ModuleError> {
    CStr::from_bytes_with_nul(name)
        .map_err(|_| ModuleError::InvalidName(String::from_utf8_lossy(name).into_owned()))
}

fn interface_from(
    ptr: *mut c_void,
    name: &CStr,
    version: c_int,
) -> Result<NonNull<c_void>, ModuleError> {
    match NonNull::new(ptr) {
        Some(interface) if is_interface_valid(ptr) => Ok(interface),
        _ => Err(ModuleError::InterfaceNotFound {
            name: name.to_string_lossy().into_owned(),
            version,
        }),
    }
}
