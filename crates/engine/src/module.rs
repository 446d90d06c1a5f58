//! Lazily-acquired module state
//!
//! One [`ModuleState`] owns a library handle, the symbol set resolved from
//! it, and the mutex serializing both. The same state machine serves the
//! agent and the capsule; only the symbol set differs.
//!
//! Acquisition is retryable: a failed load leaves the state exactly as a
//! fresh process would see it, and a failed resolve keeps the handle so the
//! next attempt re-resolves without reloading. There is no backoff and no
//! permanent give-up state.

use parking_lot::Mutex;

use crate::error::ModuleError;
use crate::platform::SharedLibraryLoader;

/// Function pointers a module must export.
///
/// Resolution happens on every acquisition and either produces a complete
/// set or nothing - a partially-resolved module is unrepresentable.
pub trait SymbolSet: Sized + Send {
    /// Resolve every required export from `handle`.
    ///
    /// `module` is the file name, used in errors only.
    fn resolve<L: SharedLibraryLoader>(
        loader: &L,
        handle: &L::Handle,
        module: &str,
    ) -> Result<Self, ModuleError>;
}

/// Fields guarded by the module mutex.
struct Slot<H, S> {
    handle: Option<H>,
    symbols: Option<S>,
}

/// One lazily-loaded module: library handle, resolved symbols, and the
/// lock guarding both.
///
/// Invariant: `symbols` is `Some` only if the most recent resolution
/// succeeded while `handle` was `Some`.
pub struct ModuleState<L: SharedLibraryLoader, S: SymbolSet> {
    file_name: String,
    slot: Mutex<Slot<L::Handle, S>>,
}

impl<L: SharedLibraryLoader, S: SymbolSet> ModuleState<L, S> {
    /// State for the module at `file_name`, initially unloaded.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            slot: Mutex::new(Slot {
                handle: None,
                symbols: None,
            }),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Whether the library is currently loaded. Diagnostic only - the
    /// answer can change as soon as the lock is released.
    pub fn is_loaded(&self) -> bool {
        self.slot.lock().handle.is_some()
    }

    /// Lock the module, run the acquisition protocol, and hand the
    /// resolved symbol set to `f`.
    ///
    /// The lock is held for the duration of `f`, so the pointers it
    /// receives cannot be invalidated by a concurrent release.
    pub fn with_symbols<R>(&self, loader: &L, f: impl FnOnce(&S) -> R) -> Result<R, ModuleError> {
        let mut slot = self.slot.lock();
        let symbols = Self::acquire(loader, &mut slot, &self.file_name)?;
        Ok(f(symbols))
    }

    /// Acquisition protocol, run under the module lock:
    /// load the library if it isn't yet, then re-resolve the full symbol
    /// set. Re-resolution is idempotent and covers the case where an
    /// earlier call loaded the library but failed on a missing export.
    fn acquire<'slot>(
        loader: &L,
        slot: &'slot mut Slot<L::Handle, S>,
        file_name: &str,
    ) -> Result<&'slot S, ModuleError> {
        if slot.handle.is_none() {
            slot.handle = loader.open(file_name);
        }
        let handle = slot
            .handle
            .as_ref()
            .ok_or_else(|| ModuleError::ModuleNotFound(file_name.to_owned()))?;

        slot.symbols = None;
        let symbols = S::resolve(loader, handle, file_name)?;
        Ok(slot.symbols.insert(symbols))
    }

    /// Unload the module and return to the unloaded state.
    ///
    /// Safe to call when nothing was ever loaded. Symbols resolved from
    /// the handle are dropped before the library is closed.
    pub fn release(&self, loader: &L) {
        let mut slot = self.slot.lock();
        slot.symbols = None;
        if let Some(handle) = slot.handle.take() {
            loader.close(handle);
            tracing::debug!(module = %self.file_name, "module released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::RawSymbol;
    use crate::symbols::AgentSymbols;
    use std::ffi::{c_char, c_int, c_void};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    unsafe extern "C" fn stub_factory(_name: *const c_char, _version: c_int) -> *mut c_void {
        std::ptr::null_mut()
    }

    /// Loader whose behavior is driven by flags, counting every primitive
    /// call.
    #[derive(Default)]
    struct ScriptedLoader {
        open_fails: AtomicBool,
        symbol_fails: AtomicBool,
        opens: AtomicUsize,
        resolves: AtomicUsize,
        closes: AtomicUsize,
    }

    impl SharedLibraryLoader for ScriptedLoader {
        type Handle = u32;

        fn open(&self, _file_name: &str) -> Option<u32> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            // Widen the first-load window so concurrent callers pile up
            // on the module mutex.
            std::thread::sleep(Duration::from_millis(2));
            (!self.open_fails.load(Ordering::SeqCst)).then_some(7)
        }

        fn symbol(&self, _handle: &u32, _name: &str) -> Option<RawSymbol> {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            if self.symbol_fails.load(Ordering::SeqCst) {
                return None;
            }
            RawSymbol::new(stub_factory as *mut c_void)
        }

        fn close(&self, _handle: u32) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn state() -> ModuleState<ScriptedLoader, AgentSymbols> {
        ModuleState::new("BulwarkAgent.so")
    }

    #[test]
    fn test_acquire_loads_once() {
        let loader = ScriptedLoader::default();
        let state = state();

        for _ in 0..3 {
            let ok = state.with_symbols(&loader, |_| ());
            assert!(ok.is_ok());
        }
        assert_eq!(loader.opens.load(Ordering::SeqCst), 1);
        // Exports are re-resolved on every acquisition
        assert_eq!(loader.resolves.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_open_failure_is_retryable() {
        let loader = ScriptedLoader::default();
        loader.open_fails.store(true, Ordering::SeqCst);
        let state = state();

        let err = state.with_symbols(&loader, |_| ()).unwrap_err();
        assert!(matches!(err, ModuleError::ModuleNotFound(_)));
        assert!(!state.is_loaded());

        // "Install" the module; the next call loads from scratch
        loader.open_fails.store(false, Ordering::SeqCst);
        assert!(state.with_symbols(&loader, |_| ()).is_ok());
        assert_eq!(loader.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_symbol_keeps_handle() {
        let loader = ScriptedLoader::default();
        loader.symbol_fails.store(true, Ordering::SeqCst);
        let state = state();

        let err = state.with_symbols(&loader, |_| ()).unwrap_err();
        assert!(matches!(err, ModuleError::SymbolNotFound { .. }));
        // The library stays loaded so the retry only re-resolves
        assert!(state.is_loaded());

        loader.symbol_fails.store(false, Ordering::SeqCst);
        assert!(state.with_symbols(&loader, |_| ()).is_ok());
        assert_eq!(loader.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_unloads_and_next_call_reloads() {
        let loader = ScriptedLoader::default();
        let state = state();

        assert!(state.with_symbols(&loader, |_| ()).is_ok());
        state.release(&loader);
        assert!(!state.is_loaded());
        assert_eq!(loader.closes.load(Ordering::SeqCst), 1);

        assert!(state.with_symbols(&loader, |_| ()).is_ok());
        assert_eq!(loader.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_release_never_loaded_is_noop() {
        let loader = ScriptedLoader::default();
        let state = state();

        state.release(&loader);
        state.release(&loader);
        assert_eq!(loader.closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_first_load_opens_once() {
        let loader = ScriptedLoader::default();
        let state = state();

        std::thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    assert!(state.with_symbols(&loader, |_| ()).is_ok());
                });
            }
        });
        assert_eq!(loader.opens.load(Ordering::SeqCst), 1);
    }
}
