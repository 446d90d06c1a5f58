//! Symbol sets exported by the agent and capsule modules
//!
//! Each set is resolved in full or not at all; the field types are plain
//! function pointers, so holding a set means every export was found.

use bulwark_sdk::modules;
use bulwark_sdk::{CapsuleLaunchFn, CreateInterfaceFn, FlattenArgsFn, FlattenArgsLengthFn};

use crate::error::ModuleError;
use crate::module::SymbolSet;
use crate::platform::{RawSymbol, SharedLibraryLoader};

fn required<L: SharedLibraryLoader>(
    loader: &L,
    handle: &L::Handle,
    module: &str,
    symbol: &'static str,
) -> Result<RawSymbol, ModuleError> {
    loader
        .symbol(handle, symbol)
        .ok_or_else(|| ModuleError::SymbolNotFound {
            module: module.to_owned(),
            symbol,
        })
}

/// The agent module exports a single factory.
pub struct AgentSymbols {
    pub create_interface: CreateInterfaceFn,
}

impl SymbolSet for AgentSymbols {
    fn resolve<L: SharedLibraryLoader>(
        loader: &L,
        handle: &L::Handle,
        module: &str,
    ) -> Result<Self, ModuleError> {
        let factory = required(loader, handle, module, modules::AGENT_CREATE_INTERFACE)?;
        // SAFETY: the agent module documents this export with the
        // createInterface ABI.
        Ok(Self {
            create_interface: unsafe { factory.bind_create_interface() },
        })
    }
}

/// The capsule module exports its factory plus the launcher entry points.
/// All of them are required; a capsule missing any is treated as not
/// acquirable.
pub struct CapsuleSymbols {
    pub create_interface: CreateInterfaceFn,
    pub flatten_args: FlattenArgsFn,
    pub flatten_args_length: FlattenArgsLengthFn,
    pub launch: CapsuleLaunchFn,
}

impl SymbolSet for CapsuleSymbols {
    fn resolve<L: SharedLibraryLoader>(
        loader: &L,
        handle: &L::Handle,
        module: &str,
    ) -> Result<Self, ModuleError> {
        let factory = required(loader, handle, module, modules::CAPSULE_CREATE_INTERFACE)?;
        let flatten = required(loader, handle, module, modules::CAPSULE_FLATTEN_ARGS)?;
        let flatten_len = required(loader, handle, module, modules::CAPSULE_FLATTEN_ARGS_LENGTH)?;
        let launch = required(loader, handle, module, modules::CAPSULE_LAUNCH)?;
        // SAFETY: the capsule module documents these exports with the
        // signatures they are bound to here.
        unsafe {
            Ok(Self {
                create_interface: factory.bind_create_interface(),
                flatten_args: flatten.bind_flatten_args(),
                flatten_args_length: flatten_len.bind_flatten_args_length(),
                launch: launch.bind_capsule_launch(),
            })
        }
    }
}
