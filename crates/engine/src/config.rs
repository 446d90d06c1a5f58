//! Module location overrides
//!
//! The modules are normally found by their well-known names through the
//! system library search path. Development and test setups can point the
//! SDK elsewhere, either with a `bulwark.toml` next to the running
//! executable or with environment variables (which win).

use serde::Deserialize;

use bulwark_sdk::modules;

use crate::platform::module_file_name;

/// Environment override for the agent module path
pub const AGENT_MODULE_ENV: &str = "BULWARK_AGENT_MODULE";

/// Environment override for the capsule module path
pub const CAPSULE_MODULE_ENV: &str = "BULWARK_CAPSULE_MODULE";

/// Where to find the agent and capsule modules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModulePaths {
    /// Agent module file name or path
    pub agent: String,

    /// Capsule module file name or path
    pub capsule: String,
}

impl Default for ModulePaths {
    fn default() -> Self {
        Self {
            agent: module_file_name(modules::AGENT_MODULE),
            capsule: module_file_name(modules::CAPSULE_MODULE),
        }
    }
}

impl ModulePaths {
    /// Well-known names, overridden by `bulwark.toml` beside the
    /// executable, overridden by the environment.
    pub fn resolve() -> Self {
        let mut paths = Self::from_config_file().unwrap_or_default();
        if let Ok(agent) = std::env::var(AGENT_MODULE_ENV) {
            paths.agent = agent;
        }
        if let Ok(capsule) = std::env::var(CAPSULE_MODULE_ENV) {
            paths.capsule = capsule;
        }
        paths
    }

    fn from_config_file() -> Option<Self> {
        let path = std::env::current_exe().ok()?.with_file_name("bulwark.toml");
        let text = std::fs::read_to_string(path).ok()?;
        match Self::from_toml(&text) {
            Ok(paths) => Some(paths),
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed bulwark.toml");
                None
            }
        }
    }

    fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_platform_extension() {
        let paths = ModulePaths::default();

        #[cfg(target_os = "windows")]
        assert_eq!(paths.agent, "BulwarkAgent.dll");

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            assert_eq!(paths.agent, "BulwarkAgent.so");
            assert_eq!(paths.capsule, "BulwarkCapsule.so");
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let paths = ModulePaths::from_toml("agent = \"/opt/bulwark/agent.so\"").unwrap();
        assert_eq!(paths.agent, "/opt/bulwark/agent.so");
        assert_eq!(paths.capsule, ModulePaths::default().capsule);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ModulePaths::from_toml("agnet = \"typo.so\"").is_err());
    }
}
