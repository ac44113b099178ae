//! Pin Assist Library
//!
//! Pin Assist decides which tracked object a free-form object name refers to.
//! Names such as `MineRock_Copper(Clone)` are matched against registered keys
//! by substring, with per-key constraints (end-anchored matches, blacklist
//! words) and conflict reporting when several keys overlap.
//!
//! The matching core lives in [`data_structures::loose_dictionary`]. The
//! remaining modules are the host layer used by the binary: configuration,
//! persistence and the message catalog.

pub mod config;
pub mod data_structures;
pub mod error;
pub mod messages;
pub mod store;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Pin Assist.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Loads configuration from `config_path` (if any), defaults and
/// `PIN_ASSIST__*` environment variables, and installs it as the global
/// configuration.
pub fn init(config_path: Option<&std::path::Path>) -> error::PinAssistResult<&'static config::PinAssistConfig> {
    let loader = config::ConfigLoader::new(config_path, config::ENV_PREFIX);
    config::init_global_config(loader.load()?);
    config::global_config()
        .ok_or_else(|| error::PinAssistError::Custom("Global configuration unavailable".to_string()))
}
