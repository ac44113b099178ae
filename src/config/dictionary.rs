//! Dictionary configuration module.
//!
//! This module defines where the tracked-object dictionary is stored and the
//! limits applied when keys are registered.

use super::ConfigResult;
use super::Validate;
use crate::data_structures::loose_dictionary::LooseDictionaryConfig;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound accepted for `max_key_length`.
const MAX_KEY_LENGTH_LIMIT: usize = 1024;

/// Dictionary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// JSON file holding the tracked objects
    pub store_path: PathBuf,

    /// Maximum key length in characters
    pub max_key_length: usize,

    /// Whether adding or renaming a key reports overlaps with existing keys
    pub detect_conflicts: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        let core = LooseDictionaryConfig::default();
        Self {
            store_path: PathBuf::from("tracked_objects.json"),
            max_key_length: core.max_key_length,
            detect_conflicts: core.detect_conflicts,
        }
    }
}

impl Validate for DictionaryConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "store_path must not be empty".to_string(),
            ));
        }

        if self.max_key_length == 0 || self.max_key_length > MAX_KEY_LENGTH_LIMIT {
            return Err(ConfigError::ValueOutOfRange {
                key: "dictionary.max_key_length".to_string(),
                message: format!("must be between 1 and {MAX_KEY_LENGTH_LIMIT}"),
            });
        }

        Ok(())
    }
}

impl From<&DictionaryConfig> for LooseDictionaryConfig {
    fn from(config: &DictionaryConfig) -> Self {
        Self {
            max_key_length: config.max_key_length,
            detect_conflicts: config.detect_conflicts,
        }
    }
}
