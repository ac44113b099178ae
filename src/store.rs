//! JSON persistence for the tracked-object dictionary.
//!
//! The file holds a flat JSON object mapping each key to its entry, in the
//! dictionary's export order. A missing or blank file loads as an empty
//! dictionary; anything that does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::data_structures::loose_dictionary::{LooseDictionary, LooseDictionaryConfig};
use crate::error::PinAssistResult;
use crate::messages::MessageKind;

/// Tracked objects map object names to the object type they are pinned as.
pub type TrackedObjects = LooseDictionary<String>;

/// Loads and saves [`TrackedObjects`] at a fixed path.
#[derive(Debug, Clone)]
pub struct TrackedObjectStore {
    path: PathBuf,
    config: LooseDictionaryConfig,
}

impl TrackedObjectStore {
    /// Creates a store for `path`; loaded dictionaries use `config`.
    pub fn new<P: AsRef<Path>>(path: P, config: LooseDictionaryConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the tracked objects, rebuilding the match trie.
    pub fn load(&self) -> PinAssistResult<TrackedObjects> {
        if !self.path.exists() {
            info!(path = ?self.path, "{}", MessageKind::TrackedObjectsInitialized);
            return Ok(LooseDictionary::with_config(self.config.clone()));
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            warn!(path = ?self.path, "{}", MessageKind::TrackedObjectsEmpty);
            return Ok(LooseDictionary::with_config(self.config.clone()));
        }

        let mut objects: TrackedObjects = serde_json::from_str(&raw).map_err(|e| {
            warn!(path = ?self.path, error = %e, "{}", MessageKind::TrackedObjectsInvalid);
            e
        })?;
        objects.set_config(self.config.clone());

        debug!(path = ?self.path, "{}", MessageKind::TrackedObjectsLoaded.format(&[&objects.len()]));
        Ok(objects)
    }

    /// Writes the tracked objects, creating parent directories as needed.
    pub fn save(&self, objects: &TrackedObjects) -> PinAssistResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(objects)?;
        fs::write(&self.path, json)?;

        debug!(path = ?self.path, "{}", MessageKind::TrackedObjectsSaved.format(&[&objects.len()]));
        Ok(())
    }
}
