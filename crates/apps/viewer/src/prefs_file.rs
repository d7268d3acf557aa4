//! File-backed preference store: one flat JSON object of namespaced keys,
//! rewritten on every set. Small enough that atomicity is not worth the
//! complexity.

use std::collections::BTreeMap;
use std::path::PathBuf;

use prefs::{PrefError, PrefStore, KEY_PREFIX};

pub struct FilePrefStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefStore {
    /// Loads the store, treating a missing or unreadable file as empty.
    pub fn load(path: PathBuf) -> Self {
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        FilePrefStore { path, values }
    }

    fn persist(&self) -> Result<(), PrefError> {
        let raw = serde_json::to_string_pretty(&self.values)
            .map_err(|e| PrefError::Io(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| PrefError::Io(e.to_string()))
    }
}

impl PrefStore for FilePrefStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, PrefError> {
        Ok(self.values.get(&format!("{KEY_PREFIX}{key}")).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.values
            .insert(format!("{KEY_PREFIX}{key}"), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<bool, PrefError> {
        let removed = self.values.remove(&format!("{KEY_PREFIX}{key}")).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
