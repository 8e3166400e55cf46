//! Persistence adapter. Failures stop here: callers only see `bool`/`Option`.

use crate::error::StoreError;
use crate::geojson::FeatureCollection;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, warn};

pub const STORAGE_KEY: &str = "map-drawings";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process backend. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail, as a full or blocked browser store would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn check(&self, op: &'static str) -> Result<(), StoreError> {
        if self.failing.get() {
            Err(StoreError::Backend { op, message: "memory store set to fail".into() })
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check("get")?;
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check("set")?;
        self.put_raw(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check("remove")?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Saves and restores the serialized drawing collection under one key.
pub struct DrawingStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl fmt::Debug for DrawingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingStore").field("key", &self.key).finish_non_exhaustive()
    }
}

impl DrawingStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        DrawingStore { backend: Box::new(backend), key: STORAGE_KEY.to_string() }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn save(&mut self, fc: &FeatureCollection) -> bool {
        let text = match serde_json::to_string(fc) {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "could not serialize drawings");
                return false;
            }
        };
        match self.backend.set(&self.key, &text) {
            Ok(()) => {
                debug!(key = %self.key, features = fc.features.len(), "drawings saved");
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "could not save drawings");
                false
            }
        }
    }

    pub fn load(&self) -> Option<FeatureCollection> {
        let text = match self.backend.get(&self.key) {
            Ok(Some(t)) => t,
            Ok(None) => return None,
            Err(e) => {
                error!(key = %self.key, error = %e, "could not read drawings");
                return None;
            }
        };
        match FeatureCollection::from_json_str(&text) {
            Ok(fc) => Some(fc),
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored drawings are not a feature collection");
                None
            }
        }
    }

    pub fn clear(&mut self) -> bool {
        match self.backend.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                error!(key = %self.key, error = %e, "could not clear drawings");
                false
            }
        }
    }

    pub fn has_stored(&self) -> bool {
        matches!(self.backend.get(&self.key), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_become_false_or_none() {
        let backend = MemoryStore::new();
        let mut store = DrawingStore::new(backend.clone());
        assert!(store.save(&FeatureCollection::default()));
        assert!(store.has_stored());
        backend.set_failing(true);
        assert!(!store.save(&FeatureCollection::default()));
        assert!(store.load().is_none());
        assert!(!store.clear());
        assert!(!store.has_stored());
    }

    #[test]
    fn garbage_is_not_loaded() {
        let backend = MemoryStore::new();
        backend.put_raw(STORAGE_KEY, "{not json");
        let store = DrawingStore::new(backend);
        assert!(store.has_stored());
        assert!(store.load().is_none());
    }
}
