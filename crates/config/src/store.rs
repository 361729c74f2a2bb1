//! In-memory nested configuration data with parent fallback.
//!
//! A store holds section → instance → field mappings. A child store may
//! hold a read-only reference to a parent store; lookups through the child
//! merge the parent's data under the local data, with local values winning
//! per field. The merge is recomputed on every lookup, so later parent
//! mutations stay visible until the child shadows them.

use std::{cell::RefCell, rc::Rc};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Shared handle to a store.
///
/// The subsystem is single-threaded by design; parents are shared read-only
/// with their children, so `Rc<RefCell<_>>` is sufficient.
pub type SharedStore = Rc<RefCell<ConfigStore>>;

/// Nested configuration data with an optional parent whose values show
/// through wherever the local data does not shadow them.
#[derive(Debug, Default)]
pub struct ConfigStore {
    data: Map<String, Value>,
    parent: Option<SharedStore>,
}

impl ConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parent(parent: SharedStore) -> Self {
        Self {
            data: Map::new(),
            parent: Some(parent),
        }
    }

    /// Wrap the store in a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedStore {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Replace the store's data wholesale. Used by the load path once a
    /// raw mapping has passed validation.
    pub fn set_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    #[must_use]
    pub fn parent(&self) -> Option<&SharedStore> {
        self.parent.as_ref()
    }

    /// Resolve a top-level key.
    ///
    /// When a parent holds the same key, the result is the parent's data
    /// overlaid with the local data (local wins per field, recursively for
    /// nested maps). Absent in both is a [`Error::KeyNotFound`].
    pub fn get(&self, key: &str) -> Result<Value> {
        if let Some(parent) = &self.parent {
            let parent = parent.borrow();
            if parent.data.contains_key(key) {
                let mut merged = parent.data.clone();
                deep_merge(&mut merged, &self.data);
                return merged.remove(key).ok_or_else(|| Error::key_not_found(key));
            }
        }
        self.data
            .get(key)
            .cloned()
            .ok_or_else(|| Error::key_not_found(key))
    }
}

/// Deep right-biased merge: `overlay` wins per key, recursing where both
/// sides are objects. Keys present only in `base` are preserved.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = base.get_mut(key) {
                deep_merge(existing, incoming);
                continue;
            }
        }
        base.insert(key.clone(), value.clone());
    }
}
