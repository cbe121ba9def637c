//! Freshman classification overrides
//!
//! An override is an administrator's correction of a material's derived
//! freshman flag. When present it is authoritative: classification returns
//! the stored value until the override is cleared.
//!
//! The store is injected into the classifier rather than read from ambient
//! state. `MemoryOverrideStore` is the process-wide snapshot; the HTTP layer
//! hydrates it from the `freshman_overrides` table at startup and writes
//! changes through to that table.

use std::collections::HashMap;
use std::sync::RwLock;

/// Key/value store of overrides keyed by material id
pub trait OverrideStore: Send + Sync {
    /// Stored override for a material, if any
    fn get(&self, material_id: &str) -> Option<bool>;

    /// Set an override; unconditional, last write wins
    fn set(&self, material_id: &str, value: bool);

    /// Remove an override; returns whether one existed
    fn clear(&self, material_id: &str) -> bool;
}

/// In-memory override store
#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    entries: RwLock<HashMap<String, bool>>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with existing overrides
    pub fn with_entries(entries: HashMap<String, bool>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock still holds a consistent map (writes are single inserts)
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, bool>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, bool>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn get(&self, material_id: &str) -> Option<bool> {
        self.read().get(material_id).copied()
    }

    fn set(&self, material_id: &str, value: bool) {
        self.write().insert(material_id.to_string(), value);
    }

    fn clear(&self, material_id: &str) -> bool {
        self.write().remove(material_id).is_some()
    }
}
