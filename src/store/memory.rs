//! Process-wide in-memory [`DurableStore`].
//!
//! Clones share the same slots, so several clients handed the same store see
//! each other's writes the way tabs share a browser storage area.

use crate::store::{DurableStore, StoreError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared in-memory slots with an optional byte quota.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once the total size of all
    /// slot names and values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Number of slots currently written.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true if no slot is written.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl DurableStore for MemoryStore {
    fn get_item(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.read().get(name).cloned())
    }

    fn set_item(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.write();

        if let Some(quota) = self.quota {
            let used: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != name)
                .map(|(k, v)| k.len() + v.len())
                .sum();

            if used + name.len() + value.len() > quota {
                return Err(StoreError::backend(format!(
                    "quota of {quota} bytes exceeded writing {name}"
                )));
            }
        }

        slots.insert(name.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, name: &str) -> Result<(), StoreError> {
        self.slots.write().remove(name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();

        store.set_item("slot", "value").unwrap();
        assert_eq!(store.get_item("slot").unwrap().as_deref(), Some("value"));

        store.remove_item("slot").unwrap();
        assert_eq!(store.get_item("slot").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_slots() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set_item("slot", "value").unwrap();
        assert_eq!(other.get_item("slot").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);

        store.set_item("a", "12345").unwrap();
        assert!(store.set_item("b", "1234567890").is_err());
        // Replacing a slot only counts its new size.
        store.set_item("a", "123456789").unwrap();
        assert_eq!(store.len(), 1);
    }
}
