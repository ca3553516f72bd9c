//! Preference storage contracts and adapters.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

use crate::StoreError;

/// Host service for durable preference values (JSON stored as text per key).
///
/// Calls are synchronous: the layout core runs on a single UI thread and treats writes as
/// fire-and-forget, so adapters over asynchronous media must queue internally.
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), StoreError>;

    /// Deletes a preference key. Deleting a missing key succeeds.
    fn delete_pref(&self, key: &str) -> Result<(), StoreError>;

    /// Lists every stored key starting with `prefix`, in ascending order.
    fn list_pref_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep a handle while the runtime owns another.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), StoreError> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn list_pref_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .borrow()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.save_pref(key, &raw)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct PanelPref {
        docked: bool,
    }

    #[test]
    fn memory_prefs_store_round_trip_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        store_obj.save_pref("pref.key", "{\"k\":1}").expect("save");
        assert_eq!(
            store_obj.load_pref("pref.key").expect("load"),
            Some("{\"k\":1}".to_string())
        );
        store_obj.delete_pref("pref.key").expect("delete");
        assert_eq!(store_obj.load_pref("pref.key").expect("load"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn memory_prefs_store_clones_share_entries() {
        let store = MemoryPrefsStore::default();
        let handle = store.clone();
        store.save_pref("a", "1").expect("save");
        assert_eq!(handle.load_pref("a").expect("load"), Some("1".to_string()));
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn list_pref_keys_filters_by_prefix_in_order() {
        let store = MemoryPrefsStore::default();
        store.save_pref("panel.snapshot.0002", "{}").expect("save");
        store.save_pref("panel.geometry.scope", "{}").expect("save");
        store.save_pref("panel.snapshot.0001", "{}").expect("save");

        assert_eq!(
            store.list_pref_keys("panel.snapshot.").expect("list"),
            vec![
                "panel.snapshot.0001".to_string(),
                "panel.snapshot.0002".to_string()
            ]
        );
    }

    #[test]
    fn typed_pref_helpers_round_trip() {
        let store = MemoryPrefsStore::default();
        save_pref_with(&store, "palette", &PanelPref { docked: true }).expect("save typed pref");

        let loaded: Option<PanelPref> = load_pref_with(&store, "palette").expect("load typed pref");
        assert_eq!(loaded, Some(PanelPref { docked: true }));
    }

    #[test]
    fn typed_load_reports_malformed_json() {
        let store = MemoryPrefsStore::default();
        store.save_pref("palette", "not json").expect("save");

        let err = load_pref_with::<_, PanelPref>(&store, "palette").expect_err("malformed");
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
