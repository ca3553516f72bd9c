//! Durable panel geometry: per-window entries, the aggregate mapping, and bounded layout
//! snapshots, all stored through an injected [`PrefsStore`].
//!
//! Loads never fail outward. Missing, unparsable, or invalid geometry reads as absent so callers
//! fall back to computed defaults.

use std::{collections::BTreeMap, rc::Rc};

use leptos::logging;
use panel_host::{
    load_pref_with, next_snapshot_id, save_pref_with, unix_time_ms_now, PrefsStore, StoreError,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Geometry, WindowId};

pub const LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_SNAPSHOT_KEEP: usize = 5;

/// Geometry per panel id.
pub type GeometryMap = BTreeMap<WindowId, Geometry>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("refusing to persist invalid geometry for `{0}`")]
    InvalidGeometry(WindowId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Timestamped full copy of every panel geometry.
pub struct LayoutSnapshot {
    pub schema_version: u32,
    pub snapshot_id: u64,
    pub saved_at_unix_ms: u64,
    pub windows: GeometryMap,
}

#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    schema_version: u32,
    snapshot_id: u64,
    saved_at_unix_ms: u64,
    windows: BTreeMap<WindowId, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Key naming for everything the adapter writes.
pub struct LayoutKeys {
    prefix: String,
}

impl LayoutKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn geometry_prefix(&self) -> String {
        format!("{}.geometry.", self.prefix)
    }

    pub fn geometry(&self, window_id: &WindowId) -> String {
        format!("{}{}", self.geometry_prefix(), window_id)
    }

    pub fn aggregate(&self) -> String {
        format!("{}.layout.current", self.prefix)
    }

    pub fn snapshot_prefix(&self) -> String {
        format!("{}.layout.snapshot.", self.prefix)
    }

    /// Zero-padded so lexical key order matches snapshot id order.
    pub fn snapshot(&self, snapshot_id: u64) -> String {
        format!("{}{snapshot_id:020}", self.snapshot_prefix())
    }

    fn snapshot_id(&self, key: &str) -> Option<u64> {
        key.strip_prefix(&self.snapshot_prefix())?.parse().ok()
    }
}

#[derive(Clone)]
pub struct LayoutPersistence {
    store: Rc<dyn PrefsStore>,
    keys: LayoutKeys,
}

impl LayoutPersistence {
    pub fn new(store: Rc<dyn PrefsStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            keys: LayoutKeys::new(key_prefix),
        }
    }

    pub fn keys(&self) -> &LayoutKeys {
        &self.keys
    }

    /// Writes one panel's geometry. Invalid geometry is rejected and never reaches the store.
    pub fn save(&self, window_id: &WindowId, geometry: Geometry) -> Result<(), PersistenceError> {
        if !geometry.is_valid() {
            return Err(PersistenceError::InvalidGeometry(window_id.clone()));
        }
        save_pref_with(
            self.store.as_ref(),
            &self.keys.geometry(window_id),
            &geometry,
        )?;
        Ok(())
    }

    pub fn load(&self, window_id: &WindowId) -> Option<Geometry> {
        let key = self.keys.geometry(window_id);
        let value: Value = self.read(&key)?;
        decode_geometry(&key, value)
    }

    /// Writes the full mapping, skipping invalid entries.
    pub fn save_aggregate(&self, windows: &GeometryMap) -> Result<(), PersistenceError> {
        save_pref_with(
            self.store.as_ref(),
            &self.keys.aggregate(),
            &valid_entries(windows),
        )?;
        Ok(())
    }

    /// Reads the aggregate mapping; invalid entries are dropped individually.
    pub fn load_aggregate(&self) -> Option<GeometryMap> {
        let key = self.keys.aggregate();
        let entries: BTreeMap<WindowId, Value> = self.read(&key)?;
        Some(decode_entries(&key, entries))
    }

    /// Stores a new snapshot and returns its id, which is always above every stored id.
    pub fn save_named_snapshot(&self, windows: &GeometryMap) -> Result<u64, PersistenceError> {
        let latest = self.snapshot_ids()?.last().copied().unwrap_or(0);
        let snapshot_id = next_snapshot_id(latest);
        let snapshot = LayoutSnapshot {
            schema_version: LAYOUT_SCHEMA_VERSION,
            snapshot_id,
            saved_at_unix_ms: unix_time_ms_now(),
            windows: valid_entries(windows),
        };
        save_pref_with(
            self.store.as_ref(),
            &self.keys.snapshot(snapshot_id),
            &snapshot,
        )?;
        Ok(snapshot_id)
    }

    /// Returns the newest readable snapshot, skipping unreadable ones.
    pub fn load_latest_snapshot(&self) -> Option<LayoutSnapshot> {
        let ids = match self.snapshot_ids() {
            Ok(ids) => ids,
            Err(err) => {
                logging::warn!("listing layout snapshots failed: {err}");
                return None;
            }
        };
        ids.into_iter()
            .rev()
            .find_map(|snapshot_id| self.load_snapshot(snapshot_id))
    }

    /// Snapshot ids in ascending order.
    pub fn snapshot_ids(&self) -> Result<Vec<u64>, PersistenceError> {
        let mut ids: Vec<u64> = self
            .store
            .list_pref_keys(&self.keys.snapshot_prefix())?
            .iter()
            .filter_map(|key| self.keys.snapshot_id(key))
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Deletes all but the newest `keep` snapshots. Returns how many were deleted.
    pub fn prune_snapshots(&self, keep: usize) -> Result<usize, PersistenceError> {
        let ids = self.snapshot_ids()?;
        let excess = ids.len().saturating_sub(keep);
        for snapshot_id in &ids[..excess] {
            self.store.delete_pref(&self.keys.snapshot(*snapshot_id))?;
        }
        Ok(excess)
    }

    /// Removes every per-window entry and the aggregate mapping. Snapshots are kept.
    pub fn clear_window_entries(&self) -> Result<(), PersistenceError> {
        for key in self.store.list_pref_keys(&self.keys.geometry_prefix())? {
            self.store.delete_pref(&key)?;
        }
        self.store.delete_pref(&self.keys.aggregate())?;
        Ok(())
    }

    fn load_snapshot(&self, snapshot_id: u64) -> Option<LayoutSnapshot> {
        let key = self.keys.snapshot(snapshot_id);
        let stored: StoredSnapshot = self.read(&key)?;
        if stored.schema_version != LAYOUT_SCHEMA_VERSION {
            logging::warn!(
                "skipping layout snapshot `{key}` with schema v{}",
                stored.schema_version
            );
            return None;
        }
        Some(LayoutSnapshot {
            schema_version: stored.schema_version,
            snapshot_id: stored.snapshot_id,
            saved_at_unix_ms: stored.saved_at_unix_ms,
            windows: decode_entries(&key, stored.windows),
        })
    }

    /// Missing keys, store failures, and malformed JSON all read as absent.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match load_pref_with(self.store.as_ref(), key) {
            Ok(value) => value,
            Err(err) => {
                logging::warn!("discarding unreadable layout entry `{key}`: {err}");
                None
            }
        }
    }
}

fn decode_geometry(key: &str, value: Value) -> Option<Geometry> {
    match serde_json::from_value::<Geometry>(value) {
        Ok(geometry) if geometry.is_valid() => Some(geometry),
        Ok(geometry) => {
            logging::warn!("discarding invalid geometry under `{key}`: {geometry:?}");
            None
        }
        Err(err) => {
            logging::warn!("discarding unreadable geometry under `{key}`: {err}");
            None
        }
    }
}

fn decode_entries(key: &str, entries: BTreeMap<WindowId, Value>) -> GeometryMap {
    entries
        .into_iter()
        .filter_map(|(window_id, value)| {
            let geometry = decode_geometry(&format!("{key}[{window_id}]"), value)?;
            Some((window_id, geometry))
        })
        .collect()
}

fn valid_entries(windows: &GeometryMap) -> GeometryMap {
    windows
        .iter()
        .filter(|(_, geometry)| geometry.is_valid())
        .map(|(window_id, geometry)| (window_id.clone(), *geometry))
        .collect()
}
