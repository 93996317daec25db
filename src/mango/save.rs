//! Mango Clicker local save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current envelope version. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest envelope that can still be read. Only
//!   bump it for breaking changes (a field removed or its meaning changed).
//!
//! Older compatible envelopes are read with missing fields back-filled from
//! defaults. Every loaded snapshot is normalized (levels clamped, derived
//! values recomputed), so saving a valid snapshot and loading it back yields
//! the same value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SAVE_KEY;
use crate::error::StorageError;

use super::state::GameData;

/// Save envelope format version.
const SAVE_VERSION: u32 = 1;

/// Oldest readable envelope version.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// String key-value storage: browser localStorage or memory.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store, used when localStorage is unavailable and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// `window.localStorage`. Only functional in the browser.
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// localStorage when the browser provides it, memory otherwise.
pub fn open_store() -> Box<dyn KeyValueStore> {
    match BrowserStorage::open() {
        Some(s) => Box::new(s),
        None => {
            log::warn!("Mango Clicker: localStorage unavailable, progress will not survive a reload");
            Box::new(MemoryStore::new())
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameData,
}

/// Write the snapshot to the local store.
pub fn save_local(store: &mut dyn KeyValueStore, data: &GameData) -> Result<(), StorageError> {
    let envelope = SaveData {
        version: SAVE_VERSION,
        game: data.clone(),
    };
    let json = serde_json::to_string(&envelope)?;
    store.set(SAVE_KEY, &json)
}

/// Read the snapshot from the local store.
///
/// Missing, corrupt or incompatible data yields defaults (a new game); the
/// corrupt or incompatible entry is removed.
pub fn load_local(store: &mut dyn KeyValueStore) -> GameData {
    let Some(json) = store.get(SAVE_KEY) else {
        return GameData::new();
    };

    let save: SaveData = match serde_json::from_str(&json) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Mango Clicker: failed to parse save data (discarding): {e}");
            store.remove(SAVE_KEY);
            return GameData::new();
        }
    };

    if save.version < MIN_COMPATIBLE_VERSION {
        log::info!(
            "Mango Clicker: save too old (saved={}, min_compatible={}), starting a new game",
            save.version,
            MIN_COMPATIBLE_VERSION
        );
        store.remove(SAVE_KEY);
        return GameData::new();
    }

    if save.version < SAVE_VERSION {
        log::info!(
            "Mango Clicker: migrating save data (saved={}, current={})",
            save.version,
            SAVE_VERSION
        );
    }

    save.game.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mango::formulas;

    fn sample() -> GameData {
        GameData {
            clicks: 987_654,
            click_cooldown: formulas::cooldown(7),
            mango_click_level: 23,
            cooldown_level: 7,
            rebirth_count: 3,
            rebirth_bonus: formulas::rebirth_bonus(3),
            last_click_time: 1_760_000_000_123,
        }
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut store = MemoryStore::new();
        let original = sample();
        save_local(&mut store, &original).unwrap();
        assert_eq!(load_local(&mut store), original);
    }

    #[test]
    fn empty_store_gives_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(load_local(&mut store), GameData::new());
    }

    #[test]
    fn corrupt_data_discarded() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{not json").unwrap();
        assert_eq!(load_local(&mut store), GameData::new());
        assert!(store.get(SAVE_KEY).is_none());
    }

    #[test]
    fn version_below_min_compatible_discarded() {
        let mut store = MemoryStore::new();
        store
            .set(SAVE_KEY, r#"{"version":0,"game":{"clicks":50}}"#)
            .unwrap();
        assert_eq!(load_local(&mut store), GameData::new());
        assert!(store.get(SAVE_KEY).is_none());
    }

    #[test]
    fn missing_fields_backfilled() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"version":1,"game":{"clicks":5000,"mangoClickLevel":4}}"#,
            )
            .unwrap();
        let d = load_local(&mut store);
        assert_eq!(d.clicks, 5000);
        assert_eq!(d.mango_click_level, 4);
        assert_eq!(d.cooldown_level, 0);
        assert!((d.click_cooldown - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_fields_ignored() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"version":1,"game":{"clicks":10,"lastSaveDate":"2026-01-01","future":true}}"#,
            )
            .unwrap();
        assert_eq!(load_local(&mut store).clicks, 10);
    }

    #[test]
    fn derived_fields_recomputed_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"version":1,"game":{"cooldownLevel":2,"clickCooldown":0.1,"rebirthCount":1,"rebirthBonus":20.0}}"#,
            )
            .unwrap();
        let d = load_local(&mut store);
        assert!((d.click_cooldown - formulas::cooldown(2)).abs() < 1e-9);
        assert!((d.rebirth_bonus - 0.2).abs() < 1e-9);
    }

    #[test]
    fn save_overwrites_previous() {
        let mut store = MemoryStore::new();
        save_local(&mut store, &sample()).unwrap();
        save_local(&mut store, &GameData::new()).unwrap();
        assert_eq!(load_local(&mut store), GameData::new());
    }
}
