//! Persistent string storage behind the chat history.
//!
//! This module provides:
//! - `KeyValueStore`, the `localStorage`-shaped seam the history store writes through
//! - `BrowserStore`, backed by `window.localStorage` (wasm)
//! - `FileStore`, one JSON file per key under the local data directory (native)
//! - `MemoryStore`, a shared in-memory map

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage rejected write: {0}")]
    Rejected(String),
}

/// Synchronous, last-write-wins string storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

// ============================================
// In-memory
// ============================================

/// Clones share the same map, so a second handle behaves like a page reload
/// against the same browser profile.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================
// Browser localStorage (wasm)
// ============================================

#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, history will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(format!("{err:?}")))
    }
}

// ============================================
// File-backed (native)
// ============================================

#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Store under the platform data directory, falling back to `cache/`.
    pub fn new() -> Self {
        let dir = dirs::data_local_dir()
            .map(|data_dir| data_dir.join("ppg-chat").join("storage"))
            .unwrap_or_else(|| PathBuf::from("cache").join("storage"));
        Self::at(dir)
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        tracing::debug!(key, bytes = value.len(), "stored item");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = BrowserStore;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = FileStore;

/// The persistent store for the current target.
pub fn platform_store() -> PlatformStore {
    PlatformStore::new()
}

/// Sanitize storage key for filesystem use
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(128)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("ppg_user_key"), "ppg_user_key");
        assert_eq!(
            sanitize_key("ppg_history_guest_1b4e28ba-2fa1"),
            "ppg_history_guest_1b4e28ba-2fa1"
        );
        assert_eq!(sanitize_key("a/b:c.d"), "a_b_c_d");
        assert_eq!(sanitize_key(&"k".repeat(300)).len(), 128);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let reloaded = store.clone();
        store.set_item("k", "v").unwrap();
        assert_eq!(reloaded.get_item("k").as_deref(), Some("v"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set_item("k", "one").unwrap();
        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").as_deref(), Some("two"));
        assert!(store.get_item("missing").is_none());
    }
}
