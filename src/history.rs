//! Per-browser conversation history.
//!
//! The history lives in key-value storage under `ppg_history_<user key>`, where
//! the user key is an anonymous `guest_<uuid>` created on first access and kept
//! under `ppg_user_key` for good.

use crate::storage::{KeyValueStore, StorageError};
use crate::types::ChatMessage;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

pub const USER_KEY_SLOT: &str = "ppg_user_key";
pub const HISTORY_SLOT_PREFIX: &str = "ppg_history_";
/// Entries kept per user; older ones are evicted first.
pub const HISTORY_LIMIT: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    fn generate() -> Self {
        Self(format!("guest_{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn history_slot(key: &UserKey) -> String {
    format!("{HISTORY_SLOT_PREFIX}{key}")
}

/// Keep only the newest `HISTORY_LIMIT` entries.
pub fn cap_history(messages: &[ChatMessage]) -> &[ChatMessage] {
    let start = messages.len().saturating_sub(HISTORY_LIMIT);
    &messages[start..]
}

pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Existing key, or a freshly generated one persisted for next time.
    pub fn user_key(&self) -> UserKey {
        if let Some(existing) = self.store.get_item(USER_KEY_SLOT)
            && !existing.is_empty()
        {
            return UserKey(existing);
        }

        let key = UserKey::generate();
        if let Err(err) = self.store.set_item(USER_KEY_SLOT, key.as_str()) {
            tracing::warn!(%err, "could not persist user key, using it for this session only");
        }
        key
    }

    pub fn load(&self, key: &UserKey) -> Vec<ChatMessage> {
        let Some(raw) = self.store.get_item(&history_slot(key)) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!(%err, user = %key, "discarding unreadable history");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored history with the newest `HISTORY_LIMIT` entries.
    pub fn save(&self, key: &UserKey, messages: &[ChatMessage]) -> Result<(), StorageError> {
        let kept = cap_history(messages);
        let raw = serde_json::to_string(kept)
            .map_err(|err| StorageError::Rejected(err.to_string()))?;
        self.store.set_item(&history_slot(key), &raw)?;
        tracing::debug!(user = %key, entries = kept.len(), "history saved");
        Ok(())
    }

    pub fn append(&self, key: &UserKey, message: ChatMessage) -> Result<(), StorageError> {
        let mut messages = self.load(key);
        messages.push(message);
        self.save(key, &messages)
    }
}
