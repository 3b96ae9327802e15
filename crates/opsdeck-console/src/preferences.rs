//! Per-user UI preference blobs
//!
//! Preferences are JSON blobs keyed by a fixed prefix plus the user id,
//! read and written synchronously against a pluggable backend (browser
//! local storage in the shipped console, in-memory here and in tests).
//! Corrupt or absent blobs are treated as empty, never thrown. Whether
//! preferences sync remotely instead of staying local-only is decided
//! at wiring time by the `remote_prefs` configuration flag.

use crate::error::ConsoleResult;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Fixed key prefix for preference blobs
pub const PREF_KEY_PREFIX: &str = "opsdeck.prefs.";

/// Synchronous key-value backend for preference blobs
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceBackend: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-memory backend, used for tests and as the local-only default
#[derive(Default)]
pub struct MemoryBackend {
    entries: DashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn write(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// A user's UI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// UI theme: "light", "dark" or "auto"
    pub theme: String,

    /// Whether the sidebar starts collapsed
    pub sidebar_collapsed: bool,

    /// Table page size across list screens
    pub rows_per_page: u32,

    /// Screen-specific settings keyed by view id
    pub custom: HashMap<String, Value>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            sidebar_collapsed: false,
            rows_per_page: 25,
            custom: HashMap::new(),
        }
    }
}

/// Preference store over a [`PreferenceBackend`]
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    fn key_for(user_id: &str) -> String {
        format!("{PREF_KEY_PREFIX}{user_id}")
    }

    /// Load a user's preferences. Absent or corrupt blobs yield the
    /// defaults.
    pub fn load(&self, user_id: &str) -> UserPreferences {
        let Some(raw) = self.backend.read(&Self::key_for(user_id)) else {
            return UserPreferences::default();
        };

        match serde_json::from_str(&raw) {
            Ok(preferences) => preferences,
            Err(error) => {
                warn!(user = user_id, %error, "corrupt preference blob, falling back to defaults");
                UserPreferences::default()
            }
        }
    }

    /// Persist a user's preferences as one JSON blob
    pub fn save(&self, user_id: &str, preferences: &UserPreferences) -> ConsoleResult<()> {
        let raw = serde_json::to_string(preferences)?;
        self.backend.write(&Self::key_for(user_id), raw);
        Ok(())
    }

    /// Remove a user's preference blob
    pub fn clear(&self, user_id: &str) {
        self.backend.remove(&Self::key_for(user_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PreferenceStore {
        PreferenceStore::new(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn test_absent_blob_yields_defaults() {
        let store = store();

        let preferences = store.load("user-1");
        assert_eq!(preferences, UserPreferences::default());
    }

    #[test]
    fn test_round_trip() {
        let store = store();
        let mut preferences = UserPreferences::default();
        preferences.theme = "dark".to_string();
        preferences.rows_per_page = 50;
        preferences.custom.insert("inventory_documents".to_string(), serde_json::json!({"sort": "date"}));

        store.save("user-1", &preferences).unwrap();
        assert_eq!(store.load("user-1"), preferences);

        // per-user keys do not leak across users
        assert_eq!(store.load("user-2"), UserPreferences::default());
    }

    #[test]
    fn test_corrupt_blob_yields_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write(&format!("{PREF_KEY_PREFIX}user-1"), "{not json".to_string());
        let store = PreferenceStore::new(backend);

        assert_eq!(store.load("user-1"), UserPreferences::default());
    }

    #[test]
    fn test_partial_blob_fills_missing_fields() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write(&format!("{PREF_KEY_PREFIX}user-1"), r#"{"theme":"dark"}"#.to_string());
        let store = PreferenceStore::new(backend);

        let preferences = store.load("user-1");
        assert_eq!(preferences.theme, "dark");
        assert_eq!(preferences.rows_per_page, 25);
    }

    #[test]
    fn test_clear_removes_blob() {
        let store = store();
        let mut preferences = UserPreferences::default();
        preferences.sidebar_collapsed = true;

        store.save("user-1", &preferences).unwrap();
        store.clear("user-1");

        assert_eq!(store.load("user-1"), UserPreferences::default());
    }
}
