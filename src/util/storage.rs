//! Durable key-value persistence for session and tenant state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session manager and the tenant selection store both persist through a
//! shared [`PersistedStore`], each under its own disjoint set of
//! [`StorageKey`]s. In the browser the backend is `localStorage`; natively
//! (tests, non-`csr` builds) it is an in-memory map.
//!
//! ERROR HANDLING
//! ==============
//! Corrupted values are healed in place: [`PersistedStore::read_parsed`]
//! deletes any key whose contents fail to decode and reports it as absent.
//! Callers never see decode errors.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error returned when a value cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage backend rejected write for {key}: {reason}")]
    Backend { key: String, reason: String },
    #[error("storage is not available")]
    Unavailable,
}

/// The stable set of persisted keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AuthToken,
    User,
    RememberedEmail,
    SelectedTenantId,
    SelectedTenant,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::AuthToken,
        StorageKey::User,
        StorageKey::RememberedEmail,
        StorageKey::SelectedTenantId,
        StorageKey::SelectedTenant,
    ];

    /// Raw key name, before any configured prefix is applied.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthToken => "token",
            Self::User => "user",
            Self::RememberedEmail => "rememberedEmail",
            Self::SelectedTenantId => "selectedLibraryId",
            Self::SelectedTenant => "selectedLibrary",
        }
    }
}

/// Raw string storage underneath a [`PersistedStore`].
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend refuses the write
    /// (quota exceeded, storage disabled).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// Process-local backend used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Browser `localStorage` backend.
///
/// The storage handle is looked up on every call rather than cached so the
/// backend stays `Send + Sync` and tolerates storage being disabled mid-session.
#[cfg(feature = "csr")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
impl BrowserStorage {
    fn handle() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "csr")]
impl StorageBackend for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::handle()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::handle().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StorageError::Backend {
            key: key.to_owned(),
            reason: format!("{e:?}"),
        })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::handle() {
            let _ = storage.remove_item(key);
        }
    }
}

/// JSON-safe view over a [`StorageBackend`], shared by the state managers.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn StorageBackend>,
    prefix: Arc<str>,
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_prefix(backend, "")
    }

    pub fn with_prefix(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        Self { backend, prefix: Arc::from(prefix) }
    }

    /// Fresh store over a private [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store over `localStorage`.
    #[cfg(feature = "csr")]
    pub fn browser(prefix: &str) -> Self {
        Self::with_prefix(Arc::new(BrowserStorage), prefix)
    }

    /// Full backend key for `key`, including the configured prefix.
    pub fn qualified_key(&self, key: StorageKey) -> String {
        format!("{}{}", self.prefix, key.as_str())
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization fails or the backend
    /// rejects the write. Nothing is stored in either case.
    pub fn write<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        let qualified = self.qualified_key(key);
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: qualified.clone(),
            source,
        })?;
        self.backend.set(&qualified, &raw)
    }

    /// Raw stored text for `key`, if any.
    pub fn read(&self, key: StorageKey) -> Option<String> {
        self.backend.get(&self.qualified_key(key))
    }

    /// Decode the value stored under `key`.
    ///
    /// A value that fails to decode is treated as corruption: the key is
    /// deleted and `None` is returned.
    pub fn read_parsed<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                leptos::logging::warn!("discarding corrupted {}: {e}", self.qualified_key(key));
                self.remove(key);
                None
            }
        }
    }

    /// Delete `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: StorageKey) {
        self.backend.remove(&self.qualified_key(key));
    }

    pub fn contains(&self, key: StorageKey) -> bool {
        self.read(key).is_some()
    }
}
