//! # Local Storage
//!
//! A string key-value store in the shape of browser `localStorage`.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      LocalStorage (trait)                               │
//! │          get_item(key)  set_item(key, value)  remove_item(key)          │
//! │                                                                         │
//! │        ┌────────────────────────┐      ┌────────────────────────┐       │
//! │        │     SqliteStorage      │      │     MemoryStorage      │       │
//! │        │  (sqlite.rs, durable)  │      │  (this file, tests &   │       │
//! │        │  local_storage table   │      │   ephemeral sessions)  │       │
//! │        └────────────────────────┘      └────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};

/// Durable string key-value storage.
///
/// Implementations are moved into background tasks, so they must be
/// `Send + Sync + 'static`.
pub trait LocalStorage: Send + Sync + 'static {
    /// Reads a value. Missing keys are `Ok(None)`.
    fn get_item(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Writes a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Deletes a key. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-memory storage. Clones share the same map.
///
/// Counts writes so tests can check how many hit storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Number of `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Synchronous read, for assertions.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.items.get(key).cloned())
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut MemoryInner) -> T) -> StoreResult<T> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Internal("Mutex lock failed".into()))?;
        Ok(f(&mut inner))
    }
}

impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_inner(|inner| inner.items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.with_inner(|inner| {
            inner.items.insert(key.to_string(), value.to_string());
            inner.writes += 1;
        })
    }

    async fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.with_inner(|inner| {
            inner.items.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").await.unwrap(), None);

        storage.set_item("k", "v1").await.unwrap();
        storage.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.write_count(), 2);

        storage.remove_item("k").await.unwrap();
        storage.remove_item("k").await.unwrap();
        assert_eq!(storage.peek("k"), None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("nox-customer-info", "{}").await.unwrap();
        assert_eq!(other.peek("nox-customer-info").as_deref(), Some("{}"));
    }
}
