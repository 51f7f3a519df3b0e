//! Key-Value store wrapper with automatic serialization.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{KvBackend, MemoryBackend, StorageError};

/// Type-safe store over a shared `KvBackend`.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning a `Store` shares the backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Open a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Get the underlying backend.
    pub fn backend(&self) -> &Arc<dyn KvBackend> {
        &self.backend
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let items: Option<Vec<LineItem>> = store.get("cart:products")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// store.set("cart:products", &items)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// Get the raw string stored at `key`.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key)
    }

    /// Store a raw string at `key`.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value)
    }

    /// Delete a value from the store.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the store.
    pub fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.backend.exists(key)
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.backend.keys()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// Helper to build store keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = store_key!("cart", "products");
/// // Returns "cart:products"
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        count: u32,
    }

    #[test]
    fn test_typed_round_trip() {
        let store = Store::in_memory();
        let entries = vec![Entry {
            id: "a".into(),
            count: 2,
        }];
        store.set("entries", &entries).unwrap();

        let loaded: Vec<Entry> = store.get("entries").unwrap().unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(
            store.get_raw("entries").unwrap().as_deref(),
            Some(r#"[{"id":"a","count":2}]"#)
        );
    }

    #[test]
    fn test_get_missing() {
        let store = Store::in_memory();
        let value: Option<Vec<Entry>> = store.get("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_get_malformed() {
        let store = Store::in_memory();
        store.set_raw("entries", "{not json").unwrap();
        let result: Result<Option<Vec<Entry>>, _> = store.get("entries");
        assert!(matches!(result, Err(StorageError::SerializeError(_))));
    }

    #[test]
    fn test_clones_share_backend() {
        let store = Store::in_memory();
        let other = store.clone();
        store.set_raw("k", "v").unwrap();
        assert!(other.exists("k").unwrap());
        other.delete("k").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_store_key_macro() {
        assert_eq!(store_key!("cart", "products"), "cart:products");
        assert_eq!(store_key!("cart", "user", 42), "cart:user:42");
    }
}
