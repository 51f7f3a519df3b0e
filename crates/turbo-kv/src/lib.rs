//! Type-safe local Key-Value storage for TurboCart.
//!
//! Provides a simple, ergonomic API for persisting data in a device-local
//! key-value store with automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_kv::{FileBackend, Store};
//! use std::sync::Arc;
//!
//! let store = Store::new(Arc::new(FileBackend::open("./data")?));
//!
//! // Store a value
//! store.set("cart:products", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = store.get("cart:products")?;
//!
//! // Delete a value
//! store.delete("cart:products")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::StorageError;
pub use kv::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileBackend, KvBackend, MemoryBackend, StorageError, Store};
}
