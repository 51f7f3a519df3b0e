//! Persistent shopping cart state container for TurboCart.
//!
//! The cart lives in memory for the duration of a session and is mirrored,
//! as a JSON array, to a key-value store after every change:
//!
//! - **Cart**: ordered line items, one per product, rebuilt on every change
//! - **CartStore**: load/add/increment/decrement with persistence and
//!   change notification
//! - **CartProvider**: session-scoped access to a store
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//! use turbo_kv::{FileBackend, Store};
//! use std::sync::Arc;
//!
//! let store = Store::new(Arc::new(FileBackend::open("./data")?));
//! let mut provider = CartProvider::new(store, CartConfig::default())?;
//! let cart = provider.activate()?;
//!
//! cart.subscribe(|cart: &Arc<Cart>| println!("{} items", cart.item_count()));
//! cart.add_to_cart(NewLineItem::new("p1", "Shirt", "https://img/p1", 10.0))?;
//! cart.decrement("p1")?;
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod store;

pub use cart::{Cart, LineItem, NewLineItem};
pub use config::{CartConfig, DecrementOrder, DEFAULT_STORAGE_KEY};
pub use error::CartError;
pub use ids::ProductId;
pub use store::{CartObserver, CartProvider, CartStore, SubscriptionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, LineItem, NewLineItem};
    pub use crate::config::{CartConfig, DecrementOrder};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::store::{CartObserver, CartProvider, CartStore, SubscriptionId};
}
