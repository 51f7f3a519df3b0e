//! The cart store: in-memory cart mirrored to a key-value store.

use std::sync::Arc;

use tracing::{debug, info, warn};
use turbo_kv::{StorageError, Store};

use crate::cart::{Cart, LineItem, NewLineItem};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::store::observer::{CartObserver, Observers, SubscriptionId};

/// Holds the session's cart and keeps the persisted copy in sync.
///
/// Every mutation builds a new cart from the current one, makes it the
/// in-memory state, writes the full cart under the configured key and then
/// notifies observers. Mutators take `&mut self`, so a store handle is the
/// single writer for its key.
///
/// Storage failures never surface from the mutators. A failed write leaves
/// the in-memory cart authoritative and is retried on the next mutation or
/// on `flush()`.
///
/// # Example
///
/// ```rust,ignore
/// let mut cart = CartStore::open(Store::in_memory(), CartConfig::default())?;
/// cart.add_to_cart(NewLineItem::new("p1", "Shirt", "https://img/p1", 10.0))?;
/// cart.increment("p1")?;
/// assert_eq!(cart.cart().get("p1").unwrap().quantity, 2);
/// ```
pub struct CartStore {
    store: Store,
    config: CartConfig,
    cart: Arc<Cart>,
    observers: Observers,
    pending_write: bool,
}

impl CartStore {
    /// Create a store with an empty cart, without reading storage.
    ///
    /// Use this to register observers before calling `load()`.
    pub fn new(store: Store, config: CartConfig) -> Result<Self, CartError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            cart: Arc::new(Cart::new()),
            observers: Observers::default(),
            pending_write: false,
        })
    }

    /// Create a store and hydrate it from storage.
    pub fn open(store: Store, config: CartConfig) -> Result<Self, CartError> {
        let mut cart_store = Self::new(store, config)?;
        cart_store.load();
        Ok(cart_store)
    }

    /// Hydrate the cart from storage, replacing the in-memory cart.
    ///
    /// A missing key yields an empty cart. A corrupt value is discarded and
    /// overwritten with the empty cart. A failed read yields an empty cart
    /// and leaves storage untouched.
    pub fn load(&mut self) -> Arc<Cart> {
        let key = self.config.storage_key.as_str();

        let cart = match self.store.get_raw(key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<LineItem>>(&raw) {
                Ok(items) => {
                    let (cart, dropped) = Cart::normalize(items);
                    if dropped > 0 {
                        warn!(key, dropped, "dropped invalid entries from persisted cart");
                        self.pending_write = true;
                    }
                    info!(key, items = cart.len(), "hydrated cart");
                    cart
                }
                Err(e) => {
                    warn!(key, error = %e, "discarding corrupt persisted cart");
                    self.pending_write = true;
                    Cart::new()
                }
            },
            Ok(None) => {
                info!(key, "no persisted cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted cart, starting empty");
                Cart::new()
            }
        };

        self.publish(cart)
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.cart)
    }

    /// Store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Check if the persisted cart matches the in-memory cart.
    pub fn is_synced(&self) -> bool {
        !self.pending_write
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart takes the new payload's fields and its
    /// quantity goes up by one. Calling this twice adds two units.
    pub fn add_to_cart(&mut self, item: NewLineItem) -> Result<Arc<Cart>, CartError> {
        let id = item.id.clone();
        let cart = self.cart.with_added(item, self.config.max_quantity)?;
        debug!(
            product_id = %id,
            quantity = ?cart.get(id.as_str()).map(|i| i.quantity),
            "added to cart"
        );
        Ok(self.commit(cart))
    }

    /// Raise a product's quantity by one. Unknown ids leave the cart as is.
    pub fn increment(&mut self, id: impl AsRef<str>) -> Result<Arc<Cart>, CartError> {
        let cart = self
            .cart
            .with_incremented(id.as_ref(), self.config.max_quantity)?;
        Ok(self.commit(cart))
    }

    /// Lower a product's quantity by one, removing it at zero.
    ///
    /// Unknown ids leave the cart as is.
    pub fn decrement(&mut self, id: impl AsRef<str>) -> Result<Arc<Cart>, CartError> {
        let id = id.as_ref();
        let cart = self
            .cart
            .with_decremented(id, self.config.decrement_order);
        if self.cart.contains(id) && !cart.contains(id) {
            debug!(product_id = id, "removed from cart");
        }
        Ok(self.commit(cart))
    }

    /// Remove a product regardless of quantity.
    pub fn remove(&mut self, id: impl AsRef<str>) -> Result<Arc<Cart>, CartError> {
        let cart = self.cart.without(id.as_ref());
        Ok(self.commit(cart))
    }

    /// Remove every item.
    pub fn clear(&mut self) -> Result<Arc<Cart>, CartError> {
        Ok(self.commit(Cart::new()))
    }

    /// Register an observer. It is called after every subsequent load and
    /// mutation.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: CartObserver + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Retry a pending write of the current cart.
    pub fn flush(&mut self) -> Result<(), CartError> {
        if !self.pending_write {
            return Ok(());
        }
        self.write_current()?;
        Ok(())
    }

    /// Flush and release the store.
    ///
    /// A failed flush is returned and not retried on drop.
    pub fn close(mut self) -> Result<(), CartError> {
        let result = self.flush();
        self.pending_write = false;
        result
    }

    fn commit(&mut self, cart: Cart) -> Arc<Cart> {
        self.pending_write = true;
        self.publish(cart)
    }

    fn publish(&mut self, cart: Cart) -> Arc<Cart> {
        self.cart = Arc::new(cart);
        if self.pending_write {
            // Failure is logged and kept pending.
            let _ = self.write_current();
        }
        self.observers.notify(&self.cart);
        Arc::clone(&self.cart)
    }

    fn write_current(&mut self) -> Result<(), StorageError> {
        let key = self.config.storage_key.as_str();
        match self.store.set(key, self.cart.as_ref()) {
            Ok(()) => {
                debug!(key, items = self.cart.len(), "persisted cart");
                self.pending_write = false;
                Ok(())
            }
            Err(e) => {
                warn!(key, error = %e, "failed to persist cart, will retry");
                Err(e)
            }
        }
    }
}

impl Drop for CartStore {
    fn drop(&mut self) {
        if self.pending_write {
            let _ = self.write_current();
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("cart", &self.cart)
            .field("observers", &self.observers)
            .field("pending_write", &self.pending_write)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecrementOrder;
    use parking_lot::Mutex;

    fn shirt() -> NewLineItem {
        NewLineItem::new("p1", "Shirt", "u", 10.0)
    }

    fn persisted(store: &Store) -> Cart {
        store.get("cart:products").unwrap().unwrap()
    }

    #[test]
    fn test_open_empty() {
        let cart_store = CartStore::open(Store::in_memory(), CartConfig::default()).unwrap();
        assert!(cart_store.cart().is_empty());
        assert!(cart_store.is_synced());
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = CartConfig::default().with_storage_key("");
        assert!(matches!(
            CartStore::open(Store::in_memory(), config),
            Err(CartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mutations_are_persisted() {
        let store = Store::in_memory();
        let mut cart_store = CartStore::open(store.clone(), CartConfig::default()).unwrap();

        cart_store.add_to_cart(shirt()).unwrap();
        cart_store.increment("p1").unwrap();
        assert_eq!(persisted(&store), *cart_store.cart());

        cart_store.decrement("p1").unwrap();
        assert_eq!(persisted(&store), *cart_store.cart());
        assert_eq!(cart_store.cart().get("p1").unwrap().quantity, 1);
    }

    #[test]
    fn test_each_mutation_yields_new_snapshot() {
        let mut cart_store = CartStore::open(Store::in_memory(), CartConfig::default()).unwrap();
        let before = cart_store.cart();
        let after = cart_store.increment("missing").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
        assert!(Arc::ptr_eq(&after, &cart_store.cart()));
    }

    #[test]
    fn test_observers_see_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut cart_store = CartStore::new(Store::in_memory(), CartConfig::default()).unwrap();

        let sink = Arc::clone(&seen);
        let id = cart_store.subscribe(move |cart: &Arc<Cart>| {
            sink.lock().push(cart.item_count());
        });

        cart_store.load();
        cart_store.add_to_cart(shirt()).unwrap();
        cart_store.add_to_cart(shirt()).unwrap();
        cart_store.decrement("p1").unwrap();
        assert!(cart_store.unsubscribe(id));
        cart_store.clear().unwrap();

        assert_eq!(*seen.lock(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_rejected_mutation_keeps_state() {
        let config = CartConfig::default().with_max_quantity(1);
        let mut cart_store = CartStore::open(Store::in_memory(), config).unwrap();
        let first = cart_store.add_to_cart(shirt()).unwrap();

        assert!(cart_store.add_to_cart(shirt()).is_err());
        assert!(cart_store.increment("p1").is_err());
        assert!(Arc::ptr_eq(&first, &cart_store.cart()));
    }

    #[test]
    fn test_decrement_order_from_config() {
        let config = CartConfig::default().with_decrement_order(DecrementOrder::MoveToEnd);
        let mut cart_store = CartStore::open(Store::in_memory(), config).unwrap();
        cart_store.add_to_cart(shirt()).unwrap();
        cart_store.add_to_cart(shirt()).unwrap();
        cart_store
            .add_to_cart(NewLineItem::new("p2", "Hat", "u", 5.0))
            .unwrap();

        let cart = cart_store.decrement("p1").unwrap();
        let ids: Vec<&str> = cart.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let store = Store::in_memory();
        let mut cart_store = CartStore::open(store.clone(), CartConfig::default()).unwrap();
        cart_store.add_to_cart(shirt()).unwrap();
        cart_store
            .add_to_cart(NewLineItem::new("p2", "Hat", "u", 5.0))
            .unwrap();

        cart_store.remove("p1").unwrap();
        assert!(!cart_store.cart().contains("p1"));

        cart_store.clear().unwrap();
        assert!(persisted(&store).is_empty());
    }
}
