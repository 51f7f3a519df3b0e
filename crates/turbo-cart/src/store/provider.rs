//! Session-scoped access to a cart store.

use turbo_kv::Store;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::store::CartStore;

/// Owns the storage handle and configuration for a session and hands out
/// the cart store while the session is active.
///
/// Accessing the cart before `activate()` or after `deactivate()` is a usage
/// error and returns `CartError::NoActiveSession`.
///
/// # Example
///
/// ```rust,ignore
/// let mut provider = CartProvider::new(store, CartConfig::default())?;
/// provider.activate()?;
///
/// provider.cart_mut()?.increment("p1")?;
/// let items = provider.cart()?.cart();
///
/// provider.deactivate()?;
/// ```
#[derive(Debug)]
pub struct CartProvider {
    store: Store,
    config: CartConfig,
    active: Option<CartStore>,
}

impl CartProvider {
    /// Create an inactive provider.
    pub fn new(store: Store, config: CartConfig) -> Result<Self, CartError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            active: None,
        })
    }

    /// Start the session, hydrating the cart on first activation.
    ///
    /// Activating an active provider returns the existing store.
    pub fn activate(&mut self) -> Result<&mut CartStore, CartError> {
        if self.active.is_none() {
            let cart_store = CartStore::open(self.store.clone(), self.config.clone())?;
            self.active = Some(cart_store);
        }
        self.cart_mut()
    }

    /// Check if a session is active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The active cart store.
    pub fn cart(&self) -> Result<&CartStore, CartError> {
        self.active.as_ref().ok_or(CartError::NoActiveSession)
    }

    /// The active cart store, for mutation.
    pub fn cart_mut(&mut self) -> Result<&mut CartStore, CartError> {
        self.active.as_mut().ok_or(CartError::NoActiveSession)
    }

    /// End the session, flushing any pending write.
    ///
    /// If the flush fails the session stays active so the in-memory cart is
    /// kept and deactivation can be retried. Deactivating an inactive
    /// provider is a no-op.
    pub fn deactivate(&mut self) -> Result<(), CartError> {
        if let Some(cart_store) = self.active.as_mut() {
            cart_store.flush()?;
        }
        match self.active.take() {
            Some(cart_store) => cart_store.close(),
            None => Ok(()),
        }
    }
}
