//! Cart store, observers and session-scoped provider.

mod cart_store;
mod observer;
mod provider;

pub use cart_store::CartStore;
pub use observer::{CartObserver, SubscriptionId};
pub use provider::CartProvider;
