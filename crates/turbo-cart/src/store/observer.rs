//! Change notification for cart consumers.

use std::fmt;
use std::sync::Arc;

use crate::cart::Cart;

/// Observer trait for cart changes.
///
/// Called synchronously after every load and mutation with the new snapshot.
/// Consumers can compare snapshots with `Arc::ptr_eq` to detect change.
pub trait CartObserver: Send + Sync {
    /// Called when the cart is replaced.
    fn on_change(&self, cart: &Arc<Cart>);
}

impl<F> CartObserver for F
where
    F: Fn(&Arc<Cart>) + Send + Sync,
{
    fn on_change(&self, cart: &Arc<Cart>) {
        self(cart)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < len_before
    }

    pub(crate) fn notify(&self, cart: &Arc<Cart>) {
        for (_, observer) in &self.entries {
            observer.on_change(cart);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
