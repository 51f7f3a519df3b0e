//! Cart collection and its update rules.
//!
//! A `Cart` is never mutated in place: every operation returns a new cart
//! built from the previous one. The store wraps each result in a fresh `Arc`.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::cart::{LineItem, NewLineItem};
use crate::config::DecrementOrder;
use crate::error::CartError;

/// An ordered collection of line items, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw items, dropping zero-quantity entries and
    /// duplicate ids (first occurrence wins).
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self::normalize(items).0
    }

    /// Like `from_items`, also returning how many entries were discarded.
    pub fn normalize(items: Vec<LineItem>) -> (Self, usize) {
        let total = items.len();
        let mut seen = HashSet::with_capacity(total);
        let items: Vec<LineItem> = items
            .into_iter()
            .filter(|item| item.quantity > 0 && !item.id.is_empty())
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        let dropped = total - items.len();
        (Self { items }, dropped)
    }

    /// Items in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over items in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Get an item by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Cart with one more unit of `item`.
    ///
    /// An existing line takes the payload's fields and its quantity goes up
    /// by one; otherwise the item is appended with quantity 1.
    pub fn with_added(&self, item: NewLineItem, max: Option<u32>) -> Result<Cart, CartError> {
        if item.id.is_empty() {
            return Err(CartError::InvalidProductId(item.id.into_inner()));
        }
        if !item.price.is_finite() {
            return Err(CartError::InvalidPrice(item.id.into_inner()));
        }

        let Some(existing) = self.get(item.id.as_str()) else {
            let mut items = self.items.clone();
            items.push(item.with_quantity(1));
            return Ok(Self { items });
        };

        let quantity = next_quantity(existing, max)?;
        let updated = item.with_quantity(quantity);
        Ok(self.replacing(&updated))
    }

    /// Cart with the matching item's quantity raised by one.
    ///
    /// An unknown id yields an equal cart.
    pub fn with_incremented(&self, id: &str, max: Option<u32>) -> Result<Cart, CartError> {
        match self.get(id) {
            Some(existing) => {
                let quantity = next_quantity(existing, max)?;
                Ok(self.replacing(&existing.with_quantity(quantity)))
            }
            None => Ok(self.clone()),
        }
    }

    /// Cart with the matching item's quantity lowered by one.
    ///
    /// An item at quantity 1 is removed. An unknown id yields an equal cart.
    pub fn with_decremented(&self, id: &str, order: DecrementOrder) -> Cart {
        let Some(existing) = self.get(id) else {
            return self.clone();
        };
        if existing.quantity <= 1 {
            return self.without(id);
        }

        let updated = existing.with_quantity(existing.quantity - 1);
        match order {
            DecrementOrder::Preserve => self.replacing(&updated),
            DecrementOrder::MoveToEnd => {
                let mut items: Vec<LineItem> = self
                    .items
                    .iter()
                    .filter(|i| i.id.as_str() != id)
                    .cloned()
                    .collect();
                items.push(updated);
                Self { items }
            }
        }
    }

    /// Cart without the matching item.
    pub fn without(&self, id: &str) -> Cart {
        Self {
            items: self
                .items
                .iter()
                .filter(|i| i.id.as_str() != id)
                .cloned()
                .collect(),
        }
    }

    fn replacing(&self, updated: &LineItem) -> Cart {
        Self {
            items: self
                .items
                .iter()
                .map(|i| {
                    if i.id == updated.id {
                        updated.clone()
                    } else {
                        i.clone()
                    }
                })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<LineItem>::deserialize(deserializer).map(Cart::from_items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn next_quantity(item: &LineItem, max: Option<u32>) -> Result<u32, CartError> {
    let quantity = item
        .quantity
        .checked_add(1)
        .ok_or_else(|| CartError::QuantityOverflow(item.id.to_string()))?;

    match max {
        Some(max) if quantity > max => Err(CartError::QuantityExceedsLimit {
            product_id: item.id.to_string(),
            quantity,
            max,
        }),
        _ => Ok(quantity),
    }
}
