//! Shopping cart module.
//!
//! Contains the cart collection and line item types.

#[allow(clippy::module_inception)]
mod cart;
mod item;

pub use cart::Cart;
pub use item::{LineItem, NewLineItem};
