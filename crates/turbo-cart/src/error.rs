//! Cart error types.

use thiserror::Error;
use turbo_kv::StorageError;

/// Errors that can occur in cart operations.
///
/// Storage failures during mutations are logged and retried rather than
/// returned; only usage-contract violations surface from the mutators.
#[derive(Error, Debug)]
pub enum CartError {
    /// Product id is empty.
    #[error("Invalid product id: {0:?}")]
    InvalidProductId(String),

    /// Price is NaN or infinite and cannot be persisted.
    #[error("Invalid price for {0}")]
    InvalidPrice(String),

    /// Quantity would overflow.
    #[error("Quantity overflow for {0}")]
    QuantityOverflow(String),

    /// Quantity exceeds the configured maximum.
    #[error("Quantity {quantity} for {product_id} exceeds maximum allowed ({max})")]
    QuantityExceedsLimit {
        product_id: String,
        quantity: u32,
        max: u32,
    },

    /// Cart accessed while no session is active.
    #[error("Cart accessed outside an active session")]
    NoActiveSession,

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::InvalidConfig(e.to_string())
    }
}
