//! Cart store configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CartError;

/// Default storage key for the persisted cart.
pub const DEFAULT_STORAGE_KEY: &str = "cart:products";

/// Where a decremented item ends up in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecrementOrder {
    /// Item keeps its position.
    #[default]
    Preserve,
    /// Item is moved behind all other items (legacy layout).
    MoveToEnd,
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key the cart is persisted under. Owned exclusively by the store.
    pub storage_key: String,

    /// Ordering of decremented items.
    pub decrement_order: DecrementOrder,

    /// Optional per-item quantity cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            decrement_order: DecrementOrder::default(),
            max_quantity: None,
        }
    }
}

impl CartConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        Ok(config)
    }

    /// Parse and validate a TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, CartError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(content: &str) -> Result<Self, CartError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| CartError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the decrement ordering.
    pub fn with_decrement_order(mut self, order: DecrementOrder) -> Self {
        self.decrement_order = order;
        self
    }

    /// Set the per-item quantity cap.
    pub fn with_max_quantity(mut self, max: u32) -> Self {
        self.max_quantity = Some(max);
        self
    }

    /// Check the config for values the store cannot work with.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::InvalidConfig(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.max_quantity == Some(0) {
            return Err(CartError::InvalidConfig(
                "max_quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "cart:products");
        assert_eq!(config.decrement_order, DecrementOrder::Preserve);
        assert_eq!(config.max_quantity, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_toml_partial() {
        let config = CartConfig::from_toml_str(r#"decrement_order = "move_to_end""#).unwrap();
        assert_eq!(config.decrement_order, DecrementOrder::MoveToEnd);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_toml_full() {
        let config = CartConfig::from_toml_str(
            r#"
            storage_key = "@GoMarketPlace:products"
            decrement_order = "preserve"
            max_quantity = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.storage_key, "@GoMarketPlace:products");
        assert_eq!(config.max_quantity, Some(10));
    }

    #[test]
    fn test_json() {
        let config = CartConfig::from_json_str(r#"{"max_quantity": 3}"#).unwrap();
        assert_eq!(config.max_quantity, Some(3));
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            CartConfig::from_toml_str(r#"storage_key = "  ""#),
            Err(CartError::InvalidConfig(_))
        ));
        assert!(matches!(
            CartConfig::from_toml_str("max_quantity = 0"),
            Err(CartError::InvalidConfig(_))
        ));
        assert!(matches!(
            CartConfig::from_toml_str(r#"decrement_order = "sideways""#),
            Err(CartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let toml_path = dir.path().join("cart.toml");
        std::fs::write(&toml_path, "max_quantity = 5\n").unwrap();
        assert_eq!(CartConfig::load(&toml_path).unwrap().max_quantity, Some(5));

        let json_path = dir.path().join("cart.json");
        std::fs::write(&json_path, r#"{"storage_key": "k"}"#).unwrap();
        assert_eq!(CartConfig::load(&json_path).unwrap().storage_key, "k");

        assert!(CartConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
