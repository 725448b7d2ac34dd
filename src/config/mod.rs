// src/config/mod.rs
//
// Store configuration
//
// PRINCIPLES:
// - One explicit load at start-up
// - Every field has a default, a missing file is not an error
// - No hidden environment lookups outside `load`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV_VAR: &str = "STOREFRONT_CONFIG";

const APP_DIR_NAME: &str = "storefront";
const DATABASE_FILE_NAME: &str = "storefront.db";
const CONFIG_FILE_NAME: &str = "config.json";

/// Shipping fee rules applied to cart and checkout totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingRules {
    /// Fee charged below the free shipping threshold
    pub flat_fee_cents: i64,

    /// Subtotal at or above which shipping is free
    pub free_over_cents: i64,
}

impl Default for ShippingRules {
    fn default() -> Self {
        Self {
            flat_fee_cents: 499,
            free_over_cents: 5000,
        }
    }
}

impl ShippingRules {
    /// Shipping fee for a given subtotal. An empty cart ships for free.
    pub fn shipping_for(&self, subtotal_cents: i64) -> i64 {
        if subtotal_cents <= 0 || subtotal_cents >= self.free_over_cents {
            0
        } else {
            self.flat_fee_cents
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Explicit database file. Defaults to {APP_DATA}/storefront/storefront.db
    pub database_path: Option<PathBuf>,

    pub pool_max_size: u32,

    pub busy_timeout_ms: u32,

    pub shipping: ShippingRules,

    /// Lifetime of a login session
    pub session_ttl_hours: i64,

    /// Notifications older than this are removed by `prune`
    pub notification_retention_days: i64,

    /// ISO currency code used when formatting money for the UI
    pub currency: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            pool_max_size: 8,
            busy_timeout_ms: 5000,
            shipping: ShippingRules::default(),
            session_ttl_hours: 24 * 30,
            notification_retention_days: 90,
            currency: "USD".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration.
    ///
    /// Lookup order:
    /// 1. File named by `STOREFRONT_CONFIG`
    /// 2. {APP_DATA}/storefront/config.json, if present
    /// 3. Defaults
    pub fn load() -> AppResult<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            log::info!("Loading config from {}", explicit);
            return Self::from_file(Path::new(&explicit));
        }

        if let Some(data_dir) = dirs::data_dir() {
            let default_file = data_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
            if default_file.exists() {
                log::info!("Loading config from {}", default_file.display());
                return Self::from_file(&default_file);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let config: StoreConfig = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.pool_max_size == 0 {
            return Err(AppError::Config("pool_max_size must be at least 1".to_string()));
        }
        if self.session_ttl_hours <= 0 {
            return Err(AppError::Config("session_ttl_hours must be positive".to_string()));
        }
        if self.shipping.flat_fee_cents < 0 || self.shipping.free_over_cents < 0 {
            return Err(AppError::Config("shipping amounts cannot be negative".to_string()));
        }
        Ok(())
    }

    /// Resolve the database file path, falling back to the app data directory.
    pub fn resolve_database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let app_data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

        Ok(app_data_dir.join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.pool_max_size, 8);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.shipping.flat_fee_cents, 499);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = StoreConfig::from_json_str(
            r#"{ "currency": "EUR", "shipping": { "flat_fee_cents": 299 } }"#,
        )
        .unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.shipping.flat_fee_cents, 299);
        assert_eq!(config.shipping.free_over_cents, 5000);
        assert_eq!(config.session_ttl_hours, 720);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = StoreConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let result = StoreConfig::from_json_str(r#"{ "pool_max_size": 0 }"#);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = StoreConfig {
            database_path: Some(PathBuf::from("/tmp/shop.db")),
            ..StoreConfig::default()
        };
        assert_eq!(config.resolve_database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
    }

    #[test]
    fn test_shipping_rules() {
        let rules = ShippingRules::default();
        assert_eq!(rules.shipping_for(0), 0);
        assert_eq!(rules.shipping_for(1200), 499);
        assert_eq!(rules.shipping_for(5000), 0);
        assert_eq!(rules.shipping_for(9000), 0);
    }
}
