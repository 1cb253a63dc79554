//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STRIDE_DATA_DIR` - Directory holding persisted store state (default: `.stride`)
//! - `STRIDE_TAX_RATE` - Sales tax rate as a decimal fraction (default: 0.08)
//! - `STRIDE_FLAT_SHIPPING_CENTS` - Shipping fee below the threshold (default: 1000)
//! - `STRIDE_FREE_SHIPPING_THRESHOLD_CENTS` - Subtotal for free shipping (default: 10000)
//! - `STRIDE_RECENTLY_VIEWED_MAX` - Products remembered per user (default: 10)
//! - `STRIDE_CURRENCY` - ISO 4217 code for cart amounts (default: USD)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use stride_core::CurrencyCode;

use crate::pricing::{
    DEFAULT_FLAT_SHIPPING_CENTS, DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS, DEFAULT_TAX_RATE,
    PricingConfig,
};
use crate::stores::RECENTLY_VIEWED_DEFAULT_MAX;

const DEFAULT_DATA_DIR: &str = ".stride";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid pricing configuration: {0}")]
    InvalidPricing(String),
}

/// Storefront store configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for file-backed storage
    pub data_dir: PathBuf,
    /// Tax and shipping rules
    pub pricing: PricingConfig,
    /// Recently-viewed bound used when no state is persisted yet
    pub recently_viewed_max: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pricing: PricingConfig::default(),
            recently_viewed_max: RECENTLY_VIEWED_DEFAULT_MAX,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed or is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("STRIDE_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let tax_rate: Decimal = parse_or(&lookup, "STRIDE_TAX_RATE", DEFAULT_TAX_RATE)?;
        let flat_shipping: i64 =
            parse_or(&lookup, "STRIDE_FLAT_SHIPPING_CENTS", DEFAULT_FLAT_SHIPPING_CENTS)?;
        let threshold: i64 = parse_or(
            &lookup,
            "STRIDE_FREE_SHIPPING_THRESHOLD_CENTS",
            DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS,
        )?;
        let currency: CurrencyCode = parse_or(&lookup, "STRIDE_CURRENCY", CurrencyCode::USD)?;
        let pricing = PricingConfig::new(tax_rate, flat_shipping, threshold, currency)?;

        let recently_viewed_max: usize = parse_or(
            &lookup,
            "STRIDE_RECENTLY_VIEWED_MAX",
            RECENTLY_VIEWED_DEFAULT_MAX,
        )?;
        if recently_viewed_max == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STRIDE_RECENTLY_VIEWED_MAX".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            pricing,
            recently_viewed_max,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
