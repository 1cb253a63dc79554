//! Checkout pricing rules: tax rate and shipping fee.

use rust_decimal::Decimal;
use serde::Serialize;

use stride_core::{CurrencyCode, Price};

use crate::config::ConfigError;

/// Default sales tax rate (8%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Default flat shipping fee in cents.
pub const DEFAULT_FLAT_SHIPPING_CENTS: i64 = 1_000;

/// Default subtotal in cents at or above which shipping is free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 10_000;

/// Tax and shipping configuration for the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    tax_rate: Decimal,
    flat_shipping: Price,
    free_shipping_threshold: Price,
    currency: CurrencyCode,
}

impl PricingConfig {
    /// Create a pricing configuration.
    ///
    /// Amounts are in minor units of `currency`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPricing` if the tax rate is outside
    /// `[0, 1]` or either amount is negative.
    pub fn new(
        tax_rate: Decimal,
        flat_shipping_minor: i64,
        free_shipping_threshold_minor: i64,
        currency: CurrencyCode,
    ) -> Result<Self, ConfigError> {
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidPricing(format!(
                "tax rate must be between 0 and 1 (got {tax_rate})"
            )));
        }
        if flat_shipping_minor < 0 || free_shipping_threshold_minor < 0 {
            return Err(ConfigError::InvalidPricing(
                "shipping amounts cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            tax_rate,
            flat_shipping: Price::from_minor(flat_shipping_minor, currency),
            free_shipping_threshold: Price::from_minor(free_shipping_threshold_minor, currency),
            currency,
        })
    }

    /// Tax rate applied to the subtotal.
    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Fee charged when the subtotal is below the threshold.
    #[must_use]
    pub const fn flat_shipping(&self) -> Price {
        self.flat_shipping
    }

    /// Subtotal at or above which shipping is free.
    #[must_use]
    pub const fn free_shipping_threshold(&self) -> Price {
        self.free_shipping_threshold
    }

    /// Currency every cart amount is expressed in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Tax owed on `subtotal`, rounded to the cent.
    #[must_use]
    pub fn taxes_for(&self, subtotal: Price) -> Price {
        // The rate is within [0, 1], so the result never exceeds the subtotal.
        subtotal.apply_rate(self.tax_rate).unwrap_or(subtotal)
    }

    /// Shipping fee for a cart with the given subtotal.
    ///
    /// An empty cart ships for free.
    #[must_use]
    pub const fn shipping_for(&self, subtotal: Price, is_empty: bool) -> Price {
        if is_empty || subtotal.amount_minor >= self.free_shipping_threshold.amount_minor {
            Price::zero(self.currency)
        } else {
            self.flat_shipping
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            flat_shipping: Price::usd_cents(DEFAULT_FLAT_SHIPPING_CENTS),
            free_shipping_threshold: Price::usd_cents(DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS),
            currency: CurrencyCode::USD,
        }
    }
}

/// Everything the checkout sidebar shows for one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub total_items: u64,
    pub subtotal: Price,
    pub taxes: Price,
    pub shipping: Price,
    pub total: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tax_rate_is_eight_percent() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::new(8, 2));
    }

    #[test]
    fn test_rejects_out_of_range_tax_rate() {
        assert!(PricingConfig::new(Decimal::new(-1, 2), 0, 0, CurrencyCode::USD).is_err());
        assert!(PricingConfig::new(Decimal::new(101, 2), 0, 0, CurrencyCode::USD).is_err());
        assert!(PricingConfig::new(Decimal::ONE, 0, 0, CurrencyCode::USD).is_ok());
    }

    #[test]
    fn test_rejects_negative_shipping() {
        assert!(PricingConfig::new(Decimal::ZERO, -1, 0, CurrencyCode::USD).is_err());
    }

    #[test]
    fn test_shipping_rules() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.shipping_for(Price::usd_cents(0), true),
            Price::usd_cents(0)
        );
        assert_eq!(
            pricing.shipping_for(Price::usd_cents(9_999), false),
            Price::usd_cents(1_000)
        );
        assert_eq!(
            pricing.shipping_for(Price::usd_cents(10_000), false),
            Price::usd_cents(0)
        );
    }

    #[test]
    fn test_taxes() {
        let pricing = PricingConfig::default();
        assert_eq!(pricing.taxes_for(Price::usd_cents(20_000)), Price::usd_cents(1_600));
        assert_eq!(pricing.taxes_for(Price::usd_cents(0)), Price::usd_cents(0));
    }
}
