//! Type-safe price representation in integer minor units.
//!
//! Amounts are stored as `i64` cents so line totals and subtotals are exact.
//! Decimal arithmetic is only used at the edges: converting a major-unit
//! amount (e.g. `19.99`) coming from the catalog, and applying a tax rate.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Errors that can occur when constructing or combining a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        left: CurrencyCode,
        right: CurrencyCode,
    },
    /// The amount does not fit in `i64` minor units.
    #[error("amount out of range")]
    Overflow,
    /// A price was negative.
    #[error("price cannot be negative (got {0} minor units)")]
    Negative(i64),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub amount_minor: i64,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a price from minor units (cents).
    #[must_use]
    pub const fn from_minor(amount_minor: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount_minor,
            currency_code,
        }
    }

    /// Create a price from minor units, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount_minor` is below zero.
    pub const fn try_from_minor(
        amount_minor: i64,
        currency_code: CurrencyCode,
    ) -> Result<Self, PriceError> {
        if amount_minor < 0 {
            return Err(PriceError::Negative(amount_minor));
        }
        Ok(Self::from_minor(amount_minor, currency_code))
    }

    /// Create a USD price from cents.
    #[must_use]
    pub const fn usd_cents(amount_minor: i64) -> Self {
        Self::from_minor(amount_minor, CurrencyCode::USD)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::from_minor(0, currency_code)
    }

    /// Convert a major-unit amount (e.g. dollars) into minor units.
    ///
    /// Fractions of a cent are rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the amount does not fit in `i64` cents.
    pub fn from_major(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::from_minor(round_to_i64(minor)?, currency_code))
    }

    /// Amount in major units (e.g. `19.99`).
    #[must_use]
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.amount_minor, 2)
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if the currencies differ and
    /// `PriceError::Overflow` if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        let amount_minor = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::from_minor(amount_minor, self.currency_code))
    }

    /// Multiply by a quantity, saturating at the `i64` bounds.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self::from_minor(
            self.amount_minor.saturating_mul(i64::from(quantity.get())),
            self.currency_code,
        )
    }

    /// Multiply by a rate (e.g. a tax rate of `0.08`), rounding to the cent.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the result does not fit.
    pub fn apply_rate(self, rate: Decimal) -> Result<Self, PriceError> {
        let scaled = Decimal::from(self.amount_minor)
            .checked_mul(rate)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::from_minor(round_to_i64(scaled)?, self.currency_code))
    }
}

fn round_to_i64(value: Decimal) -> Result<i64, PriceError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PriceError::Overflow)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        write!(
            f,
            "{sign}{}{}.{:02}",
            self.currency_code.symbol(),
            abs / 100,
            abs % 100
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_rounds_half_away_from_zero() {
        let price = Price::from_major(Decimal::new(19_995, 3), CurrencyCode::USD).unwrap();
        assert_eq!(price.amount_minor, 2000);

        let price = Price::from_major(Decimal::new(1999, 2), CurrencyCode::USD).unwrap();
        assert_eq!(price.amount_minor, 1999);
    }

    #[test]
    fn test_try_from_minor_rejects_negative() {
        assert_eq!(
            Price::try_from_minor(-5_000, CurrencyCode::USD),
            Err(PriceError::Negative(-5_000))
        );
        assert_eq!(
            Price::try_from_minor(0, CurrencyCode::USD),
            Ok(Price::usd_cents(0))
        );
    }

    #[test]
    fn test_to_major() {
        assert_eq!(Price::usd_cents(12_345).to_major(), Decimal::new(12_345, 2));
    }

    #[test]
    fn test_checked_add_same_currency() {
        let sum = Price::usd_cents(150).checked_add(Price::usd_cents(50)).unwrap();
        assert_eq!(sum, Price::usd_cents(200));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let eur = Price::from_minor(100, CurrencyCode::EUR);
        assert!(matches!(
            Price::usd_cents(100).checked_add(eur),
            Err(PriceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(
            Price::usd_cents(i64::MAX).checked_add(Price::usd_cents(1)),
            Err(PriceError::Overflow)
        );
    }

    #[test]
    fn test_times_quantity() {
        let line = Price::usd_cents(10_000).times(Quantity::new(2).unwrap());
        assert_eq!(line.amount_minor, 20_000);
    }

    #[test]
    fn test_apply_rate_rounds_to_cent() {
        // 8% of $12.55 = 100.4 cents
        let tax = Price::usd_cents(1255).apply_rate(Decimal::new(8, 2)).unwrap();
        assert_eq!(tax.amount_minor, 100);

        // 8% of $0.31 = 2.48 cents
        assert_eq!(
            Price::usd_cents(31)
                .apply_rate(Decimal::new(8, 2))
                .unwrap()
                .amount_minor,
            2
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::usd_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::usd_cents(5).to_string(), "$0.05");
        assert_eq!(Price::usd_cents(-250).to_string(), "-$2.50");
        assert_eq!(Price::from_minor(100, CurrencyCode::GBP).to_string(), "£1.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Price::usd_cents(1999)).unwrap();
        assert_eq!(json["amountMinor"], 1999);
        assert_eq!(json["currencyCode"], "USD");
    }
}
