//! Type-safe price representation using decimal arithmetic.
//!
//! The Storefront API transmits amounts as decimal strings. [`Price`] holds
//! the parsed `Decimal` plus its currency so display formatting lives in one
//! place instead of being scattered across view code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a price from its wire representation.
#[derive(Debug, Error)]
pub enum PriceParseError {
    /// The amount string is not a valid decimal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not one we support.
    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in the smallest currency unit.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency_code,
        }
    }

    /// Parse a price from a decimal string and ISO 4217 code.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a valid decimal or the
    /// currency code is unknown.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceParseError> {
        let amount = amount
            .parse::<Decimal>()
            .map_err(|_| PriceParseError::InvalidAmount(amount.to_owned()))?;
        let currency_code = CurrencyCode::from_code(currency_code)
            .ok_or_else(|| PriceParseError::UnsupportedCurrency(currency_code.to_owned()))?;
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Format for display (e.g., `$19.99`).
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes supported by the storefront.
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
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 code string.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price = Price::parse("19.99", "USD").unwrap();
        assert_eq!(price.display(), "$19.99");

        let price = Price::parse("10", "EUR").unwrap();
        assert_eq!(price.display(), "€10.00");
    }

    #[test]
    fn test_parse_invalid_amount() {
        let err = Price::parse("nineteen", "USD").unwrap_err();
        assert!(matches!(err, PriceParseError::InvalidAmount(_)));
    }

    #[test]
    fn test_parse_unsupported_currency() {
        let err = Price::parse("19.99", "XYZ").unwrap_err();
        assert!(matches!(err, PriceParseError::UnsupportedCurrency(_)));
    }

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(1050, CurrencyCode::USD);
        assert_eq!(price.display(), "$10.50");
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        let price = Price::parse("10.006", "GBP").unwrap();
        assert_eq!(price.display(), "£10.01");
    }
}
