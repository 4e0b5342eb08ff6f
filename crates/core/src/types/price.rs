//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum allowed price, in currency units.
const MAX_PRICE_UNITS: i64 = 10_000;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount exceeds the allowed ceiling.
    #[error("price must be at most {max}")]
    ExceedsMaximum {
        /// Maximum allowed amount.
        max: i64,
    },
}

/// A menu item price.
///
/// Wraps a [`Decimal`] amount constrained to the half-open interval
/// (0, 10000]. Amounts are normalized (trailing zeros stripped) so equal
/// prices compare equal regardless of how they were written.
///
/// Serializes as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative,
    /// or `PriceError::ExceedsMaximum` if it is greater than 10000.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount > Decimal::from(MAX_PRICE_UNITS) {
            return Err(PriceError::ExceedsMaximum {
                max: MAX_PRICE_UNITS,
            });
        }
        Ok(Self(amount.normalize()))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotPositive)?;
        Self::new(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_new_accepts_positive_amounts() {
        assert!(Price::new(Decimal::new(85, 1)).is_ok()); // 8.5
        assert!(Price::new(Decimal::ONE).is_ok());
        assert!(Price::new(Decimal::from(10_000)).is_ok());
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(Price::new(Decimal::ZERO), Err(PriceError::NotPositive));
        assert_eq!(
            Price::new(Decimal::from(-5)),
            Err(PriceError::NotPositive)
        );
    }

    #[test]
    fn test_new_rejects_over_ceiling() {
        assert_eq!(
            Price::new(Decimal::new(10_000_01, 2)), // 10000.01
            Err(PriceError::ExceedsMaximum { max: 10_000 })
        );
    }

    #[test]
    fn test_normalization_makes_equal_amounts_equal() {
        let a = Price::new(Decimal::new(850, 2)).unwrap(); // 8.50
        let b = Price::new(Decimal::new(85, 1)).unwrap(); // 8.5
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(Decimal::new(85, 1)).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "8.5");
    }

    #[test]
    fn test_from_str() {
        let price: Price = "12.30".parse().unwrap();
        assert_eq!(price.as_decimal(), Decimal::new(123, 1));
        assert!("0".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
    }
}
