//! Type-safe price representation using decimal arithmetic.

use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the store's currency unit.
///
/// Prices are currency-agnostic; the currency is only applied when formatting
/// for display. Deserialization accepts JSON numbers as well as decimal
/// strings, so carts written by older clients still load.
///
/// Arithmetic saturates at the largest representable amount instead of
/// panicking; use [`Price::checked_times`] and [`Price::checked_add`] where
/// overflow must be detected.
///
/// ```
/// use rust_decimal::Decimal;
/// use serene_home_core::{CurrencyCode, Price};
///
/// let price = Price::new(Decimal::from(1299)).unwrap();
/// assert_eq!(price.display(CurrencyCode::PHP), "₱1,299");
/// assert!(Price::new(Decimal::from(-1)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units, saturating on overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// The price of `quantity` units, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// The sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Format for display, e.g. `₱1,299` or `$12.50`.
    ///
    /// Whole amounts omit the fractional part; anything else is shown with
    /// two decimal places.
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        let formatted = format!("{:.2}", self.0.round_dp(2));
        let (whole, fraction) = formatted
            .split_once('.')
            .unwrap_or((formatted.as_str(), "00"));

        let mut out = String::from(currency.symbol());
        out.push_str(&group_thousands(whole));
        if fraction != "00" {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Insert `,` separators every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let err = Price::new(Decimal::new(-1, 2)).unwrap_err();
        assert!(matches!(err, PriceError::Negative(_)));
    }

    #[test]
    fn test_zero_price_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let vase = Price::from_units(499);
        let lamp = Price::from_units(899);
        let total: Price = [vase.times(2), lamp.times(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::from(1897));
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Price::default(), Price::ZERO);
    }

    #[test]
    fn test_checked_arithmetic_detects_overflow() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max.checked_add(Price::from_units(1)), None);
        assert_eq!(max.checked_times(1), Some(max));
        assert_eq!(
            Price::from_units(499).checked_times(2),
            Some(Price::from_units(998))
        );
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.times(u32::MAX), max);
        assert_eq!(max + Price::from_units(1), max);
        let total: Price = [max, max, max].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_units(0).display(CurrencyCode::PHP), "₱0");
        assert_eq!(Price::from_units(499).display(CurrencyCode::PHP), "₱499");
        assert_eq!(Price::from_units(1299).display(CurrencyCode::PHP), "₱1,299");
        assert_eq!(
            Price::from_units(1_234_567).display(CurrencyCode::PHP),
            "₱1,234,567"
        );
    }

    #[test]
    fn test_display_keeps_cents() {
        let price = Price::new(Decimal::new(1250, 2)).unwrap();
        assert_eq!(price.display(CurrencyCode::USD), "$12.50");
    }

    #[test]
    fn test_deserialize_accepts_number_and_string() {
        let from_number: Price = serde_json::from_str("499").unwrap();
        let from_string: Price = serde_json::from_str("\"499\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_units(499));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }
}
