//! Prices
//!
//! All monetary arithmetic in this crate happens on [`Price`], a quantity of
//! minor units (paise, pence, cents) in a currency chosen by the caller.
//! Conversion to a displayable [`Money`] only happens at the rendering edge.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised by checked price arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    /// A price calculation exceeded the representable range of minor units.
    #[error("price arithmetic overflowed the representable range of minor units")]
    Overflow,
}

/// A non-negative amount of money in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    minor_units: i64,
}

impl Price {
    /// A price of zero minor units.
    pub const ZERO: Self = Self { minor_units: 0 };

    /// Creates a price from an amount of minor units.
    ///
    /// Callers are expected to pass a non-negative amount; fixture parsing
    /// rejects negative amounts before they reach this constructor.
    #[must_use]
    pub fn from_minor(minor_units: i64) -> Self {
        debug_assert!(minor_units >= 0, "prices are non-negative");
        Self { minor_units }
    }

    /// Returns the amount of minor units in this price.
    #[must_use]
    pub fn minor_units(self) -> i64 {
        self.minor_units
    }

    /// Returns `true` if this price is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.minor_units == 0
    }

    /// Adds two prices, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the sum does not fit in minor units.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        self.minor_units
            .checked_add(other.minor_units)
            .map(Self::from_minor)
            .ok_or(PriceError::Overflow)
    }

    /// Multiplies this price by a quantity, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit in minor
    /// units.
    pub fn checked_mul(self, quantity: u32) -> Result<Self, PriceError> {
        self.minor_units
            .checked_mul(i64::from(quantity))
            .map(Self::from_minor)
            .ok_or(PriceError::Overflow)
    }

    /// Subtracts `other` from this price, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::from_minor(self.minor_units.saturating_sub(other.minor_units).max(0))
    }

    /// Converts this price into a displayable [`Money`] in the given currency.
    #[must_use]
    pub fn money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(self.minor_units, currency)
    }
}
