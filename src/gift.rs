//! Gift rule
//!
//! One promotion: carts whose subtotal reaches a spend threshold earn a free
//! gift product as an extra line item, and lose it again as soon as the
//! subtotal drops back below the threshold.
//!
//! [`GiftRule::reconcile`] is the single place where the gift line is granted
//! or revoked. Callers run it after every cart mutation, which keeps the
//! gift state a pure function of the cart's subtotal.

use std::time::Duration;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    prices::Price,
    products::{Product, ProductId},
};

/// Errors raised when building a [`GiftRule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftRuleError {
    /// The gift product carries a non-zero price.
    #[error("gift product {name} must be free, got {minor_units} minor units")]
    GiftPriceNotZero {
        /// Name of the offending gift product.
        name: String,
        /// Its non-zero price in minor units.
        minor_units: i64,
    },

    /// The spend threshold is zero.
    #[error("gift threshold must be greater than zero")]
    ZeroThreshold,
}

/// How a call to [`GiftRule::reconcile`] changed the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftTransition {
    /// The subtotal reached the threshold and the gift line was added.
    Granted,
    /// The subtotal fell below the threshold and the gift line was removed.
    Revoked,
    /// The gift state already matched the subtotal.
    Unchanged,
}

/// A spend-threshold promotion that grants a free gift product.
#[derive(Debug, Clone)]
pub struct GiftRule {
    gift: Product,
    threshold: Price,
    banner_duration: Duration,
}

impl GiftRule {
    /// Creates a gift rule.
    ///
    /// `banner_duration` is how long the celebratory banner stays visible
    /// after the gift is granted.
    ///
    /// # Errors
    ///
    /// Returns [`GiftRuleError::GiftPriceNotZero`] if the gift product is not
    /// free, or [`GiftRuleError::ZeroThreshold`] if the threshold is zero.
    pub fn new(
        gift: Product,
        threshold: Price,
        banner_duration: Duration,
    ) -> Result<Self, GiftRuleError> {
        if !gift.price.is_zero() {
            return Err(GiftRuleError::GiftPriceNotZero {
                name: gift.name,
                minor_units: gift.price.minor_units(),
            });
        }

        if threshold.is_zero() {
            return Err(GiftRuleError::ZeroThreshold);
        }

        Ok(Self {
            gift,
            threshold,
            banner_duration,
        })
    }

    /// Returns the gift product granted by this rule.
    #[must_use]
    pub fn gift(&self) -> &Product {
        &self.gift
    }

    /// Returns the subtotal a cart must reach to earn the gift.
    #[must_use]
    pub fn threshold(&self) -> Price {
        self.threshold
    }

    /// Returns how long the celebratory banner stays visible.
    #[must_use]
    pub fn banner_duration(&self) -> Duration {
        self.banner_duration
    }

    /// Returns `true` if `id` is the gift product's id.
    #[must_use]
    pub fn is_gift(&self, id: ProductId) -> bool {
        self.gift.id == id
    }

    /// Brings the cart's gift line in sync with its subtotal.
    ///
    /// Grants the gift when the subtotal is at or above the threshold and no
    /// gift line exists, revokes it when the subtotal is below the threshold
    /// and a gift line exists, and otherwise leaves the cart untouched.
    /// Running it twice in a row never changes the cart a second time.
    ///
    /// The gift line never counts towards the subtotal the rule inspects,
    /// because the gift product's price is zero.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal overflows.
    pub fn reconcile(&self, cart: &mut Cart) -> Result<GiftTransition, CartError> {
        let subtotal = cart.subtotal()?;
        let earned = subtotal >= self.threshold;
        let granted = cart.contains(self.gift.id);

        if earned && !granted {
            cart.add(&self.gift, 1)?;

            return Ok(GiftTransition::Granted);
        }

        if !earned && granted {
            cart.remove(self.gift.id);

            return Ok(GiftTransition::Revoked);
        }

        Ok(GiftTransition::Unchanged)
    }

    /// Returns progress towards the threshold as a fraction in `0..=1`.
    #[must_use]
    pub fn progress(&self, subtotal: Price) -> Percentage {
        if self.threshold.is_zero() {
            return Percentage::from(1.0);
        }

        let ratio = Decimal::from(subtotal.minor_units()) / Decimal::from(self.threshold.minor_units());

        Percentage::from(ratio.min(Decimal::ONE))
    }

    /// Returns how much more must be spent to earn the gift.
    ///
    /// Zero once the threshold is reached.
    #[must_use]
    pub fn remaining(&self, subtotal: Price) -> Price {
        self.threshold.saturating_sub(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn mouse() -> Product {
        Product::new(ProductId::new(99), "Wireless Mouse", Price::ZERO)
    }

    fn rule() -> TestResult<GiftRule> {
        Ok(GiftRule::new(
            mouse(),
            Price::from_minor(100_000),
            Duration::from_secs(10),
        )?)
    }

    fn laptop() -> Product {
        Product::new(ProductId::new(1), "Laptop", Price::from_minor(50_000))
    }

    #[test]
    fn grants_the_gift_at_the_threshold() -> TestResult {
        let rule = rule()?;
        let mut cart = Cart::new();

        cart.add(&laptop(), 2)?;

        assert_eq!(rule.reconcile(&mut cart)?, GiftTransition::Granted);
        assert!(cart.contains(ProductId::new(99)));

        Ok(())
    }

    #[test]
    fn reconcile_is_idempotent() -> TestResult {
        let rule = rule()?;
        let mut cart = Cart::new();

        cart.add(&laptop(), 2)?;

        assert_eq!(rule.reconcile(&mut cart)?, GiftTransition::Granted);
        assert_eq!(rule.reconcile(&mut cart)?, GiftTransition::Unchanged);
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn revokes_the_gift_below_the_threshold() -> TestResult {
        let rule = rule()?;
        let mut cart = Cart::new();

        cart.add(&laptop(), 2)?;
        rule.reconcile(&mut cart)?;

        cart.set_quantity(ProductId::new(1), 1);

        assert_eq!(rule.reconcile(&mut cart)?, GiftTransition::Revoked);
        assert!(!cart.contains(ProductId::new(99)));

        Ok(())
    }

    #[test]
    fn gift_price_never_moves_the_subtotal() -> TestResult {
        let rule = rule()?;
        let mut cart = Cart::new();

        cart.add(&laptop(), 2)?;
        rule.reconcile(&mut cart)?;

        // 2 × 50 000 with a free gift line on top.
        assert_eq!(cart.subtotal()?, Price::from_minor(100_000));

        Ok(())
    }

    #[test]
    fn progress_is_a_clamped_fraction() -> TestResult {
        let rule = rule()?;

        assert_eq!(rule.progress(Price::ZERO), Percentage::from(0.0));
        assert_eq!(rule.progress(Price::from_minor(50_000)), Percentage::from(0.5));
        assert_eq!(rule.progress(Price::from_minor(105_000)), Percentage::from(1.0));

        Ok(())
    }

    #[test]
    fn remaining_clamps_at_zero() -> TestResult {
        let rule = rule()?;

        assert_eq!(rule.remaining(Price::from_minor(95_000)), Price::from_minor(5_000));
        assert_eq!(rule.remaining(Price::from_minor(120_000)), Price::ZERO);

        Ok(())
    }

    #[test]
    fn rejects_a_priced_gift() {
        let priced = Product::new(ProductId::new(99), "Wireless Mouse", Price::from_minor(100));

        let result = GiftRule::new(priced, Price::from_minor(100_000), Duration::from_secs(10));

        assert!(matches!(result, Err(GiftRuleError::GiftPriceNotZero { .. })));
    }

    #[test]
    fn rejects_a_zero_threshold() {
        let result = GiftRule::new(mouse(), Price::ZERO, Duration::from_secs(10));

        assert_eq!(result.err(), Some(GiftRuleError::ZeroThreshold));
    }
}
