//! Cart engine
//!
//! [`CartEngine`] owns the catalog, the cart and the gift rule, and is the
//! only way the two mutating operations reach the cart. Every mutation ends
//! with a [`GiftRule::reconcile`] pass and a banner update, so callers can
//! never observe a cart whose gift line disagrees with its subtotal.
//!
//! Quantity rules follow the storefront's conventions: an add with quantity
//! zero and an update to a quantity below one are silent no-ops, while
//! structural misuse (unknown ids, updating a line that is not in the cart,
//! touching the reserved gift product) is an error.

use std::time::Duration;

use decimal_percentage::Percentage;
use thiserror::Error;

use crate::{
    banner::{BannerTimer, Clock, SystemClock},
    cart::{Cart, CartError},
    catalog::Catalog,
    gift::{GiftRule, GiftTransition},
    prices::{Price, PriceError},
    products::ProductId,
};

/// Errors raised by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The product id is not in the catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// The product id has no line in the cart.
    #[error("product {0} is not in the cart")]
    LineItemNotFound(ProductId),

    /// The product id belongs to the gift, which only the rule may manage.
    #[error("product {0} is the gift and cannot be added or updated directly")]
    ReservedGift(ProductId),

    /// The gift product is also listed in the catalog.
    #[error("gift product {0} must not appear in the catalog")]
    GiftInCatalog(ProductId),

    /// A cart mutation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// The shopping cart state machine.
///
/// Generic over a [`Clock`] so banner expiry can be tested without waiting;
/// production code uses the [`SystemClock`] default.
#[derive(Debug)]
pub struct CartEngine<C: Clock = SystemClock> {
    catalog: Catalog,
    rule: GiftRule,
    cart: Cart,
    banner: Option<BannerTimer>,
    clock: C,
}

impl CartEngine {
    /// Creates an engine over the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GiftInCatalog`] if the gift product's id is
    /// also a catalog id.
    pub fn new(catalog: Catalog, rule: GiftRule) -> Result<Self, EngineError> {
        Self::with_clock(catalog, rule, SystemClock)
    }
}

impl<C: Clock> CartEngine<C> {
    /// Creates an engine that reads time from the given clock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GiftInCatalog`] if the gift product's id is
    /// also a catalog id.
    pub fn with_clock(catalog: Catalog, rule: GiftRule, clock: C) -> Result<Self, EngineError> {
        if catalog.contains(rule.gift().id) {
            return Err(EngineError::GiftInCatalog(rule.gift().id));
        }

        Ok(Self {
            catalog,
            rule,
            cart: Cart::new(),
            banner: None,
            clock,
        })
    }

    /// Adds `quantity` units of a catalog product to the cart.
    ///
    /// A quantity of zero leaves the cart untouched and reports
    /// [`GiftTransition::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReservedGift`] for the gift product's id,
    /// [`EngineError::UnknownProduct`] for ids the catalog does not offer,
    /// and [`EngineError::Cart`] if merging quantities overflows.
    pub fn add_to_cart(
        &mut self,
        id: ProductId,
        quantity: u32,
    ) -> Result<GiftTransition, EngineError> {
        if self.rule.is_gift(id) {
            return Err(EngineError::ReservedGift(id));
        }

        let product = self
            .catalog
            .get(id)
            .ok_or(EngineError::UnknownProduct(id))?;

        if quantity == 0 {
            return Ok(GiftTransition::Unchanged);
        }

        self.cart.add(product, quantity)?;

        self.settle()
    }

    /// Replaces the quantity of an existing cart line.
    ///
    /// A quantity below one leaves the line untouched and reports
    /// [`GiftTransition::Unchanged`]; removing a line is not an update.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReservedGift`] for the gift product's id and
    /// [`EngineError::LineItemNotFound`] if the cart has no line for `id`.
    pub fn update_quantity(
        &mut self,
        id: ProductId,
        quantity: u32,
    ) -> Result<GiftTransition, EngineError> {
        if self.rule.is_gift(id) {
            return Err(EngineError::ReservedGift(id));
        }

        if !self.cart.contains(id) {
            return Err(EngineError::LineItemNotFound(id));
        }

        if quantity < 1 {
            return Ok(GiftTransition::Unchanged);
        }

        let updated = self.cart.set_quantity(id, quantity);
        debug_assert!(updated, "line existence was checked above");

        self.settle()
    }

    /// Reruns the gift rule and updates the banner after a mutation.
    fn settle(&mut self) -> Result<GiftTransition, EngineError> {
        let transition = self.rule.reconcile(&mut self.cart)?;

        match transition {
            GiftTransition::Granted => {
                self.banner = Some(BannerTimer::arm(
                    self.clock.now(),
                    self.rule.banner_duration(),
                ));
            }
            GiftTransition::Revoked => {
                self.banner = None;
            }
            GiftTransition::Unchanged => {}
        }

        Ok(transition)
    }

    /// Sums the cart's line totals.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the sum overflows.
    pub fn subtotal(&self) -> Result<Price, PriceError> {
        self.cart.subtotal()
    }

    /// Returns progress towards the gift threshold as a fraction in `0..=1`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the subtotal overflows.
    pub fn progress(&self) -> Result<Percentage, PriceError> {
        Ok(self.rule.progress(self.subtotal()?))
    }

    /// Returns how much more must be spent to earn the gift.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the subtotal overflows.
    pub fn remaining_to_gift(&self) -> Result<Price, PriceError> {
        Ok(self.rule.remaining(self.subtotal()?))
    }

    /// Returns `true` if the cart currently holds the gift line.
    #[must_use]
    pub fn gift_granted(&self) -> bool {
        self.cart.contains(self.rule.gift().id)
    }

    /// Returns `true` while the celebratory banner should be shown.
    ///
    /// The banner is armed when the gift is granted, disarmed when it is
    /// revoked, and otherwise expires on its own after the rule's banner
    /// duration.
    #[must_use]
    pub fn banner_visible(&self) -> bool {
        self.banner
            .as_ref()
            .is_some_and(|timer| !timer.is_expired(self.clock.now()))
    }

    /// Returns the banner time left, or `None` once hidden.
    #[must_use]
    pub fn banner_remaining(&self) -> Option<Duration> {
        let timer = self.banner.as_ref()?;
        let remaining = timer.remaining(self.clock.now());

        (!remaining.is_zero()).then_some(remaining)
    }

    /// Returns the catalog of purchasable products.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the gift rule in force.
    #[must_use]
    pub fn rule(&self) -> &GiftRule {
        &self.rule
    }
}
