//! Carts
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s. Adding a product that is
//! already in the cart merges into the existing line instead of appending a
//! duplicate, so each product id appears at most once.
//!
//! The cart itself is policy-free. Threshold checks, the gift line and
//! quantity rules live in [`crate::gift`] and [`crate::engine`].

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    items::LineItem,
    prices::{Price, PriceError},
    products::{Product, ProductId},
};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// Merging quantities for a product exceeded the representable range.
    #[error("quantity for product {0} overflowed")]
    QuantityOverflow(ProductId),

    /// A price calculation failed.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// An ordered collection of line items, one per product.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: SmallVec<[LineItem; 8]>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of a product, merging with an existing line.
    ///
    /// New products are appended at the end, so line order reflects the
    /// order in which products first entered the cart. `quantity` is
    /// expected to be at least one; callers enforce that rule.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the merged quantity does
    /// not fit in a `u32`.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if let Some(line) = self.line_mut(product.id) {
            let merged = line
                .quantity()
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(product.id))?;

            line.set_quantity(merged);

            return Ok(());
        }

        self.lines.push(LineItem::new(product, quantity));

        Ok(())
    }

    /// Replaces the quantity of an existing line.
    ///
    /// Returns `false` if no line matches `id`. `quantity` is expected to be
    /// at least one; callers enforce that rule.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Removes the line for `id`, returning it if present.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        let index = self.lines.iter().position(|line| line.product_id() == id)?;

        Some(self.lines.remove(index))
    }

    /// Looks up the line for `id`.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    /// Returns `true` if the cart has a line for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Sums the line totals of every line in the cart.
    ///
    /// An empty cart has a subtotal of zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if any line total or the running sum
    /// overflows.
    pub fn subtotal(&self) -> Result<Price, PriceError> {
        self.lines
            .iter()
            .try_fold(Price::ZERO, |sum, line| sum.checked_add(line.line_total()?))
    }

    /// Iterates over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter()
    }

    /// Returns the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.lines.iter_mut().find(|line| line.product_id() == id)
    }
}
