//! Line items
//!
//! A [`LineItem`] is one row of a cart: a snapshot of a product together
//! with the quantity being purchased. Quantities are kept at one or more;
//! a line that would drop below one is removed from the cart instead.

use crate::{
    prices::{Price, PriceError},
    products::{Product, ProductId},
};

/// A product entry in a cart with its purchase quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    unit_price: Price,
    quantity: u32,
}

impl LineItem {
    /// Creates a line item for `quantity` units of a product.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    /// Returns the id of the product this line refers to.
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the product name captured when the line was created.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price of the product.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Returns the purchase quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Returns the price of this line: unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the multiplication overflows.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.unit_price.checked_mul(self.quantity)
    }
}
