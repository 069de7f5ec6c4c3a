//! Catalog
//!
//! The catalog is the read-only list of purchasable products. Cart operations
//! resolve product ids against it, so ids must be unique within a catalog.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors raised when building a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two products in the catalog share an id.
    #[error("duplicate product id {0} in catalog")]
    DuplicateProductId(ProductId),
}

/// An ordered collection of unique products offered for sale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Creates a catalog from a list of products, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProductId`] if two products share an
    /// id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = FxHashMap::default();

        for (index, product) in products.iter().enumerate() {
            if by_id.insert(product.id, index).is_some() {
                return Err(CatalogError::DuplicateProductId(product.id));
            }
        }

        Ok(Self { products, by_id })
    }

    /// Looks up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).and_then(|&index| self.products.get(index))
    }

    /// Returns `true` if the catalog offers a product with the given id.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterates over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Returns the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
