//! Fixtures
//!
//! A storefront is described by a YAML fixture holding the catalog and the
//! gift rule. Prices are written as `"AMOUNT CURRENCY"` strings and every
//! price in a fixture must use the same currency; the shared currency is
//! kept on the loaded [`StoreFixture`] for rendering.

use std::{fs, path::Path, time::Duration};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    engine::{CartEngine, EngineError},
    gift::{GiftRule, GiftRuleError},
    prices::Price,
    products::{Product, ProductId},
};

/// The storefront fixture compiled into the binary as the default store.
pub const DEMO_STORE_YAML: &str = include_str!("../fixtures/demo.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices in one fixture
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The catalog has no products
    #[error("Fixture has an empty catalog")]
    EmptyCatalog,

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Gift rule construction error
    #[error(transparent)]
    GiftRule(#[from] GiftRuleError),
}

#[derive(Debug, Deserialize)]
struct StoreFixtureFile {
    catalog: Vec<ProductFixture>,
    gift: GiftFixture,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: u32,
    name: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct GiftFixture {
    product: ProductFixture,
    threshold: String,
    #[serde(default = "default_banner_seconds")]
    banner_seconds: u64,
}

fn default_banner_seconds() -> u64 {
    10
}

/// A loaded storefront: catalog, gift rule and display currency.
#[derive(Debug, Clone)]
pub struct StoreFixture {
    catalog: Catalog,
    rule: GiftRule,
    currency: &'static Currency,
}

impl StoreFixture {
    /// Loads the embedded demo storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture fails validation, which
    /// indicates a packaging mistake.
    pub fn demo() -> Result<Self, FixtureError> {
        Self::from_yaml(DEMO_STORE_YAML)
    }

    /// Loads a storefront from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Loads a storefront from YAML fixture contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, the catalog is empty,
    /// prices mix currencies, product ids collide, or the gift rule is
    /// invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let file: StoreFixtureFile = serde_norway::from_str(yaml)?;
        let mut entries = file.catalog.into_iter();

        let Some(first) = entries.next() else {
            return Err(FixtureError::EmptyCatalog);
        };

        let (first, currency) = parse_product(first)?;
        let mut products = vec![first];

        for entry in entries {
            let (product, entry_currency) = parse_product(entry)?;

            check_currency(currency, entry_currency)?;
            products.push(product);
        }

        let (gift, gift_currency) = parse_product(file.gift.product)?;
        check_currency(currency, gift_currency)?;

        let (threshold, threshold_currency) = parse_price(&file.gift.threshold)?;
        check_currency(currency, threshold_currency)?;

        let catalog = Catalog::new(products)?;
        let rule = GiftRule::new(gift, threshold, Duration::from_secs(file.gift.banner_seconds))?;

        Ok(Self {
            catalog,
            rule,
            currency,
        })
    }

    /// Returns the catalog of purchasable products.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the gift rule.
    #[must_use]
    pub fn rule(&self) -> &GiftRule {
        &self.rule
    }

    /// Returns the currency shared by every price in the fixture.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Builds a [`CartEngine`] for this storefront.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GiftInCatalog`] if the gift product's id is
    /// also a catalog id.
    pub fn into_engine(self) -> Result<CartEngine, EngineError> {
        CartEngine::new(self.catalog, self.rule)
    }
}

fn parse_product(fixture: ProductFixture) -> Result<(Product, &'static Currency), FixtureError> {
    let (price, currency) = parse_price(&fixture.price)?;
    let product = Product::new(ProductId::new(fixture.id), fixture.name, price);

    Ok((product, currency))
}

fn check_currency(
    expected: &'static Currency,
    found: &'static Currency,
) -> Result<(), FixtureError> {
    if expected == found {
        return Ok(());
    }

    Err(FixtureError::CurrencyMismatch(
        expected.iso_alpha_code.to_string(),
        found.iso_alpha_code.to_string(),
    ))
}

/// Parse price string (e.g., "2.99 INR") into a price and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a non-negative decimal, or if the
/// currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Price, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(format!(
            "Prices are non-negative, got: {s}"
        )));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((Price::from_minor(minor_units), currency))
}
