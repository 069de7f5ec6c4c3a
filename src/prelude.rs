//! Hamper prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    banner::{BannerTimer, Clock, SystemClock},
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    engine::{CartEngine, EngineError},
    fixtures::{FixtureError, StoreFixture},
    gift::{GiftRule, GiftRuleError, GiftTransition},
    items::LineItem,
    prices::{Price, PriceError},
    products::{Product, ProductId},
    summary::{Storefront, SummaryError},
};
