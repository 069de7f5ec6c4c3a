//! Hamper
//!
//! Hamper is a threshold-gift shopping cart engine: a fixed catalog, a cart of
//! line items, and one promotion that grants a free gift product once the
//! cart's subtotal reaches a spend threshold.

pub mod banner;
pub mod cart;
pub mod catalog;
pub mod engine;
pub mod fixtures;
pub mod gift;
pub mod items;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod summary;
