//! Storefront rendering
//!
//! Renders a [`CartEngine`]'s catalog, cart and gift progress as terminal
//! tables. Prices are converted to [`Money`](rusty_money::Money) in the
//! storefront's currency only here, at the display edge.

use std::{io, ops::Range};

use decimal_percentage::Percentage;
use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    banner::Clock,
    engine::CartEngine,
    prices::PriceError,
};

/// Number of segments in the gift progress bar.
const BAR_SEGMENTS: usize = 20;

/// Errors that can occur when rendering the storefront.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error writing the storefront
    #[error("Failed to write storefront: {0}")]
    Io(#[from] io::Error),

    /// Price arithmetic failed while summarising the cart
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// A renderable view over an engine and its display currency.
#[derive(Debug)]
pub struct Storefront<'a, C: Clock> {
    engine: &'a CartEngine<C>,
    currency: &'static Currency,
}

impl<'a, C: Clock> Storefront<'a, C> {
    /// Creates a storefront view for an engine.
    #[must_use]
    pub fn new(engine: &'a CartEngine<C>, currency: &'static Currency) -> Self {
        Self { engine, currency }
    }

    /// Writes the product list, the cart and the gift summary.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if writing fails or a line total overflows.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        self.write_products(out)?;
        self.write_cart(out)?;
        self.write_summary(out)
    }

    fn write_products(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Product", "Price"]);

        for product in self.engine.catalog().iter() {
            builder.push_record([
                format!("#{}", product.id),
                product.name.clone(),
                product.price.money(self.currency).to_string(),
            ]);
        }

        writeln!(out, "\n\x1b[1mProducts\x1b[0m")?;
        write_table(out, builder, 2..3, smallvec![])
    }

    fn write_cart(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        writeln!(out, "\n\x1b[1mCart\x1b[0m")?;

        if self.engine.cart().is_empty() {
            writeln!(out, "Your cart is empty.")?;
            writeln!(out, "Add some products to see them here!")?;

            return Ok(());
        }

        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 4]> = smallvec![];

        builder.push_record(["Item", "Unit Price", "Qty", "Line Total", ""]);

        for (row, line) in self.engine.cart().iter().enumerate() {
            let gift_line = self.engine.rule().is_gift(line.product_id());

            if gift_line {
                // Header occupies row 0.
                color_ops.push((row + 1, 4, Color::FG_GREEN));
            }

            builder.push_record([
                line.name().to_string(),
                line.unit_price().money(self.currency).to_string(),
                line.quantity().to_string(),
                line.line_total()?.money(self.currency).to_string(),
                if gift_line { "FREE GIFT" } else { "" }.to_string(),
            ]);
        }

        write_table(out, builder, 1..4, color_ops)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), SummaryError> {
        let subtotal = self.engine.subtotal()?;
        let gift = self.engine.rule().gift();

        writeln!(out)?;
        writeln!(out, " Subtotal: {}", subtotal.money(self.currency))?;
        writeln!(out, " Gift progress: {}", progress_bar(self.engine.progress()?))?;

        if self.engine.gift_granted() {
            writeln!(out, " You got a free {}!", gift.name)?;
        } else {
            let remaining = self.engine.remaining_to_gift()?;

            writeln!(
                out,
                " Add {} more to get a FREE {}!",
                remaining.money(self.currency),
                gift.name
            )?;
        }

        if let Some(left) = self.engine.banner_remaining() {
            writeln!(
                out,
                " \x1b[1;32mCongratulations! You've earned a free {}!\x1b[0m (clears in {})",
                gift.name,
                left.human(Truncate::Second)
            )?;
        }

        writeln!(out)?;

        Ok(())
    }
}

/// Renders a fractional percentage as a fixed-width bar with percent points.
fn progress_bar(progress: Percentage) -> String {
    let points = (progress * Decimal::ONE_HUNDRED).round_dp(0);
    let filled = (points.to_usize().unwrap_or(0) / 5).min(BAR_SEGMENTS);

    format!(
        "[{}{}] {points}%",
        "█".repeat(filled),
        "░".repeat(BAR_SEGMENTS - filled)
    )
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Range<usize>,
    color_ops: SmallVec<[(usize, usize, Color); 4]>,
) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    writeln!(out, "{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{
        catalog::Catalog,
        gift::GiftRule,
        prices::Price,
        products::{Product, ProductId},
    };

    use super::*;

    fn engine() -> TestResult<CartEngine> {
        let catalog = Catalog::new(vec![
            Product::new(ProductId::new(1), "Laptop", Price::from_minor(50_000)),
            Product::new(ProductId::new(3), "Headphones", Price::from_minor(10_000)),
        ])?;

        let mouse = Product::new(ProductId::new(99), "Wireless Mouse", Price::ZERO);
        let rule = GiftRule::new(mouse, Price::from_minor(100_000), Duration::from_secs(10))?;

        Ok(CartEngine::new(catalog, rule)?)
    }

    fn render(engine: &CartEngine) -> TestResult<String> {
        let mut out = Vec::new();

        Storefront::new(engine, INR).write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn renders_the_empty_cart_copy() -> TestResult {
        let engine = engine()?;

        let output = render(&engine)?;

        assert!(output.contains("Products"));
        assert!(output.contains("₹500.00"));
        assert!(output.contains("Your cart is empty."));
        assert!(output.contains("Add some products to see them here!"));

        Ok(())
    }

    #[test]
    fn renders_progress_and_remaining_spend() -> TestResult {
        let mut engine = engine()?;

        engine.add_to_cart(ProductId::new(1), 1)?;

        let output = render(&engine)?;

        assert!(output.contains("Subtotal: ₹500.00"));
        assert!(output.contains("[██████████░░░░░░░░░░] 50%"));
        assert!(output.contains("Add ₹500.00 more to get a FREE Wireless Mouse!"));

        Ok(())
    }

    #[test]
    fn renders_the_gift_line_and_banner() -> TestResult {
        let mut engine = engine()?;

        engine.add_to_cart(ProductId::new(1), 2)?;

        let output = render(&engine)?;

        assert!(output.contains("Wireless Mouse"));
        assert!(output.contains("FREE GIFT"));
        assert!(output.contains("[████████████████████] 100%"));
        assert!(output.contains("You got a free Wireless Mouse!"));
        assert!(output.contains("Congratulations! You've earned a free Wireless Mouse!"));

        Ok(())
    }

    #[test]
    fn quantities_and_line_totals_are_rendered() -> TestResult {
        let mut engine = engine()?;

        engine.add_to_cart(ProductId::new(3), 3)?;

        let output = render(&engine)?;

        assert!(output.contains("Headphones"));
        assert!(output.contains("₹300.00"));
        assert!(output.contains("Subtotal: ₹300.00"));

        Ok(())
    }
}
