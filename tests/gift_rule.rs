//! Threshold crossing and banner policy.
//!
//! The gift line must track the subtotal exactly: oscillating around the
//! threshold never duplicates the gift, and re-running the rule with no
//! intervening change never mutates the cart. The celebratory banner is a
//! single cancelable timer: a fresh grant replaces it, a revoke clears it.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use testresult::TestResult;

use hamper::prelude::{
    CartEngine, Catalog, Clock, GiftRule, GiftTransition, Price, Product, ProductId,
};

#[derive(Debug, Clone)]
struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    fn start() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

fn engine() -> TestResult<(CartEngine<ManualClock>, ManualClock)> {
    let catalog = Catalog::new(vec![
        Product::new(ProductId::new(1), "Laptop", Price::from_minor(50_000)),
        Product::new(ProductId::new(3), "Headphones", Price::from_minor(10_000)),
    ])?;

    let mouse = Product::new(ProductId::new(99), "Wireless Mouse", Price::ZERO);
    let rule = GiftRule::new(mouse, Price::from_minor(100_000), Duration::from_secs(10))?;

    let clock = ManualClock::start();
    let engine = CartEngine::with_clock(catalog, rule, clock.clone())?;

    Ok((engine, clock))
}

#[test]
fn oscillating_around_the_threshold_never_duplicates_the_gift() -> TestResult {
    let (mut engine, _clock) = engine()?;

    engine.add_to_cart(ProductId::new(1), 2)?;

    for _round in 0..5 {
        assert_eq!(
            engine.update_quantity(ProductId::new(1), 1)?,
            GiftTransition::Revoked
        );
        assert_eq!(
            engine.update_quantity(ProductId::new(1), 2)?,
            GiftTransition::Granted
        );
    }

    let gift_lines = engine
        .cart()
        .iter()
        .filter(|line| line.product_id() == ProductId::new(99))
        .count();

    assert_eq!(gift_lines, 1);

    Ok(())
}

#[test]
fn unrelated_changes_above_the_threshold_keep_one_gift() -> TestResult {
    let (mut engine, _clock) = engine()?;

    engine.add_to_cart(ProductId::new(1), 2)?;

    // Already earned; more spend must not grant a second gift.
    assert_eq!(
        engine.add_to_cart(ProductId::new(3), 4)?,
        GiftTransition::Unchanged
    );
    assert_eq!(engine.cart().len(), 3);

    Ok(())
}

#[test]
fn the_banner_clears_after_its_duration() -> TestResult {
    let (mut engine, clock) = engine()?;

    engine.add_to_cart(ProductId::new(1), 2)?;
    assert!(engine.banner_visible());

    clock.advance(Duration::from_secs(9));
    assert!(engine.banner_visible());
    assert_eq!(engine.banner_remaining(), Some(Duration::from_secs(1)));

    clock.advance(Duration::from_secs(1));
    assert!(!engine.banner_visible());
    assert!(engine.banner_remaining().is_none());

    // The gift itself is not time-limited.
    assert!(engine.gift_granted());

    Ok(())
}

#[test]
fn a_regrant_replaces_the_running_banner_timer() -> TestResult {
    let (mut engine, clock) = engine()?;

    engine.add_to_cart(ProductId::new(1), 2)?;
    clock.advance(Duration::from_secs(7));

    engine.update_quantity(ProductId::new(1), 1)?;
    engine.update_quantity(ProductId::new(1), 2)?;

    // One timer, freshly armed; the original 10 s window does not bleed in.
    assert_eq!(engine.banner_remaining(), Some(Duration::from_secs(10)));

    clock.advance(Duration::from_secs(8));
    assert!(engine.banner_visible());

    clock.advance(Duration::from_secs(2));
    assert!(!engine.banner_visible());

    Ok(())
}

#[test]
fn a_revoke_cancels_the_banner_immediately() -> TestResult {
    let (mut engine, clock) = engine()?;

    engine.add_to_cart(ProductId::new(1), 2)?;
    clock.advance(Duration::from_secs(2));
    assert!(engine.banner_visible());

    engine.update_quantity(ProductId::new(1), 1)?;

    assert!(!engine.banner_visible());
    assert!(engine.banner_remaining().is_none());

    Ok(())
}
