//! Interactive storefront session.
//!
//! Reads one action per line, from stdin or a script file, applies it to a
//! [`CartEngine`] and renders the storefront after every change. Failing
//! actions are reported on stderr and the session keeps going.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;

use hamper::prelude::{CartEngine, EngineError, LineItem, ProductId, StoreFixture, Storefront};
use rusty_money::iso::Currency;

/// Arguments for a storefront session
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Storefront fixture to load instead of the embedded demo store
    #[clap(short, long)]
    fixture: Option<PathBuf>,

    /// Read actions from a script file instead of stdin
    #[clap(short, long)]
    script: Option<PathBuf>,
}

/// One line of session input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Add units of a catalog product to the cart.
    Add {
        /// Catalog id of the product to add.
        id: ProductId,
        /// Units to add.
        quantity: u32,
    },
    /// Increment a cart line's quantity by one.
    Plus(ProductId),
    /// Decrement a cart line's quantity by one.
    Minus(ProductId),
    /// Replace a cart line's quantity.
    Quantity {
        /// Catalog id of the line to update.
        id: ProductId,
        /// The new quantity.
        quantity: u32,
    },
    /// Render the storefront without changing the cart.
    Show,
    /// List the available actions.
    Help,
    /// End the session.
    Quit,
}

const HELP: &str = "\
actions:
  add <id> [qty]   add a catalog product to the cart
  plus <id>        increase a cart line's quantity by one
  minus <id>       decrease a cart line's quantity by one
  qty <id> <n>     set a cart line's quantity
  show             render the storefront
  help             show this list
  quit             end the session";

fn main() -> Result<()> {
    let args = Args::parse();

    let fixture = match &args.fixture {
        Some(path) => StoreFixture::from_path(path)?,
        None => StoreFixture::demo()?,
    };

    let currency = fixture.currency();
    let mut engine = fixture.into_engine()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    Storefront::new(&engine, currency).write_to(&mut out)?;

    match &args.script {
        Some(path) => {
            let script = BufReader::new(File::open(path)?);

            run(&mut engine, currency, script, &mut out, false)
        }
        None => run(&mut engine, currency, io::stdin().lock(), &mut out, true),
    }
}

/// Drives the engine from a stream of action lines.
///
/// Blank lines are skipped; `quit` ends the session. In interactive mode a
/// subtotal prompt is written before each read.
fn run(
    engine: &mut CartEngine,
    currency: &'static Currency,
    input: impl BufRead,
    out: &mut impl Write,
    interactive: bool,
) -> Result<()> {
    if interactive {
        prompt(engine, currency, out)?;
    }

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        match parse_action(trimmed) {
            Ok(None) => {}
            Ok(Some(Action::Quit)) => break,
            Ok(Some(Action::Help)) => writeln!(out, "{HELP}")?,
            Ok(Some(Action::Show)) => Storefront::new(engine, currency).write_to(out)?,
            Ok(Some(action)) => match apply(engine, action) {
                Ok(()) => Storefront::new(engine, currency).write_to(out)?,
                Err(error) => eprintln!("{error}"),
            },
            Err(message) => eprintln!("{message}"),
        }

        if interactive {
            prompt(engine, currency, out)?;
        }
    }

    Ok(())
}

fn prompt(engine: &CartEngine, currency: &'static Currency, out: &mut impl Write) -> Result<()> {
    write!(out, "{} > ", engine.subtotal()?.money(currency))?;
    out.flush()?;

    Ok(())
}

fn apply(engine: &mut CartEngine, action: Action) -> Result<(), EngineError> {
    match action {
        Action::Add { id, quantity } => engine.add_to_cart(id, quantity).map(drop),
        Action::Plus(id) => {
            let quantity = current_quantity(engine, id)?.saturating_add(1);

            engine.update_quantity(id, quantity).map(drop)
        }
        // A decrement below one is silently ignored by the engine, matching
        // the storefront's "−" button doing nothing at quantity one.
        Action::Minus(id) => {
            let quantity = current_quantity(engine, id)?.saturating_sub(1);

            engine.update_quantity(id, quantity).map(drop)
        }
        Action::Quantity { id, quantity } => engine.update_quantity(id, quantity).map(drop),
        Action::Show | Action::Help | Action::Quit => Ok(()),
    }
}

fn current_quantity(engine: &CartEngine, id: ProductId) -> Result<u32, EngineError> {
    engine
        .cart()
        .line(id)
        .map(LineItem::quantity)
        .ok_or(EngineError::LineItemNotFound(id))
}

/// Parses one input line into an action; `None` for blank lines.
fn parse_action(line: &str) -> Result<Option<Action>, String> {
    let mut tokens = line.split_whitespace();

    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    let action = match verb {
        "add" => Action::Add {
            id: parse_id(tokens.next())?,
            quantity: match tokens.next() {
                Some(raw) => parse_quantity(raw)?,
                None => 1,
            },
        },
        "plus" | "+" => Action::Plus(parse_id(tokens.next())?),
        "minus" | "-" => Action::Minus(parse_id(tokens.next())?),
        "qty" => Action::Quantity {
            id: parse_id(tokens.next())?,
            quantity: tokens
                .next()
                .ok_or_else(|| "qty needs a product id and a quantity".to_string())
                .and_then(parse_quantity)?,
        },
        "show" => Action::Show,
        "help" => Action::Help,
        "quit" | "exit" => Action::Quit,
        other => {
            return Err(format!("unknown action: {other} (try help)"));
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(format!("unexpected trailing input: {extra}"));
    }

    Ok(Some(action))
}

fn parse_id(token: Option<&str>) -> Result<ProductId, String> {
    let raw = token.ok_or_else(|| "expected a product id".to_string())?;

    raw.parse::<u32>()
        .map(ProductId::new)
        .map_err(|_err| format!("invalid product id: {raw}"))
}

fn parse_quantity(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_err| format!("invalid quantity: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_and_without_quantity() {
        assert_eq!(
            parse_action("add 1"),
            Ok(Some(Action::Add {
                id: ProductId::new(1),
                quantity: 1
            }))
        );
        assert_eq!(
            parse_action("add 3 4"),
            Ok(Some(Action::Add {
                id: ProductId::new(3),
                quantity: 4
            }))
        );
    }

    #[test]
    fn parses_plus_minus_and_their_symbols() {
        assert_eq!(parse_action("plus 2"), Ok(Some(Action::Plus(ProductId::new(2)))));
        assert_eq!(parse_action("+ 2"), Ok(Some(Action::Plus(ProductId::new(2)))));
        assert_eq!(parse_action("minus 2"), Ok(Some(Action::Minus(ProductId::new(2)))));
        assert_eq!(parse_action("- 2"), Ok(Some(Action::Minus(ProductId::new(2)))));
    }

    #[test]
    fn parses_quantity_updates() {
        assert_eq!(
            parse_action("qty 1 5"),
            Ok(Some(Action::Quantity {
                id: ProductId::new(1),
                quantity: 5
            }))
        );
        assert!(parse_action("qty 1").is_err());
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_action(""), Ok(None));
        assert_eq!(parse_action("   "), Ok(None));
    }

    #[test]
    fn rejects_unknown_verbs_and_trailing_input() {
        assert!(parse_action("checkout").is_err());
        assert!(parse_action("show now").is_err());
        assert!(parse_action("add one").is_err());
    }
}
