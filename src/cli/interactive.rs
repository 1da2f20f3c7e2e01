use super::convert::convert_and_display;
use super::ui;
use crate::core::{CurrencyCode, QuoteSource};
use anyhow::Result;
use console::Term;
use tracing::info;

#[derive(Debug, PartialEq)]
enum Input {
    Quit,
    Swap,
    From(CurrencyCode),
    To(CurrencyCode),
    Amount(String),
}

fn parse_input(line: &str) -> Result<Input> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let input = match (words.next(), words.next()) {
        (None, _) => Input::Quit,
        (Some("quit" | "exit"), None) => Input::Quit,
        (Some("swap"), None) => Input::Swap,
        (Some("from"), Some(code)) => Input::From(code.parse()?),
        (Some("to"), Some(code)) => Input::To(code.parse()?),
        _ => Input::Amount(line.to_string()),
    };
    Ok(input)
}

fn print_pair(origin: &CurrencyCode, destination: &CurrencyCode) {
    println!(
        "{}",
        ui::style_text(&format!("{origin} → {destination}"), ui::StyleType::Title)
    );
}

/// Prompts for amounts until an empty line and returns the pair selected
/// when the session ended.
pub async fn run(
    source: &dyn QuoteSource,
    origin: CurrencyCode,
    destination: CurrencyCode,
) -> Result<(CurrencyCode, CurrencyCode)> {
    let term = Term::stdout();
    let (mut origin, mut destination) = (origin, destination);

    println!(
        "{}",
        ui::style_text(
            "Enter an amount to convert, 'swap', 'from CODE', 'to CODE', or an empty line to quit.",
            ui::StyleType::Subtle
        )
    );
    print_pair(&origin, &destination);

    loop {
        term.write_str("> ")?;
        let line = term.read_line()?;

        match parse_input(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Swap) => {
                std::mem::swap(&mut origin, &mut destination);
                print_pair(&origin, &destination);
            }
            Ok(Input::From(code)) => {
                origin = code;
                print_pair(&origin, &destination);
            }
            Ok(Input::To(code)) => {
                destination = code;
                print_pair(&origin, &destination);
            }
            Ok(Input::Amount(amount)) => {
                // Failures were already shown and logged; the session carries on.
                let _ = convert_and_display(source, &amount, &origin, &destination).await;
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Warning)),
        }
    }

    info!(%origin, %destination, "Interactive session finished");
    Ok((origin, destination))
}
