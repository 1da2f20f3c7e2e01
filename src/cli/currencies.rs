use super::ui;
use crate::core::currency::{CurrencyCode, SUPPORTED_CURRENCIES};
use comfy_table::{Cell, Color};

/// Table of the supported codes, marking the currently selected pair.
pub fn currencies_table(origin: &CurrencyCode, destination: &CurrencyCode) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Selected")]);

    for code in SUPPORTED_CURRENCIES {
        let selected = if code == origin.as_str() {
            Cell::new("origin").fg(Color::Green)
        } else if code == destination.as_str() {
            Cell::new("destination").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![Cell::new(code), selected]);
    }

    table.to_string()
}
