use super::ui;
use crate::core::options::{CRYPTOS, CURRENCIES};
use comfy_table::Cell;

/// Renders the supported currencies and assets.
pub fn render() -> String {
    let mut currencies = ui::new_table(&["Currency", "Symbol"]);
    for currency in CURRENCIES {
        currencies.add_row(vec![Cell::new(currency.abbreviation), Cell::new(currency.symbol)]);
    }

    let mut assets = ui::new_table(&["Asset", "Symbol"]);
    for asset in CRYPTOS {
        assets.add_row(vec![Cell::new(asset.id), Cell::new(asset.symbol)]);
    }

    format!(
        "{}\n{currencies}\n\n{}\n{assets}",
        ui::style_text("Currencies", ui::StyleType::Title),
        ui::style_text("Assets", ui::StyleType::Title),
    )
}

pub fn run() {
    println!("{}", render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_option() {
        let output = render();
        for currency in CURRENCIES {
            assert!(output.contains(currency.abbreviation));
        }
        for asset in CRYPTOS {
            assert!(output.contains(asset.id));
            assert!(output.contains(asset.symbol));
        }
    }
}
