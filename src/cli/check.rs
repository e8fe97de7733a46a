use super::ui;
use crate::core::format::{EnUsFormatter, FormatError};
use crate::core::profit::{Direction, ProfitResult};
use crate::core::validation::{FormCandidate, FormInput, Validator};
use crate::core::view::ProfitView;
use crate::core::{CheckError, PriceProvider, check};
use anyhow::{Context, Result};
use comfy_table::Cell;

impl ProfitView {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_table(&["Item", "Value"]);

        let rows = [
            ("Asset", &self.asset),
            ("Currency", &self.currency),
            ("Invested", &self.principal),
            ("Invested on", &self.past_date),
            ("Price then", &self.previous_unit_price),
            ("Price now", &self.current_unit_price),
            ("Units bought then", &self.previous_holding),
            ("Units at today's price", &self.current_holding),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), ui::amount_cell(value)]);
        }
        table.add_row(vec![
            Cell::new("Profit"),
            ui::direction_cell(&self.profit, self.direction),
        ]);

        let verdict = match self.direction {
            Direction::Gain => "gain",
            Direction::Loss => "loss",
            Direction::Flat => "no change",
        };

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Crypto Profit Checker", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nValue today ({}): {} {}",
            ui::style_text(&self.currency, ui::StyleType::TotalLabel),
            ui::style_text(&self.total_value, ui::StyleType::TotalLabel),
            ui::style_text(&format!("({verdict})"), ui::StyleType::Subtle),
        ));
        output
    }
}

/// Renders a successful check for the terminal.
pub fn render_result(input: &FormInput, result: &ProfitResult) -> Result<String, FormatError> {
    Ok(ProfitView::build(input, result, &EnUsFormatter)?.display_as_table())
}

/// Renders a failed check for the terminal, one line per problem.
pub fn render_error(err: &CheckError) -> String {
    err.user_message()
        .lines()
        .map(|line| ui::style_text(line, ui::StyleType::Error))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run(
    candidate: &FormCandidate,
    validator: &Validator,
    provider: &(dyn PriceProvider + Send + Sync),
) -> Result<()> {
    let today = chrono::Utc::now().date_naive();

    let pb = ui::new_spinner("Fetching prices...");
    let outcome = check(candidate, today, validator, provider).await;
    pb.finish_and_clear();

    match outcome {
        Ok((input, result)) => {
            let output = render_result(&input, &result).context("Failed to format result")?;
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", render_error(&e));
            Err(anyhow::Error::new(e).context("Profit check failed"))
        }
    }
}
