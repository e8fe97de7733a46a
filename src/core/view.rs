//! Display strings for a completed check

use crate::core::format::{CurrencyFormatter, FormatError};
use crate::core::profit::{Direction, ProfitResult};
use crate::core::validation::FormInput;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitView {
    pub asset: String,
    pub currency: String,
    pub principal: String,
    pub past_date: String,
    pub previous_unit_price: String,
    pub current_unit_price: String,
    pub previous_holding: String,
    pub current_holding: String,
    pub profit: String,
    pub total_value: String,
    pub direction: Direction,
}

impl ProfitView {
    pub fn build(
        input: &FormInput,
        result: &ProfitResult,
        formatter: &dyn CurrencyFormatter,
    ) -> Result<Self, FormatError> {
        let code = input.currency.abbreviation;
        let ticker = input.asset.symbol.to_uppercase();
        let holding = |units: Decimal| format!("{units:.8} {ticker}");

        Ok(Self {
            asset: format!("{} ({ticker})", input.asset.id),
            currency: code.to_uppercase(),
            principal: formatter.format(code, input.principal)?,
            past_date: input.past_date.format("%Y-%m-%d").to_string(),
            previous_unit_price: formatter.format(code, result.previous_unit_price)?,
            current_unit_price: formatter.format(code, result.current_unit_price)?,
            previous_holding: holding(result.holdings.previous_holding),
            current_holding: holding(result.holdings.current_holding),
            profit: formatter.format(code, result.profit_in_currency())?,
            total_value: formatter.format(code, result.total_value_in_currency())?,
            direction: result.direction(),
        })
    }
}
