//! Holdings and profit arithmetic.
//!
//! All figures are derived from the principal and two unit prices:
//!
//! ```text
//! current_holding   = principal / current_price
//! previous_holding  = principal / previous_price
//! holding_delta     = previous_holding - current_holding
//! projected_holding = holding_delta + current_holding
//! profit            = current_price * holding_delta
//! total_value       = current_price * projected_holding
//! ```
//!
//! `holding_delta` is the number of extra units the past purchase holds
//! compared to buying at today's price, so a price rise gives a positive
//! profit and `total_value` is what the past investment is worth today.

use crate::core::price::QuotePair;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{name} must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: Decimal },
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Units of the asset bought at each price, and what they are worth now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holdings {
    pub current_holding: Decimal,
    pub previous_holding: Decimal,
    pub holding_delta: Decimal,
    pub projected_holding: Decimal,
    pub profit_in_currency: Decimal,
    pub total_value_in_currency: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gain,
    Loss,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitResult {
    pub asset_id: String,
    pub currency_code: String,
    pub previous_unit_price: Decimal,
    pub current_unit_price: Decimal,
    pub holdings: Holdings,
}

impl ProfitResult {
    /// Combines both quotes of a check with the principal.
    pub fn from_quotes(principal: Decimal, quotes: &QuotePair) -> Result<Self, DomainError> {
        let holdings = calculate(
            principal,
            quotes.historical.unit_price,
            quotes.current.unit_price,
        )?;
        Ok(Self {
            asset_id: quotes.current.asset_id.clone(),
            currency_code: quotes.current.currency_code.clone(),
            previous_unit_price: quotes.historical.unit_price,
            current_unit_price: quotes.current.unit_price,
            holdings,
        })
    }

    pub fn profit_in_currency(&self) -> Decimal {
        self.holdings.profit_in_currency
    }

    pub fn total_value_in_currency(&self) -> Decimal {
        self.holdings.total_value_in_currency
    }

    pub fn direction(&self) -> Direction {
        match self.holdings.profit_in_currency.cmp(&Decimal::ZERO) {
            Ordering::Greater => Direction::Gain,
            Ordering::Less => Direction::Loss,
            Ordering::Equal => Direction::Flat,
        }
    }
}

fn ensure_positive(name: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(DomainError::NonPositive { name, value })
    }
}

/// Computes holdings for `principal` invested at `previous_price` versus
/// `current_price`.
pub fn calculate(
    principal: Decimal,
    previous_price: Decimal,
    current_price: Decimal,
) -> Result<Holdings, DomainError> {
    let principal = ensure_positive("principal", principal)?;
    let previous_price = ensure_positive("previous unit price", previous_price)?;
    let current_price = ensure_positive("current unit price", current_price)?;

    let current_holding = principal
        .checked_div(current_price)
        .ok_or(DomainError::Overflow("current holding"))?;
    let previous_holding = principal
        .checked_div(previous_price)
        .ok_or(DomainError::Overflow("previous holding"))?;
    let holding_delta = previous_holding
        .checked_sub(current_holding)
        .ok_or(DomainError::Overflow("holding delta"))?;
    let projected_holding = holding_delta
        .checked_add(current_holding)
        .ok_or(DomainError::Overflow("projected holding"))?;
    let profit_in_currency = current_price
        .checked_mul(holding_delta)
        .ok_or(DomainError::Overflow("profit"))?;
    let total_value_in_currency = current_price
        .checked_mul(projected_holding)
        .ok_or(DomainError::Overflow("total value"))?;

    Ok(Holdings {
        current_holding,
        previous_holding,
        holding_delta,
        projected_holding,
        profit_in_currency,
        total_value_in_currency,
    })
}
