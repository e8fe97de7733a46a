//! Validation of user supplied check requests

use crate::core::options::{CryptoOption, CurrencyOption};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MIN_PRINCIPAL: Decimal = Decimal::ONE_THOUSAND;

/// A request exactly as entered by the user, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormCandidate {
    pub principal: String,
    pub currency: String,
    pub asset: String,
    pub past_date: String,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub principal: Decimal,
    pub currency: &'static CurrencyOption,
    pub asset: &'static CryptoOption,
    pub past_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Principal,
    Currency,
    Asset,
    PastDate,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Field::Principal => "amount",
                Field::Currency => "currency",
                Field::Asset => "asset",
                Field::PastDate => "date",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every rule that failed for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input: {}", describe(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    min_principal: Decimal,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PRINCIPAL)
    }
}

impl Validator {
    pub fn new(min_principal: Decimal) -> Self {
        Self { min_principal }
    }

    pub fn min_principal(&self) -> Decimal {
        self.min_principal
    }

    /// Checks all fields of `candidate`. Dates after `today` are rejected.
    pub fn validate(
        &self,
        candidate: &FormCandidate,
        today: NaiveDate,
    ) -> Result<FormInput, ValidationErrors> {
        let principal = self.check_principal(&candidate.principal);
        let currency = check_currency(&candidate.currency);
        let asset = check_asset(&candidate.asset);
        let past_date = check_past_date(&candidate.past_date, today);

        match (principal, currency, asset, past_date) {
            (Ok(principal), Ok(currency), Ok(asset), Ok(past_date)) => Ok(FormInput {
                principal,
                currency,
                asset,
                past_date,
            }),
            (principal, currency, asset, past_date) => {
                let errors = [
                    principal.err(),
                    currency.err(),
                    asset.err(),
                    past_date.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ValidationErrors { errors })
            }
        }
    }

    fn check_principal(&self, raw: &str) -> Result<Decimal, FieldError> {
        let fail = |message: String| FieldError {
            field: Field::Principal,
            message,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(fail("amount is required".to_string()));
        }

        let cleaned: String = CurrencyOption::strip_symbol(trimmed)
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        let amount = Decimal::from_str(&cleaned)
            .map_err(|_| fail(format!("amount must be a number, got '{trimmed}'")))?;

        if amount <= Decimal::ZERO {
            return Err(fail("amount must be a positive number".to_string()));
        }
        if amount < self.min_principal {
            return Err(fail(format!(
                "amount must be greater than or equal to {}",
                self.min_principal
            )));
        }
        Ok(amount)
    }
}

fn check_currency(raw: &str) -> Result<&'static CurrencyOption, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError {
            field: Field::Currency,
            message: "currency is required".to_string(),
        });
    }
    CurrencyOption::find(raw).ok_or_else(|| FieldError {
        field: Field::Currency,
        message: format!("unsupported currency '{}'", raw.trim()),
    })
}

fn check_asset(raw: &str) -> Result<&'static CryptoOption, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError {
            field: Field::Asset,
            message: "asset is required".to_string(),
        });
    }
    CryptoOption::find(raw).ok_or_else(|| FieldError {
        field: Field::Asset,
        message: format!("unsupported asset '{}'", raw.trim()),
    })
}

fn check_past_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
    let fail = |message: String| FieldError {
        field: Field::PastDate,
        message,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(fail("date is required".to_string()));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| fail(format!("date must be in YYYY-MM-DD format, got '{trimmed}'")))?;
    if date > today {
        return Err(fail(format!(
            "date must not be later than {}",
            today.format("%Y-%m-%d")
        )));
    }
    Ok(date)
}
