//! Currency formatting in the en-US locale

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// Formats amounts for display. Swappable so callers can be tested without
/// depending on a particular locale table.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, code: &str, value: Decimal) -> Result<String, FormatError>;
}

/// Symbol placement, grouping and rounding as used for US English.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnUsFormatter;

struct LocaleCurrency {
    prefix: &'static str,
    minor_units: u32,
}

fn en_us_currency(code: &str) -> Option<LocaleCurrency> {
    let (prefix, minor_units) = match code.trim().to_ascii_lowercase().as_str() {
        "usd" => ("$", 2),
        "eur" => ("€", 2),
        "jpy" => ("¥", 0),
        "gbp" => ("£", 2),
        "chf" => ("CHF ", 2),
        "cad" => ("CA$", 2),
        "aud" => ("A$", 2),
        "zar" => ("ZAR ", 2),
        _ => return None,
    };
    Some(LocaleCurrency {
        prefix,
        minor_units,
    })
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl CurrencyFormatter for EnUsFormatter {
    fn format(&self, code: &str, value: Decimal) -> Result<String, FormatError> {
        let currency = en_us_currency(code)
            .ok_or_else(|| FormatError::UnsupportedCurrency(code.to_string()))?;

        let rounded = value
            .round_dp_with_strategy(currency.minor_units, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let plain = format!("{:.*}", currency.minor_units as usize, rounded.abs());
        let (whole, fraction) = match plain.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (plain.as_str(), None),
        };

        let mut out = format!("{sign}{}{}", currency.prefix, group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        Ok(out)
    }
}

/// Formats `value` in the currency identified by `code` using [`EnUsFormatter`].
pub fn format_currency(code: &str, value: Decimal) -> Result<String, FormatError> {
    EnUsFormatter.format(code, value)
}
