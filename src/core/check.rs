//! The profit check pipeline: validate, fetch both prices, calculate.

use crate::core::format::FormatError;
use crate::core::price::{FetchError, FetchErrorKind, PriceProvider, fetch_quotes};
use crate::core::profit::{DomainError, ProfitResult};
use crate::core::validation::{FormCandidate, FormInput, ValidationErrors, Validator};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CheckError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            CheckError::Validation(errors) => errors
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("\n"),
            CheckError::Fetch(e) if e.is_network() => {
                "Could not reach the price service. Please try again.".to_string()
            }
            CheckError::Fetch(_) | CheckError::Domain(_) | CheckError::Format(_) => {
                "Something went wrong while checking the price. \
                 Please try a different date or asset."
                    .to_string()
            }
        }
    }
}

/// Fetches both prices for a validated input and computes the profit.
#[instrument(
    skip_all,
    fields(
        asset = input.asset.id,
        currency = input.currency.abbreviation,
        date = %input.past_date
    )
)]
pub async fn compute_profit(
    input: &FormInput,
    provider: &(dyn PriceProvider + Send + Sync),
) -> Result<ProfitResult, CheckError> {
    let quotes = fetch_quotes(
        provider,
        input.asset.id,
        input.currency.abbreviation,
        input.past_date,
    )
    .await
    .inspect_err(|e| match &e.kind {
        FetchErrorKind::Network(_) => warn!(error = %e, "Price service unreachable"),
        _ => error!(error = %e, "Price service returned unusable data"),
    })?;

    let result = ProfitResult::from_quotes(input.principal, &quotes).inspect_err(|e| {
        error!(error = %e, "Invalid prices reached the calculator");
    })?;

    info!(
        profit = %result.profit_in_currency(),
        total = %result.total_value_in_currency(),
        "Computed profit"
    );
    Ok(result)
}

/// Runs the whole pipeline for raw user input.
pub async fn check(
    candidate: &FormCandidate,
    today: NaiveDate,
    validator: &Validator,
    provider: &(dyn PriceProvider + Send + Sync),
) -> Result<(FormInput, ProfitResult), CheckError> {
    let input = validator.validate(candidate, today)?;
    let result = compute_profit(&input, provider).await?;
    Ok((input, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::{AsOf, Lookup, PriceQuote};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Price(Decimal),
        Malformed,
        Unreachable,
    }

    struct ScriptedProvider {
        current: Reply,
        historical: Reply,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(current: Reply, historical: Reply) -> Self {
            Self {
                current,
                historical,
                calls: AtomicUsize::new(0),
            }
        }

        async fn reply(
            &self,
            reply: &Reply,
            lookup: Lookup,
            asset_id: &str,
            currency_code: &str,
            as_of: AsOf,
        ) -> Result<PriceQuote, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match reply {
                Reply::Price(unit_price) => Ok(PriceQuote {
                    asset_id: asset_id.to_string(),
                    currency_code: currency_code.to_string(),
                    unit_price: *unit_price,
                    as_of,
                }),
                Reply::Malformed => Err(FetchError::malformed(lookup, "missing currency key")),
                Reply::Unreachable => {
                    // Port 9 (discard) is never served in the test environment
                    let err = reqwest::get("http://127.0.0.1:9/").await.unwrap_err();
                    Err(FetchError::network(lookup, err))
                }
            }
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        async fn fetch_current_price(
            &self,
            asset_id: &str,
            currency_code: &str,
        ) -> Result<PriceQuote, FetchError> {
            self.reply(
                &self.current,
                Lookup::Current,
                asset_id,
                currency_code,
                AsOf::Current,
            )
            .await
        }

        async fn fetch_historical_price(
            &self,
            asset_id: &str,
            currency_code: &str,
            date: NaiveDate,
        ) -> Result<PriceQuote, FetchError> {
            self.reply(
                &self.historical,
                Lookup::Historical,
                asset_id,
                currency_code,
                AsOf::On(date),
            )
            .await
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn candidate(principal: &str) -> FormCandidate {
        FormCandidate {
            principal: principal.to_string(),
            currency: "usd".to_string(),
            asset: "bitcoin".to_string(),
            past_date: "2021-01-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_check_computes_profit() {
        let provider =
            ScriptedProvider::new(Reply::Price(dec!(25000)), Reply::Price(dec!(20000)));
        let (input, result) = check(&candidate("1000"), today(), &Validator::default(), &provider)
            .await
            .unwrap();

        assert_eq!(input.principal, dec!(1000));
        assert_eq!(result.asset_id, "bitcoin");
        assert_eq!(result.currency_code, "usd");
        assert_eq!(result.profit_in_currency(), dec!(250));
        assert_eq!(result.total_value_in_currency(), dec!(1250));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_provider() {
        let provider =
            ScriptedProvider::new(Reply::Price(dec!(25000)), Reply::Price(dec!(20000)));
        let err = check(&candidate("10"), today(), &Validator::default(), &provider)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Validation(_)));
        assert_eq!(
            err.user_message(),
            "amount: amount must be greater than or equal to 1000"
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_historical_payload_fails_whole_check() {
        let provider = ScriptedProvider::new(Reply::Price(dec!(25000)), Reply::Malformed);
        let err = check(&candidate("1000"), today(), &Validator::default(), &provider)
            .await
            .unwrap_err();

        match &err {
            CheckError::Fetch(e) => {
                assert_eq!(e.lookup, Lookup::Historical);
                assert!(matches!(e.kind, FetchErrorKind::Malformed(_)));
            }
            other => panic!("Expected fetch error, got {other:?}"),
        }
        assert!(err.user_message().starts_with("Something went wrong"));
    }

    #[tokio::test]
    async fn test_network_failure_asks_to_retry() {
        let provider = ScriptedProvider::new(Reply::Unreachable, Reply::Price(dec!(20000)));
        let err = check(&candidate("1000"), today(), &Validator::default(), &provider)
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            CheckError::Fetch(e) if e.lookup == Lookup::Current && e.is_network()
        ));
        assert_eq!(
            err.user_message(),
            "Could not reach the price service. Please try again."
        );
    }

    #[tokio::test]
    async fn test_zero_price_is_a_domain_error() {
        let provider =
            ScriptedProvider::new(Reply::Price(dec!(25000)), Reply::Price(Decimal::ZERO));
        let err = check(&candidate("1000"), today(), &Validator::default(), &provider)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::Domain(DomainError::NonPositive { .. })));
        assert!(err.user_message().starts_with("Something went wrong"));
    }
}
