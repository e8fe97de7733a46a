//! Pricing abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join;
use rust_decimal::Decimal;
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, instrument};

/// Point in time a quote refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsOf {
    Current,
    On(NaiveDate),
}

impl Display for AsOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsOf::Current => write!(f, "current"),
            AsOf::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub asset_id: String,
    pub currency_code: String,
    /// Always greater than zero.
    pub unit_price: Decimal,
    pub as_of: AsOf,
}

/// Which of the two lookups of a check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Current,
    Historical,
}

impl Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Lookup::Current => "current",
                Lookup::Historical => "historical",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// Connection failure or timeout.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    /// The response arrived but did not carry a usable price.
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
#[error("{lookup} price lookup failed, {kind}")]
pub struct FetchError {
    pub lookup: Lookup,
    #[source]
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn network(lookup: Lookup, err: reqwest::Error) -> Self {
        Self {
            lookup,
            kind: FetchErrorKind::Network(err),
        }
    }

    pub fn status(lookup: Lookup, status: reqwest::StatusCode) -> Self {
        Self {
            lookup,
            kind: FetchErrorKind::Status(status),
        }
    }

    pub fn malformed(lookup: Lookup, reason: impl Into<String>) -> Self {
        Self {
            lookup,
            kind: FetchErrorKind::Malformed(reason.into()),
        }
    }

    /// Network failures may succeed when the user submits again; bad upstream
    /// data will not.
    pub fn is_network(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Network(_))
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_current_price(
        &self,
        asset_id: &str,
        currency_code: &str,
    ) -> Result<PriceQuote, FetchError>;

    async fn fetch_historical_price(
        &self,
        asset_id: &str,
        currency_code: &str,
        date: NaiveDate,
    ) -> Result<PriceQuote, FetchError>;
}

/// Both quotes needed for one profit calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePair {
    pub current: PriceQuote,
    pub historical: PriceQuote,
}

/// Looks up the current and the historical price concurrently. Fails if
/// either lookup fails.
#[instrument(skip(provider))]
pub async fn fetch_quotes(
    provider: &(dyn PriceProvider + Send + Sync),
    asset_id: &str,
    currency_code: &str,
    date: NaiveDate,
) -> Result<QuotePair, FetchError> {
    let (current, historical) = try_join(
        provider.fetch_current_price(asset_id, currency_code),
        provider.fetch_historical_price(asset_id, currency_code, date),
    )
    .await?;

    debug!(
        current = %current.unit_price,
        historical = %historical.unit_price,
        "Fetched both quotes"
    );
    Ok(QuotePair {
        current,
        historical,
    })
}

/// Renders a date the way the history endpoint expects it, e.g. `30-12-2017`.
pub fn format_history_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockPriceProvider {
        current: Option<Decimal>,
        historical: Option<Decimal>,
        calls: AtomicUsize,
    }

    impl MockPriceProvider {
        fn new(current: Option<Decimal>, historical: Option<Decimal>) -> Self {
            Self {
                current,
                historical,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceProvider for MockPriceProvider {
        async fn fetch_current_price(
            &self,
            asset_id: &str,
            currency_code: &str,
        ) -> Result<PriceQuote, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let unit_price = self
                .current
                .ok_or_else(|| FetchError::malformed(Lookup::Current, "no price"))?;
            Ok(PriceQuote {
                asset_id: asset_id.to_string(),
                currency_code: currency_code.to_string(),
                unit_price,
                as_of: AsOf::Current,
            })
        }

        async fn fetch_historical_price(
            &self,
            asset_id: &str,
            currency_code: &str,
            date: NaiveDate,
        ) -> Result<PriceQuote, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let unit_price = self.historical.ok_or_else(|| {
                FetchError::status(Lookup::Historical, reqwest::StatusCode::NOT_FOUND)
            })?;
            Ok(PriceQuote {
                asset_id: asset_id.to_string(),
                currency_code: currency_code.to_string(),
                unit_price,
                as_of: AsOf::On(date),
            })
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 9).unwrap()
    }

    #[test]
    fn test_format_history_date() {
        assert_eq!(format_history_date(date()), "09-03-2020");
        assert_eq!(
            format_history_date(NaiveDate::from_ymd_opt(2017, 12, 30).unwrap()),
            "30-12-2017"
        );
    }

    #[test]
    fn test_as_of_display() {
        assert_eq!(AsOf::Current.to_string(), "current");
        assert_eq!(AsOf::On(date()).to_string(), "2020-03-09");
    }

    #[tokio::test]
    async fn test_fetch_quotes_returns_both() {
        let provider = MockPriceProvider::new(Some(dec!(25000)), Some(dec!(20000)));
        let pair = fetch_quotes(&provider, "bitcoin", "usd", date())
            .await
            .unwrap();
        assert_eq!(pair.current.unit_price, dec!(25000));
        assert_eq!(pair.current.as_of, AsOf::Current);
        assert_eq!(pair.historical.unit_price, dec!(20000));
        assert_eq!(pair.historical.as_of, AsOf::On(date()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_quotes_fails_when_historical_fails() {
        let provider = MockPriceProvider::new(Some(dec!(25000)), None);
        let err = fetch_quotes(&provider, "bitcoin", "usd", date())
            .await
            .unwrap_err();
        assert_eq!(err.lookup, Lookup::Historical);
        assert!(matches!(
            err.kind,
            FetchErrorKind::Status(s) if s == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(!err.is_network());
        assert_eq!(
            err.to_string(),
            "historical price lookup failed, HTTP error: 404 Not Found"
        );
    }

    #[tokio::test]
    async fn test_fetch_quotes_fails_when_current_fails() {
        let provider = MockPriceProvider::new(None, Some(dec!(20000)));
        let err = fetch_quotes(&provider, "bitcoin", "usd", date())
            .await
            .unwrap_err();
        assert_eq!(err.lookup, Lookup::Current);
        assert!(matches!(err.kind, FetchErrorKind::Malformed(_)));
    }
}
