use crate::core::price::{
    AsOf, FetchError, Lookup, PriceProvider, PriceQuote, format_history_date,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// CoinGeckoProvider implementation for PriceProvider
pub struct CoinGeckoProvider {
    base_url: String,
    timeout: Duration,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

#[derive(Deserialize, Debug)]
struct CoinResponse {
    market_data: Option<MarketData>,
}

#[derive(Deserialize, Debug)]
struct MarketData {
    current_price: HashMap<String, f64>,
}

/// Top-level keys of a payload, and those of `market_data` when present. Used
/// to diagnose unexpected responses without logging their values.
fn payload_shape(payload: &Value) -> String {
    match payload {
        Value::Object(map) => {
            let keys: Vec<String> = map
                .iter()
                .map(|(key, value)| match (key.as_str(), value) {
                    ("market_data", Value::Object(inner)) => {
                        let inner: Vec<&str> = inner.keys().map(String::as_str).collect();
                        format!("market_data{{{}}}", inner.join(","))
                    }
                    _ => key.clone(),
                })
                .collect();
            format!("{{{}}}", keys.join(","))
        }
        Value::Array(_) => "array".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Null => "null".to_string(),
    }
}

fn extract_price(
    payload: Value,
    lookup: Lookup,
    asset_id: &str,
    currency_code: &str,
) -> Result<Decimal, FetchError> {
    let shape = payload_shape(&payload);
    let malformed = |reason: String| {
        warn!(%lookup, asset_id, currency_code, payload_shape = %shape, "{}", reason);
        FetchError::malformed(lookup, reason)
    };

    let response: CoinResponse = serde_json::from_value(payload)
        .map_err(|e| malformed(format!("unexpected payload for {asset_id}: {e}")))?;
    let market_data = response
        .market_data
        .ok_or_else(|| malformed(format!("no market data for {asset_id}")))?;
    let price = market_data
        .current_price
        .get(currency_code)
        .copied()
        .ok_or_else(|| malformed(format!("no {currency_code} price for {asset_id}")))?;

    Decimal::from_f64(price)
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| {
            malformed(format!(
                "invalid {currency_code} price {price} for {asset_id}"
            ))
        })
}

impl CoinGeckoProvider {
    async fn get_price(
        &self,
        url: &str,
        lookup: Lookup,
        asset_id: &str,
        currency_code: &str,
    ) -> Result<Decimal, FetchError> {
        debug!("Requesting {} price data from {}", lookup, url);

        let client = reqwest::Client::builder()
            .user_agent("cryptoprofit/1.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::network(lookup, e))?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(lookup, e))?;

        debug!(status = %response.status(), "Received CoinGecko response");

        if !response.status().is_success() {
            return Err(FetchError::status(lookup, response.status()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::network(lookup, e))?;
        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            warn!(%lookup, asset_id, length = text.len(), "Response is not JSON");
            FetchError::malformed(
                lookup,
                format!("failed to parse JSON response for {asset_id}: {e}"),
            )
        })?;

        extract_price(payload, lookup, asset_id, currency_code)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoCurrentPrice", skip(self))]
    async fn fetch_current_price(
        &self,
        asset_id: &str,
        currency_code: &str,
    ) -> Result<PriceQuote, FetchError> {
        let currency_code = currency_code.to_ascii_lowercase();
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true\
             &community_data=false&developer_data=false&sparkline=false",
            self.base_url, asset_id
        );

        let unit_price = self
            .get_price(&url, Lookup::Current, asset_id, &currency_code)
            .await?;

        Ok(PriceQuote {
            asset_id: asset_id.to_string(),
            currency_code,
            unit_price,
            as_of: AsOf::Current,
        })
    }

    #[instrument(name = "CoinGeckoHistoricalPrice", skip(self))]
    async fn fetch_historical_price(
        &self,
        asset_id: &str,
        currency_code: &str,
        date: NaiveDate,
    ) -> Result<PriceQuote, FetchError> {
        let currency_code = currency_code.to_ascii_lowercase();
        let url = format!(
            "{}/coins/{}/history?date={}&localization=false",
            self.base_url,
            asset_id,
            format_history_date(date)
        );

        let unit_price = self
            .get_price(&url, Lookup::Historical, asset_id, &currency_code)
            .await?;

        Ok(PriceQuote {
            asset_id: asset_id.to_string(),
            currency_code,
            unit_price,
            as_of: AsOf::On(date),
        })
    }
}
