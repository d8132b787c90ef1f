//! Yahoo Finance chart API client.
//!
//! Price resolution order:
//! - `regularMarketPrice` from the chart metadata
//! - most recent daily close within the fallback window (default 2 days)
//! - unavailable

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::*;
use crate::config::MarketDataConfig;
use crate::market_data::traits::{DailyClose, PriceProvider};
use crate::utils::decimal::from_quote;

/// Base URL for the public Yahoo Finance query API.
pub const YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = concat!("dual-class-arbitrage/", env!("CARGO_PKG_VERSION"));

/// Yahoo Finance client for quotes and daily history.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    fallback_period: String,
}

impl YahooFinanceClient {
    /// Create a new client from configuration.
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fallback_period: config.fallback_period.clone(),
        })
    }

    /// Create a client against a custom base URL with default settings.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&MarketDataConfig {
            base_url: base_url.to_string(),
            ..MarketDataConfig::default()
        })
    }

    /// Fetch the chart for `ticker`. Returns `None` when the symbol is unknown.
    #[instrument(skip(self), name = "yahoo_chart")]
    pub async fn get_chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<Option<ChartResult>> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(ticker)
        );

        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .context("Failed to send chart request")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%ticker, "Symbol not found on Yahoo Finance");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Yahoo Finance API error {}: {}", status, body);
        }

        let data: ChartResponse = response
            .json()
            .await
            .context("Failed to parse chart response")?;

        if let Some(err) = &data.chart.error {
            warn!(%ticker, code = %err.code, description = %err.description, "Chart returned error");
        }

        Ok(data.chart.result.and_then(|r| r.into_iter().next()))
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceClient {
    #[instrument(skip(self), name = "yahoo_latest_price")]
    async fn latest_price(&self, ticker: &str) -> Result<Option<Decimal>> {
        let Some(chart) = self.get_chart(ticker, &self.fallback_period, "1d").await? else {
            return Ok(None);
        };

        let market_price = chart
            .meta
            .regular_market_price
            .and_then(from_quote)
            .filter(|p| *p > Decimal::ZERO);
        if let Some(price) = market_price {
            debug!(%ticker, %price, currency = ?chart.meta.currency, "Using regular market price");
            return Ok(Some(price));
        }

        let last_close = chart
            .last_close()
            .and_then(from_quote)
            .filter(|p| *p > Decimal::ZERO);
        match last_close {
            Some(price) => debug!(%ticker, %price, "Falling back to most recent close"),
            None => warn!(%ticker, "No price available"),
        }
        Ok(last_close)
    }

    #[instrument(skip(self), name = "yahoo_history")]
    async fn history(&self, ticker: &str, period: &str, interval: &str) -> Result<Vec<DailyClose>> {
        let Some(chart) = self.get_chart(ticker, period, interval).await? else {
            return Ok(Vec::new());
        };

        let bars: Vec<DailyClose> = chart
            .closes()
            .into_iter()
            .filter_map(|(ts, close)| {
                let date = DateTime::<Utc>::from_timestamp(ts, 0)?;
                let close = from_quote(close)?;
                Some(DailyClose { date, close })
            })
            .collect();

        debug!("Fetched {} closes for {}", bars.len(), ticker);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chart_body(symbol: &str, market_price: Option<f64>, closes: Vec<Option<f64>>) -> serde_json::Value {
        let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| 1717075800 + i * 86400).collect();
        json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": symbol, "currency": "USD", "regularMarketPrice": market_price},
                    "timestamp": timestamps,
                    "indicators": {"quote": [{"close": closes}]}
                }],
                "error": null
            }
        })
    }

    #[tokio::test]
    async fn test_latest_price_prefers_market_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/GOOGL"))
            .and(query_param("range", "2d"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                "GOOGL",
                Some(163.95),
                vec![Some(161.0), Some(162.5)],
            )))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        let price = client.latest_price("GOOGL").await.unwrap();
        assert_eq!(price, Some(dec!(163.95)));
    }

    #[tokio::test]
    async fn test_latest_price_falls_back_to_last_close() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/HVT-A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                "HVT-A",
                None,
                vec![Some(31.2), Some(31.75), None],
            )))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        let price = client.latest_price("HVT-A").await.unwrap();
        assert_eq!(price, Some(dec!(31.75)));
    }

    #[tokio::test]
    async fn test_latest_price_unavailable_without_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/GTN-A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body("GTN-A", None, vec![])))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        assert_eq!(client.latest_price("GTN-A").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/NOPE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}
            })))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        assert_eq!(client.latest_price("NOPE").await.unwrap(), None);
        assert!(client.history("NOPE", "1mo", "1d").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        let err = client.latest_price("GOOG").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_history_skips_null_closes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MOG-A"))
            .and(query_param("range", "1mo"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                "MOG-A",
                Some(180.0),
                vec![Some(178.5), None, Some(180.25)],
            )))
            .mount(&server)
            .await;

        let client = YahooFinanceClient::with_base_url(&server.uri()).unwrap();
        let bars = client.history("MOG-A", "1mo", "1d").await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, dec!(178.5));
        assert_eq!(bars[1].close, dec!(180.25));
        assert_eq!(bars[0].date.timestamp(), 1717075800);
        assert_eq!(bars[1].date.timestamp(), 1717075800 + 2 * 86400);
    }
}
