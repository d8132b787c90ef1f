//! In-memory price feed for offline sizing and tests.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{DailyClose, PriceProvider};

/// Price provider backed by fixed, caller-supplied quotes.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceFeed {
    prices: Arc<RwLock<HashMap<String, Decimal>>>,
    histories: Arc<RwLock<HashMap<String, Vec<DailyClose>>>>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a feed from `(ticker, price)` pairs.
    pub fn from_prices<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let map = prices.into_iter().map(|(t, p)| (t.into(), p)).collect();
        Self {
            prices: Arc::new(RwLock::new(map)),
            histories: Arc::default(),
        }
    }

    pub async fn set_price(&self, ticker: &str, price: Decimal) {
        self.prices.write().await.insert(ticker.to_string(), price);
    }

    pub async fn set_history(&self, ticker: &str, bars: Vec<DailyClose>) {
        self.histories.write().await.insert(ticker.to_string(), bars);
    }
}

#[async_trait]
impl PriceProvider for StaticPriceFeed {
    async fn latest_price(&self, ticker: &str) -> Result<Option<Decimal>> {
        if let Some(price) = self.prices.read().await.get(ticker) {
            return Ok(Some(*price));
        }
        // Mirror the live fallback: last known close when no quote is set.
        let close = self
            .histories
            .read()
            .await
            .get(ticker)
            .and_then(|bars| bars.last())
            .map(|bar| bar.close);
        debug!(%ticker, ?close, "Static feed miss, using history");
        Ok(close)
    }

    async fn history(&self, ticker: &str, _period: &str, _interval: &str) -> Result<Vec<DailyClose>> {
        Ok(self
            .histories
            .read()
            .await
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_static_prices() {
        let feed = StaticPriceFeed::from_prices([("BRK-B", dec!(410)), ("BRK-A", dec!(615000))]);
        assert_eq!(feed.latest_price("BRK-B").await.unwrap(), Some(dec!(410)));
        assert_eq!(feed.latest_price("GOOG").await.unwrap(), None);

        feed.set_price("GOOG", dec!(164.1)).await;
        assert_eq!(feed.latest_price("GOOG").await.unwrap(), Some(dec!(164.1)));
    }

    #[tokio::test]
    async fn test_history_fallback() {
        let feed = StaticPriceFeed::new();
        let bars = vec![
            DailyClose {
                date: Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
                close: dec!(27.1),
            },
            DailyClose {
                date: Utc.with_ymd_and_hms(2024, 6, 4, 0, 0, 0).unwrap(),
                close: dec!(27.4),
            },
        ];
        feed.set_history("CRD-A", bars.clone()).await;

        assert_eq!(feed.latest_price("CRD-A").await.unwrap(), Some(dec!(27.4)));
        assert_eq!(feed.history("CRD-A", "1mo", "1d").await.unwrap(), bars);
        assert!(feed.history("CRD-B", "1mo", "1d").await.unwrap().is_empty());
    }
}
