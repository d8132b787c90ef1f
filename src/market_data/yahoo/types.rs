//! Type definitions for Yahoo Finance chart API responses.

use serde::Deserialize;

/// Top-level `/v8/finance/chart/{symbol}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Bar open times in unix seconds
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    /// Closes aligned with `ChartResult::timestamp`; gaps are `null`
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// `(timestamp, close)` pairs with missing closes dropped.
    pub fn closes(&self) -> Vec<(i64, f64)> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };
        self.timestamp
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(ts, close)| close.map(|c| (*ts, c)))
            .collect()
    }

    /// Most recent non-null close.
    pub fn last_close(&self) -> Option<f64> {
        self.closes().last().map(|(_, close)| *close)
    }
}
