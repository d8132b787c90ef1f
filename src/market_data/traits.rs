//! Provider-agnostic price lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One daily bar reduced to its close.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyClose {
    pub date: DateTime<Utc>,
    pub close: Decimal,
}

/// Source of equity prices.
///
/// `Ok(None)` means the provider answered but has no usable price; errors are
/// reserved for transport and decoding failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Current price, falling back to the most recent close.
    async fn latest_price(&self, ticker: &str) -> anyhow::Result<Option<Decimal>>;

    /// Daily closes for `ticker` over `period` sampled at `interval`, oldest first.
    async fn history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> anyhow::Result<Vec<DailyClose>>;
}
