//! Builds a trading strategy for a named dual-class security.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::allocator::{compute_allocation, AllocationError, AllocationResult, PriceQuote};
use super::registry::{RegistryError, SecurityRegistry};
use crate::market_data::PriceProvider;

/// The cheaper class is always the one sold short.
const ACTION_SHORT: &str = "Short";

/// Wire form of a sized pairs trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPlan {
    #[serde(with = "rust_decimal::serde::float")]
    pub spread: Decimal,
    pub strategy: StrategyDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyDetail {
    pub action: &'static str,
    pub ticker_short: String,
    pub shares_short: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_short: Decimal,
    pub ticker_long: String,
    pub shares_long: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_long: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_long_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_short_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub hedge_ratio: Decimal,
}

impl From<AllocationResult> for StrategyPlan {
    fn from(result: AllocationResult) -> Self {
        Self {
            spread: result.spread,
            strategy: StrategyDetail {
                action: ACTION_SHORT,
                ticker_short: result.short.ticker,
                shares_short: result.short.shares,
                price_short: result.short.price,
                ticker_long: result.long.ticker,
                shares_long: result.long.shares,
                price_long: result.long.price,
                total_long_value: result.total_long_value,
                total_short_value: result.total_short_value,
                hedge_ratio: result.hedge_ratio,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    UnknownSecurity(#[from] RegistryError),
    #[error("No price available for {0}")]
    PriceUnavailable(String),
    #[error(transparent)]
    InvalidInput(#[from] AllocationError),
    #[error("Price lookup for {ticker} failed: {source}")]
    Provider {
        ticker: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Resolves a security, prices both classes, and sizes the trade.
pub struct TradePlanner {
    registry: SecurityRegistry,
    prices: Arc<dyn PriceProvider>,
}

impl TradePlanner {
    pub fn new(registry: SecurityRegistry, prices: Arc<dyn PriceProvider>) -> Self {
        Self { registry, prices }
    }

    /// Plan an equal-dollar long/short trade of `investment_amount` in
    /// `security_name`. Both prices must resolve or the whole plan fails.
    #[instrument(skip(self))]
    pub async fn plan(
        &self,
        security_name: &str,
        investment_amount: u64,
    ) -> Result<StrategyPlan, PlanError> {
        let pair = self.registry.resolve_tickers(security_name)?;

        let quote_a = self.quote(pair.class_a).await?;
        let quote_b = self.quote(pair.class_b).await?;

        let result = compute_allocation(&quote_a, &quote_b, Decimal::from(investment_amount))?;

        info!(
            %security_name,
            long = %result.long.ticker,
            shares_long = result.long.shares,
            short = %result.short.ticker,
            shares_short = result.short.shares,
            hedge_ratio = %result.hedge_ratio,
            "Planned pairs trade"
        );

        Ok(result.into())
    }

    async fn quote(&self, ticker: &str) -> Result<PriceQuote, PlanError> {
        let price = self
            .prices
            .latest_price(ticker)
            .await
            .map_err(|source| PlanError::Provider {
                ticker: ticker.to_string(),
                source,
            })?;

        match price {
            Some(price) if price > Decimal::ZERO => Ok(PriceQuote::new(ticker, price)),
            _ => {
                warn!(%ticker, ?price, "Price unavailable");
                Err(PlanError::PriceUnavailable(ticker.to_string()))
            }
        }
    }
}
