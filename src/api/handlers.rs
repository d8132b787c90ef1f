//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::live::LiveResults;
use crate::market_data::DailyClose;
use crate::strategy::StrategyPlan;

#[derive(Debug, Deserialize)]
pub struct TradingRequest {
    pub security_name: String,
    pub investment_amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct StockDataQuery {
    pub ticker: String,
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_period() -> String {
    "1mo".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

/// One row of `/get-stock-data`.
#[derive(Debug, Serialize)]
pub struct StockRecord {
    #[serde(rename = "Date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "Close", with = "rust_decimal::serde::float")]
    pub close: Decimal,
}

impl From<DailyClose> for StockRecord {
    fn from(bar: DailyClose) -> Self {
        Self {
            date: bar.date,
            close: bar.close,
        }
    }
}

/// Liveness probe.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API is running!" }))
}

/// Size a long/short trade for a dual-class security.
pub async fn trading_strategy(
    State(state): State<AppState>,
    payload: Result<Json<TradingRequest>, JsonRejection>,
) -> Result<Json<StrategyPlan>, ApiError> {
    let Json(request) = payload?;
    if request.investment_amount == 0 {
        return Err(ApiError::Validation(
            "investment_amount must be positive".to_string(),
        ));
    }

    let plan = state
        .planner
        .plan(&request.security_name, request.investment_amount)
        .await?;
    Ok(Json(plan))
}

/// Relay live algorithm results.
///
/// Upstream error statuses come back as `200` with `success: false` so the
/// frontend can tell them apart from a failed call.
pub async fn live_results(State(state): State<AppState>) -> Result<Response, ApiError> {
    let results = state
        .live
        .fetch()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch live trading results.", e))?;

    Ok(match results {
        LiveResults::Relayed(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        LiveResults::Upstream(failure) => Json(failure).into_response(),
    })
}

/// Daily closing prices for a single ticker.
pub async fn stock_data(
    State(state): State<AppState>,
    Query(query): Query<StockDataQuery>,
) -> Result<Json<Vec<StockRecord>>, ApiError> {
    let bars = state
        .prices
        .history(&query.ticker, &query.period, &query.interval)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch stock data", e))?;

    if bars.is_empty() {
        return Err(ApiError::NotFound(
            "No data found for the ticker".to_string(),
        ));
    }

    Ok(Json(bars.into_iter().map(StockRecord::from).collect()))
}
