//! HTTP API.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/` | liveness |
//! | POST | `/api/trading-strategy` | size a dual-class pairs trade |
//! | GET | `/api/live-results` | relay live algorithm results |
//! | GET | `/get-stock-data` | daily closes for one ticker |

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{StockDataQuery, StockRecord, TradingRequest};

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::live::LiveResultsClient;
use crate::market_data::PriceProvider;
use crate::strategy::TradePlanner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TradePlanner>,
    pub prices: Arc<dyn PriceProvider>,
    pub live: Arc<LiveResultsClient>,
}

/// Create the API router.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/api/trading-strategy", post(handlers::trading_strategy))
        .route("/api/live-results", get(handlers::live_results))
        .route("/get-stock-data", get(handlers::stock_data))
        .with_state(state)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}

/// Credentialed CORS for the configured origins.
///
/// Wildcards cannot be combined with credentials, so any method and header
/// is allowed by mirroring the preflight request.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
