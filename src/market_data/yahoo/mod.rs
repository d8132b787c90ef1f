//! Yahoo Finance market data integration.
//!
//! Uses the public `v8/finance/chart` endpoint, which carries both the
//! current regular-market price and daily bars in one response.

mod client;
mod types;

pub use client::{YahooFinanceClient, YAHOO_API_URL};
pub use types::*;
