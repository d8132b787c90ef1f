//! # Dual-Class Arbitrage
//!
//! HTTP service that sizes market-neutral long/short trades across the two
//! share classes of a company, and relays live algorithm results from
//! QuantConnect.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `secrets`: Credential lookup (environment or mounted secret store)
//! - `market_data`: Price lookup (Yahoo Finance, static feed)
//! - `strategy`: Security registry, hedge-ratio allocation, trade planning
//! - `live`: Signed QuantConnect live results client
//! - `api`: axum router, handlers, and error mapping
//! - `utils`: Shared utilities and decimal arithmetic

pub mod api;
pub mod config;
pub mod live;
pub mod market_data;
pub mod secrets;
pub mod strategy;
pub mod utils;

pub use config::Config;
