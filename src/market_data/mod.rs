//! Market data integrations for pair pricing.
//!
//! ## Yahoo Finance
//! Live equity quotes and daily history for the registry's share classes.
//!
//! ## Static feed
//! Fixed in-memory quotes for offline sizing and tests.

mod mock;
mod traits;
pub mod yahoo;

pub use mock::StaticPriceFeed;
#[cfg(test)]
pub use traits::MockPriceProvider;
pub use traits::{DailyClose, PriceProvider};
pub use yahoo::YahooFinanceClient;
