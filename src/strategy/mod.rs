//! Pairs trading strategy.
//!
//! Contains the core logic for:
//! - Resolving a company to its dual-class tickers
//! - Hedge-ratio sizing of the long and short legs
//! - Planning a full strategy from live prices

mod allocator;
mod planner;
mod registry;

pub use allocator::{
    compute_allocation, hedge_ratio, spread, AllocationError, AllocationResult, HedgeLeg,
    PriceQuote,
};
pub use planner::{PlanError, StrategyDetail, StrategyPlan, TradePlanner};
pub use registry::{RegistryError, SecurityRegistry, TickerPair};
