//! Hedge-ratio share allocation for a dual-class pair.
//!
//! The more expensive class is bought (long) and the cheaper class is sold
//! short, sized so both legs carry the same dollar exposure:
//!
//! ```text
//! hedge_ratio  = min(p_a, p_b) / max(p_a, p_b)
//! shares_short = investment / (p_short + hedge_ratio * p_long)
//! shares_long  = shares_short * hedge_ratio
//! ```
//!
//! Both share counts are truncated to whole shares, so each leg's dollar value
//! may fall short of its target by at most one share's price.

use crate::utils::decimal::{abs_diff, round_to_precision, whole_shares};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Decimal places used for the reported spread.
const SPREAD_DECIMALS: u32 = 2;

/// A ticker with its price at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub ticker: String,
    pub price: Decimal,
}

impl PriceQuote {
    pub fn new(ticker: impl Into<String>, price: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            price,
        }
    }
}

/// One side of the pairs trade.
#[derive(Debug, Clone, PartialEq)]
pub struct HedgeLeg {
    pub ticker: String,
    pub shares: u64,
    pub price: Decimal,
}

impl HedgeLeg {
    /// Dollar exposure of this leg.
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.shares) * self.price
    }
}

/// Result of sizing a long/short pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    /// Lower price over higher price, in (0, 1]
    pub hedge_ratio: Decimal,
    /// Higher-priced class
    pub long: HedgeLeg,
    /// Lower-or-equal-priced class
    pub short: HedgeLeg,
    pub total_long_value: Decimal,
    pub total_short_value: Decimal,
    /// |p_a - p_b| rounded to 2 decimal places
    pub spread: Decimal,
}

impl AllocationResult {
    /// Dollar imbalance between the two legs.
    pub fn exposure_gap(&self) -> Decimal {
        abs_diff(self.total_long_value, self.total_short_value)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("Price for {ticker} must be positive, got {price}")]
    NonPositivePrice { ticker: String, price: Decimal },
    #[error("Investment amount must be positive, got {0}")]
    NonPositiveInvestment(Decimal),
    #[error("Position size for investment {0} is out of range")]
    Overflow(Decimal),
}

/// Ratio of the lower to the higher of two prices.
pub fn hedge_ratio(price_a: Decimal, price_b: Decimal) -> Decimal {
    price_a.min(price_b) / price_a.max(price_b)
}

/// Absolute price spread rounded for display.
pub fn spread(price_a: Decimal, price_b: Decimal) -> Decimal {
    round_to_precision(abs_diff(price_a, price_b), SPREAD_DECIMALS)
}

/// Size an equal-dollar long/short position across two share classes.
///
/// When prices are equal, `quote_b` takes the short leg.
pub fn compute_allocation(
    quote_a: &PriceQuote,
    quote_b: &PriceQuote,
    investment_amount: Decimal,
) -> Result<AllocationResult, AllocationError> {
    for quote in [quote_a, quote_b] {
        if quote.price <= Decimal::ZERO {
            return Err(AllocationError::NonPositivePrice {
                ticker: quote.ticker.clone(),
                price: quote.price,
            });
        }
    }
    if investment_amount <= Decimal::ZERO {
        return Err(AllocationError::NonPositiveInvestment(investment_amount));
    }

    let ratio = hedge_ratio(quote_a.price, quote_b.price);

    let (long_quote, short_quote) = if quote_b.price <= quote_a.price {
        (quote_a, quote_b)
    } else {
        (quote_b, quote_a)
    };

    let overflow = || AllocationError::Overflow(investment_amount);
    let pair_cost = ratio
        .checked_mul(long_quote.price)
        .and_then(|hedged| hedged.checked_add(short_quote.price))
        .ok_or_else(overflow)?;
    let short_qty = investment_amount
        .checked_div(pair_cost)
        .ok_or_else(overflow)?;
    let long_qty = short_qty.checked_mul(ratio).ok_or_else(overflow)?;

    let long = HedgeLeg {
        ticker: long_quote.ticker.clone(),
        shares: whole_shares(long_qty).ok_or_else(overflow)?,
        price: long_quote.price,
    };
    let short = HedgeLeg {
        ticker: short_quote.ticker.clone(),
        shares: whole_shares(short_qty).ok_or_else(overflow)?,
        price: short_quote.price,
    };

    debug!(
        long = %long.ticker,
        short = %short.ticker,
        %ratio,
        %long_qty,
        %short_qty,
        "Sized hedge legs"
    );

    Ok(AllocationResult {
        hedge_ratio: ratio,
        total_long_value: long.notional(),
        total_short_value: short.notional(),
        long,
        short,
        spread: spread(quote_a.price, quote_b.price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(ticker: &str, price: Decimal) -> PriceQuote {
        PriceQuote::new(ticker, price)
    }

    // =========================================================================
    // Hedge Ratio
    // =========================================================================

    #[test]
    fn test_hedge_ratio_is_min_over_max() {
        assert_eq!(hedge_ratio(dec!(50), dec!(100)), dec!(0.5));
        assert_eq!(hedge_ratio(dec!(100), dec!(50)), dec!(0.5));
    }

    #[test]
    fn test_hedge_ratio_in_unit_interval() {
        let prices = [
            (dec!(0.01), dec!(999999)),
            (dec!(410), dec!(615000)),
            (dec!(163.2), dec!(164.9)),
            (dec!(27.5), dec!(27.49)),
        ];
        for (a, b) in prices {
            let ratio = hedge_ratio(a, b);
            assert!(ratio > Decimal::ZERO && ratio < Decimal::ONE, "{a} {b} -> {ratio}");
        }
    }

    #[test]
    fn test_hedge_ratio_one_only_when_equal() {
        assert_eq!(hedge_ratio(dec!(42.42), dec!(42.42)), Decimal::ONE);
        assert_ne!(hedge_ratio(dec!(42.42), dec!(42.43)), Decimal::ONE);
    }

    // =========================================================================
    // Leg Assignment
    // =========================================================================

    #[test]
    fn test_higher_price_is_long() {
        let result =
            compute_allocation(&quote("GOOGL", dec!(160)), &quote("GOOG", dec!(162)), dec!(10000))
                .unwrap();
        assert_eq!(result.long.ticker, "GOOG");
        assert_eq!(result.short.ticker, "GOOGL");

        let result =
            compute_allocation(&quote("GOOGL", dec!(162)), &quote("GOOG", dec!(160)), dec!(10000))
                .unwrap();
        assert_eq!(result.long.ticker, "GOOGL");
        assert_eq!(result.short.ticker, "GOOG");
    }

    #[test]
    fn test_equal_prices_short_second_ticker() {
        let result =
            compute_allocation(&quote("MOG-A", dec!(75)), &quote("MOG-B", dec!(75)), dec!(3000))
                .unwrap();
        assert_eq!(result.short.ticker, "MOG-B");
        assert_eq!(result.long.ticker, "MOG-A");
        assert_eq!(result.hedge_ratio, Decimal::ONE);
        // 3000 / (75 + 75) = 20 shares each side
        assert_eq!(result.short.shares, 20);
        assert_eq!(result.long.shares, 20);
        assert_eq!(result.spread, Decimal::ZERO);
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    #[test]
    fn test_share_counts_for_known_prices() {
        // ratio = 0.5, shares_short = 10000 / (50 + 0.5 * 100) = 100, shares_long = 50
        let result =
            compute_allocation(&quote("A", dec!(100)), &quote("B", dec!(50)), dec!(10000)).unwrap();
        assert_eq!(result.short.shares, 100);
        assert_eq!(result.long.shares, 50);
        assert_eq!(result.total_short_value, dec!(5000));
        assert_eq!(result.total_long_value, dec!(5000));
        assert_eq!(result.exposure_gap(), Decimal::ZERO);
    }

    #[test]
    fn test_truncation_leaves_gap_below_one_share() {
        // shares_short = 1000 / (30 + 0.6 * 50) = 16.67 -> 16; shares_long = 10.0 -> 9 or 10
        let result =
            compute_allocation(&quote("A", dec!(50)), &quote("B", dec!(30)), dec!(1000)).unwrap();
        assert_eq!(result.short.shares, 16);
        assert!(result.long.shares == 9 || result.long.shares == 10);
        assert!(result.exposure_gap() < dec!(50));
    }

    #[test]
    fn test_exposure_gap_bounded_by_higher_price() {
        let cases = [
            (dec!(163.21), dec!(164.87), dec!(10000)),
            (dec!(410), dec!(615000), dec!(10000)),
            (dec!(27.15), dec!(26.48), dec!(1)),
            (dec!(11.02), dec!(14.75), dec!(999_999)),
            (dec!(0.37), dec!(0.41), dec!(57)),
            (dec!(88.8), dec!(88.8), dec!(12345)),
        ];
        for (a, b, amount) in cases {
            let result = compute_allocation(&quote("A", a), &quote("B", b), amount).unwrap();
            assert!(
                result.exposure_gap() < a.max(b),
                "gap {} too large for {a}/{b} @ {amount}",
                result.exposure_gap()
            );
            assert!(result.total_long_value + result.total_short_value <= amount);
        }
    }

    #[test]
    fn test_totals_use_leg_prices() {
        let result =
            compute_allocation(&quote("CRD-A", dec!(9)), &quote("CRD-B", dec!(12)), dec!(500))
                .unwrap();
        assert_eq!(result.long.ticker, "CRD-B");
        assert_eq!(
            result.total_long_value,
            Decimal::from(result.long.shares) * dec!(12)
        );
        assert_eq!(
            result.total_short_value,
            Decimal::from(result.short.shares) * dec!(9)
        );
    }

    #[test]
    fn test_berkshire_small_investment_rounds_long_to_zero() {
        // One BRK-A share is worth far more than the investment, so the long leg
        // truncates to zero shares and the gap is bounded by the BRK-A price.
        let result = compute_allocation(
            &quote("BRK-B", dec!(410)),
            &quote("BRK-A", dec!(615000)),
            dec!(10000),
        )
        .unwrap();
        assert_eq!(result.short.ticker, "BRK-B");
        assert_eq!(result.long.ticker, "BRK-A");
        assert_eq!(result.short.shares, 12);
        assert_eq!(result.long.shares, 0);
        assert!((result.hedge_ratio - dec!(0.000667)).abs() < dec!(0.000001));
        assert_eq!(result.spread, dec!(614590));
    }

    // =========================================================================
    // Spread
    // =========================================================================

    #[test]
    fn test_spread_rounded_and_symmetric() {
        assert_eq!(spread(dec!(163.214), dec!(164.871)), dec!(1.66));
        assert_eq!(
            spread(dec!(163.214), dec!(164.871)),
            spread(dec!(164.871), dec!(163.214))
        );
    }

    // =========================================================================
    // Preconditions
    // =========================================================================

    #[test]
    fn test_rejects_non_positive_price() {
        let err = compute_allocation(&quote("A", dec!(0)), &quote("B", dec!(10)), dec!(100))
            .unwrap_err();
        assert!(matches!(err, AllocationError::NonPositivePrice { ref ticker, .. } if ticker == "A"));

        let err = compute_allocation(&quote("A", dec!(10)), &quote("B", dec!(-1)), dec!(100))
            .unwrap_err();
        assert!(matches!(err, AllocationError::NonPositivePrice { ref ticker, .. } if ticker == "B"));
    }

    #[test]
    fn test_rejects_non_positive_investment() {
        let err = compute_allocation(&quote("A", dec!(10)), &quote("B", dec!(12)), Decimal::ZERO)
            .unwrap_err();
        assert_eq!(err, AllocationError::NonPositiveInvestment(Decimal::ZERO));
    }

    // =========================================================================
    // Range Limits
    // =========================================================================

    #[test]
    fn test_quantity_beyond_decimal_range_is_error() {
        let amount = Decimal::from(u64::MAX);
        let err = compute_allocation(
            &quote("A", dec!(0.0000000001)),
            &quote("B", dec!(0.0000000001)),
            amount,
        )
        .unwrap_err();
        assert_eq!(err, AllocationError::Overflow(amount));
    }

    #[test]
    fn test_share_count_beyond_u64_is_error() {
        // u64::MAX / 0.02 shares on each side cannot be represented
        let amount = Decimal::from(u64::MAX);
        let err = compute_allocation(&quote("A", dec!(0.01)), &quote("B", dec!(0.01)), amount)
            .unwrap_err();
        assert_eq!(err, AllocationError::Overflow(amount));
    }

    #[test]
    fn test_max_investment_at_normal_prices() {
        let amount = Decimal::from(u64::MAX);
        let result =
            compute_allocation(&quote("GOOGL", dec!(163.2)), &quote("GOOG", dec!(164.9)), amount)
                .unwrap();
        assert!(result.short.shares > 0);
        assert!(result.long.shares > 0);
        assert!(result.total_long_value + result.total_short_value <= amount);
    }
}
