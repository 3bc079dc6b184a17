//! Turns a quoted trade into a standardized order.
//!
//! Amounts are sized with a fixed premium so the order still fills after the
//! book moves between quote and execution, then snapped onto the market's
//! precision grid. Truncation does not commute with the premium multiply, so
//! each (side, independent field) combination fixes its own order of
//! operations:
//!
//! | side | known  | bought amount                 | sold amount                  |
//! |------|--------|-------------------------------|------------------------------|
//! | buy  | input  | `tp(out * P)`                 | `ts(in * P)`                 |
//! | buy  | output | `tp(tp(out) * P)`             | `ts(in * bought / out)`      |
//! | sell | input  | `ts(out * sold / in)`         | `tp(tp(in) * P)`             |
//! | sell | output | `ts(out * P)`                 | `tp(in * P)`                 |
//!
//! `tp`/`ts` truncate to the primary/secondary grid and `P` is 11/10 on buys,
//! 10/11 on sells.

use crate::errors::{QuoteError, Result};
use crate::models::{FeeSchedule, Field, Market, Side, Trade, UsdRates};
use crate::order::fee::compute_taker_fee;
use crate::order::types::StandardizedOrder;
use crate::utils::{mul_div, truncate_to_grid};
use alloy_primitives::U256;
use tracing::debug;

pub const PREMIUM_NUMERATOR: u64 = 11;
pub const PREMIUM_DENOMINATOR: u64 = 10;

/// Inflate buys by 11/10, deflate sells by 10/11.
pub fn apply_premium(amount: U256, side: Side) -> Result<U256> {
    let (num, den) = match side {
        Side::Buy => (PREMIUM_NUMERATOR, PREMIUM_DENOMINATOR),
        Side::Sell => (PREMIUM_DENOMINATOR, PREMIUM_NUMERATOR),
    };
    mul_div(amount, U256::from(num), U256::from(den))
}

/// Premium-adjusted, grid-truncated `(amount_s, amount_b)` for `trade`.
pub fn standardize_amounts(trade: &Trade, market: &Market, side: Side) -> Result<(U256, U256)> {
    let tp = |x: U256| {
        truncate_to_grid(x, market.primary.decimals, market.primary_decimals)
    };
    let ts = |x: U256| {
        truncate_to_grid(x, market.secondary.decimals, market.secondary_decimals)
    };
    let amount_in = trade.amount_in;
    let amount_out = trade.amount_out;

    let (amount_s, amount_b) = match (side, trade.independent) {
        (Side::Buy, Field::Input) => {
            let bought = tp(apply_premium(amount_out, side)?)?;
            let sold = ts(apply_premium(amount_in, side)?)?;
            (sold, bought)
        }
        (Side::Buy, Field::Output) => {
            let base = tp(amount_out)?;
            let bought = tp(apply_premium(base, side)?)?;
            let sold = ts(mul_div(amount_in, bought, amount_out)?)?;
            (sold, bought)
        }
        (Side::Sell, Field::Input) => {
            let base = tp(amount_in)?;
            let sold = tp(apply_premium(base, side)?)?;
            let bought = ts(mul_div(amount_out, sold, amount_in)?)?;
            (sold, bought)
        }
        (Side::Sell, Field::Output) => {
            let bought = ts(apply_premium(amount_out, side)?)?;
            let sold = tp(apply_premium(amount_in, side)?)?;
            (sold, bought)
        }
    };
    Ok((amount_s, amount_b))
}

/// Build the order for `trade`.
///
/// Fee schedule and USD rates arrive from a background refresh; while either
/// is still absent this fails with `QuoteError::MissingMarketData`.
pub fn build_standardized_order(
    trade: &Trade,
    market: &Market,
    fees: Option<&FeeSchedule>,
    rates: Option<&UsdRates>,
) -> Result<StandardizedOrder> {
    market.validate()?;
    let side = market.side_for_output(trade.token_out)?;
    let (token_s, token_b) = match side {
        Side::Buy => (&market.secondary, &market.primary),
        Side::Sell => (&market.primary, &market.secondary),
    };
    if trade.token_in != token_s.address {
        return Err(QuoteError::TokenNotInMarket(trade.token_in));
    }
    if trade.amount_in.is_zero() || trade.amount_out.is_zero() {
        return Err(QuoteError::InvalidTradeAmount(format!(
            "cannot build order from {} in / {} out",
            trade.amount_in, trade.amount_out
        )));
    }

    let fees = fees.ok_or_else(|| QuoteError::MissingMarketData("fee schedule".into()))?;
    let rates = rates.ok_or_else(|| QuoteError::MissingMarketData("USD rates".into()))?;

    let (amount_s, amount_b) = standardize_amounts(trade, market, side)?;
    if amount_s.is_zero() || amount_b.is_zero() {
        return Err(QuoteError::InvalidTradeAmount(format!(
            "{} in / {} out rounds to zero on the market grid",
            trade.amount_in, trade.amount_out
        )));
    }

    let secondary_amount = match side {
        Side::Buy => amount_s,
        Side::Sell => amount_b,
    };
    let fee = compute_taker_fee(
        amount_b,
        token_b,
        secondary_amount,
        market,
        fees,
        rates,
    )?;

    debug!(
        %side,
        independent = ?trade.independent,
        %amount_s,
        %amount_b,
        fee = %fee.amount,
        "built standardized order"
    );

    Ok(StandardizedOrder {
        side,
        token_s: token_s.address,
        token_b: token_b.address,
        amount_s,
        amount_b,
        fee_token: token_b.address,
        fee_amount: fee.amount,
        fee_rate: fee.fee_rate,
    })
}
