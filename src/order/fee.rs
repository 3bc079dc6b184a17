use crate::errors::{QuoteError, Result};
use crate::models::{FeeSchedule, Market, TokenInfo, UsdRates};
use crate::utils::{mul_div, pow10, truncate_to_grid};
use alloy_primitives::U256;
use tracing::debug;

/// Fee rates are expressed against this denominator (1e18 = 100%).
pub const FEE_RATE_BASE: u64 = 1_000_000_000_000_000_000;

/// USD values carry this many decimals.
pub const USD_DECIMALS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakerFee {
    /// Rate picked from the schedule.
    pub fee_rate: U256,
    /// USD value of the trade used to pick the tier.
    pub usd_value: U256,
    /// Gas fee plus commission, truncated to the primary token's fee grid.
    pub amount: U256,
}

/// USD value (6 decimals) of `amount` base units of `token`.
pub fn usd_value(amount: U256, token: &TokenInfo, rates: &UsdRates) -> Result<U256> {
    let rate = rates.rate(&token.address).ok_or_else(|| {
        QuoteError::MissingMarketData(format!("no USD rate for {}", token.symbol))
    })?;
    mul_div(amount, rate, pow10(u32::from(token.decimals))?)
}

/// Discounted rate once the trade is worth at least the threshold.
pub fn select_fee_rate(usd_value: U256, fees: &FeeSchedule) -> U256 {
    if usd_value >= fees.lower_fee_threshold_usd {
        fees.lower_taker_fee
    } else {
        fees.taker_fee
    }
}

/// Fee charged on an order buying `amount_b` of `token_b`, tiered on the USD
/// value of `secondary_amount` of the market's secondary token.
///
/// The gas fee is the one listed for `token_b`; the total is truncated to the
/// fee precision listed for the market's primary token, whichever side the
/// order is on.
pub fn compute_taker_fee(
    amount_b: U256,
    token_b: &TokenInfo,
    secondary_amount: U256,
    market: &Market,
    fees: &FeeSchedule,
    rates: &UsdRates,
) -> Result<TakerFee> {
    let token_fee = fees.tokens.get(&token_b.address).ok_or_else(|| {
        QuoteError::MissingMarketData(format!("no fee parameters for {}", token_b.symbol))
    })?;
    let fee_decimals = fees
        .tokens
        .get(&market.primary.address)
        .map(|primary_fee| primary_fee.fee_decimals)
        .ok_or_else(|| {
            QuoteError::MissingMarketData(format!(
                "no fee precision for {}",
                market.primary.symbol
            ))
        })?;

    let usd_value = usd_value(secondary_amount, &market.secondary, rates)?;
    let fee_rate = select_fee_rate(usd_value, fees);
    let commission = mul_div(amount_b, fee_rate, U256::from(FEE_RATE_BASE))?;
    let total = token_fee
        .gas_fee
        .checked_add(commission)
        .ok_or(QuoteError::Overflow)?;
    let amount = truncate_to_grid(total, token_b.decimals, fee_decimals)?;

    debug!(
        token = %token_b.symbol,
        %usd_value,
        %fee_rate,
        %commission,
        fee = %amount,
        "computed taker fee"
    );

    Ok(TakerFee {
        fee_rate,
        usd_value,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenFee;
    use alloy_primitives::{Address, address};
    use std::collections::HashMap;

    fn usdc() -> TokenInfo {
        TokenInfo {
            address: address!("0x2222222222222222222222222222222222222222"),
            symbol: "USDC".into(),
            decimals: 6,
        }
    }

    fn eth() -> TokenInfo {
        TokenInfo {
            address: address!("0x1111111111111111111111111111111111111111"),
            symbol: "ETH".into(),
            decimals: 18,
        }
    }

    fn market() -> Market {
        Market {
            primary: eth(),
            secondary: usdc(),
            primary_decimals: 4,
            secondary_decimals: 2,
        }
    }

    fn schedule(primary_fee_decimals: u8) -> FeeSchedule {
        let mut tokens = HashMap::new();
        tokens.insert(
            usdc().address,
            TokenFee {
                gas_fee: U256::from(1_234_567u64),
                fee_decimals: 2,
            },
        );
        tokens.insert(
            eth().address,
            TokenFee {
                gas_fee: U256::from(100_000_000_000_000u64),
                fee_decimals: primary_fee_decimals,
            },
        );
        FeeSchedule {
            // 0.2% and 0.1%
            taker_fee: U256::from(2_000_000_000_000_000u64),
            lower_taker_fee: U256::from(1_000_000_000_000_000u64),
            // $10,000
            lower_fee_threshold_usd: U256::from(10_000_000_000u64),
            tokens,
        }
    }

    fn rates() -> UsdRates {
        let mut rates = HashMap::new();
        rates.insert(usdc().address, U256::from(1_000_000u64));
        UsdRates { rates }
    }

    #[test]
    fn standard_tier_below_threshold() {
        // $1,000 of USDC: 0.2% commission = 2 USDC, plus 1.234567 gas.
        let amount = U256::from(1_000_000_000u64);
        let fee =
            compute_taker_fee(amount, &usdc(), amount, &market(), &schedule(2), &rates()).unwrap();
        assert_eq!(fee.fee_rate, schedule(2).taker_fee);
        assert_eq!(fee.usd_value, U256::from(1_000_000_000u64));
        // 3.234567 truncated to cents.
        assert_eq!(fee.amount, U256::from(3_230_000u64));
    }

    #[test]
    fn lower_tier_at_threshold() {
        let amount = U256::from(10_000_000_000u64);
        let fee =
            compute_taker_fee(amount, &usdc(), amount, &market(), &schedule(2), &rates()).unwrap();
        assert_eq!(fee.fee_rate, schedule(2).lower_taker_fee);
        // 10 USDC commission + 1.23 gas after truncation.
        assert_eq!(fee.amount, U256::from(11_230_000u64));
    }

    #[test]
    fn sell_fee_uses_primary_fee_grid() {
        // Selling ETH for $1,000 of USDC: 2 USDC commission + 1.234567 gas.
        // The USDC entry lists 2 fee decimals but the ETH entry's 4 apply.
        let amount = U256::from(1_000_000_000u64);
        let fee =
            compute_taker_fee(amount, &usdc(), amount, &market(), &schedule(4), &rates()).unwrap();
        assert_eq!(fee.amount, U256::from(3_234_500u64));

        let fee =
            compute_taker_fee(amount, &usdc(), amount, &market(), &schedule(6), &rates()).unwrap();
        assert_eq!(fee.amount, U256::from(3_234_567u64));
    }

    #[test]
    fn buy_fee_truncates_in_primary_units() {
        // 1 ETH bought for $1,000: 0.002 ETH commission + 0.0001 gas = 0.0021.
        let amount_b = U256::from(1_000_000_000_000_000_000u64);
        let secondary = U256::from(1_000_000_000u64);
        let fee = compute_taker_fee(amount_b, &eth(), secondary, &market(), &schedule(3), &rates())
            .unwrap();
        assert_eq!(fee.amount, U256::from(2_000_000_000_000_000u64));
    }

    #[test]
    fn missing_rate_or_token_fee_is_not_ready() {
        let amount = U256::from(1u64);
        let err = compute_taker_fee(
            amount,
            &usdc(),
            amount,
            &market(),
            &schedule(2),
            &UsdRates::default(),
        )
        .unwrap_err();
        assert!(err.is_not_ready());

        let mut stranger = usdc();
        stranger.address = Address::ZERO;
        let err = compute_taker_fee(amount, &stranger, amount, &market(), &schedule(2), &rates())
            .unwrap_err();
        assert!(err.is_not_ready());

        let mut without_primary = schedule(2);
        without_primary.tokens.remove(&eth().address);
        let err =
            compute_taker_fee(amount, &usdc(), amount, &market(), &without_primary, &rates())
                .unwrap_err();
        assert!(matches!(err, QuoteError::MissingMarketData(_)));
    }
}
