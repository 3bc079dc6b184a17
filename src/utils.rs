//! Miscellaneous helper utilities: logging setup and fixed-point helpers.

use crate::errors::{QuoteError, Result};
use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use num_traits::Signed;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// `10^exp` as a `U256`, failing once the power no longer fits.
pub fn pow10(exp: u32) -> Result<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(QuoteError::Overflow)
}

/// `a * b / denominator`, multiplying first so no precision is lost before the
/// single truncating division.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(QuoteError::InvalidTradeAmount(
            "division by zero amount".to_string(),
        ));
    }
    let product = a.checked_mul(b).ok_or(QuoteError::Overflow)?;
    Ok(product / denominator)
}

/// Round `amount` down onto the precision grid of `grid_decimals`, where the
/// amount itself carries `amount_decimals`.
///
/// `floor(amount / f) * f` with `f = 10^(amount_decimals - grid_decimals)`.
/// A grid at least as fine as the amount leaves it untouched.
pub fn truncate_to_grid(amount: U256, amount_decimals: u8, grid_decimals: u8) -> Result<U256> {
    if grid_decimals >= amount_decimals {
        return Ok(amount);
    }
    let factor = pow10(u32::from(amount_decimals - grid_decimals))?;
    Ok(amount / factor * factor)
}

/// Parse a human decimal string ("1.5") into base units with `decimals`
/// fraction digits. Digits beyond `decimals` are truncated.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256> {
    let trimmed = text.trim();
    let parsed = BigDecimal::from_str(trimmed)
        .map_err(|e| QuoteError::InvalidTradeAmount(format!("'{trimmed}': {e}")))?;
    if parsed.is_negative() {
        return Err(QuoteError::InvalidTradeAmount(format!(
            "'{trimmed}' is negative"
        )));
    }
    let (digits, _) = parsed
        .with_scale(i64::from(decimals))
        .as_bigint_and_exponent();
    let unsigned: BigUint = digits
        .to_biguint()
        .ok_or_else(|| QuoteError::InvalidTradeAmount(format!("'{trimmed}' is negative")))?;
    U256::try_from_be_slice(&unsigned.to_bytes_be()).ok_or(QuoteError::Overflow)
}

/// Render base units as a decimal string, trimming trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
