use alloy_primitives::U256;

/// Basis points in one whole.
pub const BIPS_BASE: u64 = 10_000;

/// Slippage window around a quoted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub minimum: U256,
    pub maximum: U256,
}

/// Widen `value` by `allowed_slippage_bips` in both directions.
///
/// `None` stays `None`: there is nothing to bound until a quote exists.
pub fn compute_bounds(value: Option<U256>, allowed_slippage_bips: u32) -> Option<Bounds> {
    let value = value?;
    let offset = match value.checked_mul(U256::from(allowed_slippage_bips)) {
        Some(scaled) => scaled / U256::from(BIPS_BASE),
        // Only reachable for values near U256::MAX; do the division first.
        None => value / U256::from(BIPS_BASE) * U256::from(allowed_slippage_bips),
    };
    Some(Bounds {
        minimum: value.saturating_sub(offset),
        maximum: value.saturating_add(offset),
    })
}
