use crate::errors::{QuoteError, Result};
use crate::models::{DepthLevel, OrderBookSnapshot, Side};
use crate::utils::{mul_div, pow10};
use alloy_primitives::U256;
use tracing::{debug, trace};

/// Capacity of one depth level, both legs at the snapshot's amount precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCapacity {
    pub primary: U256,
    pub secondary: U256,
}

/// How much of one level a fill consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFill {
    /// Index into the ladder.
    pub level: usize,
    /// Consumed on the side of the known amount.
    pub known: U256,
    /// Consumed on the opposing side.
    pub opposing: U256,
    /// Whether the level was taken in full.
    pub complete: bool,
}

/// Result of walking a ladder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillPlan {
    pub fills: Vec<LevelFill>,
    pub opposing_amount: U256,
}

/// `secondary = primary * price / 10^price_decimals`
pub fn level_capacity(level: &DepthLevel, amount_decimals: u8) -> Result<LevelCapacity> {
    let primary = level.quantity.rescale(amount_decimals)?;
    let price_scale = pow10(u32::from(level.price.decimals))?;
    let secondary = mul_div(primary, level.price.value, price_scale)?;
    Ok(LevelCapacity { primary, secondary })
}

/// Splits a level's capacity into (known-side, opposing-side) legs.
///
/// A buyer pays secondary and receives primary; a seller the reverse.
fn legs(capacity: LevelCapacity, side: Side, known_is_output: bool) -> (U256, U256) {
    let (input, output) = match side {
        Side::Buy => (capacity.secondary, capacity.primary),
        Side::Sell => (capacity.primary, capacity.secondary),
    };
    if known_is_output {
        (output, input)
    } else {
        (input, output)
    }
}

/// Walk the ladder for `side` and record what each level contributes toward
/// `known_amount`.
///
/// Levels are consumed in snapshot order. An absent or empty ladder, or a zero
/// known amount, yields an empty plan with a zero opposing amount.
pub fn fill_levels(
    known_amount: U256,
    snapshot: Option<&OrderBookSnapshot>,
    side: Side,
    known_is_output: bool,
) -> Result<FillPlan> {
    let Some(snapshot) = snapshot else {
        return Ok(FillPlan::default());
    };
    let ladder = snapshot.ladder(side);
    if ladder.is_empty() || known_amount.is_zero() {
        return Ok(FillPlan::default());
    }

    let mut plan = FillPlan::default();
    let mut filled = U256::ZERO;

    for (index, level) in ladder.iter().enumerate() {
        let capacity = level_capacity(level, snapshot.amount_decimals)?;
        let (known_cap, opposing_cap) = legs(capacity, side, known_is_output);
        let reached = filled.checked_add(known_cap).ok_or(QuoteError::Overflow)?;

        if reached < known_amount {
            filled = reached;
            plan.opposing_amount = plan
                .opposing_amount
                .checked_add(opposing_cap)
                .ok_or(QuoteError::Overflow)?;
            plan.fills.push(LevelFill {
                level: index,
                known: known_cap,
                opposing: opposing_cap,
                complete: true,
            });
            trace!(level = index, %filled, "consumed full level");
            continue;
        }

        // known_cap >= remaining > 0 here, so the division is safe.
        let remaining = known_amount - filled;
        let partial = mul_div(opposing_cap, remaining, known_cap)?;
        plan.opposing_amount = plan
            .opposing_amount
            .checked_add(partial)
            .ok_or(QuoteError::Overflow)?;
        plan.fills.push(LevelFill {
            level: index,
            known: remaining,
            opposing: partial,
            complete: remaining == known_cap,
        });
        debug!(
            %side,
            %known_amount,
            opposing = %plan.opposing_amount,
            levels = plan.fills.len(),
            "filled against depth"
        );
        return Ok(plan);
    }

    debug!(%side, %known_amount, %filled, "depth exhausted");
    Err(QuoteError::InsufficientLiquidity)
}

/// Amount on the other side of a trade whose `known_amount` is fixed.
///
/// Returns zero while no book is available yet and
/// `QuoteError::InsufficientLiquidity` when the ladder runs out first.
pub fn compute_opposing_amount(
    known_amount: U256,
    snapshot: Option<&OrderBookSnapshot>,
    side: Side,
    known_is_output: bool,
) -> Result<U256> {
    fill_levels(known_amount, snapshot, side, known_is_output).map(|plan| plan.opposing_amount)
}
