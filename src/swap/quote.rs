use crate::book::compute_opposing_amount;
use crate::errors::{QuoteError, Result};
use crate::models::{Field, Market, OrderBookSnapshot, ScaledAmount, Trade};
use crate::swap::state::{SwapAction, SwapState, reduce};
use tracing::debug;

/// Quote the trade described by `state` against `snapshot`.
///
/// `Ok(None)` while the form is incomplete or no book has produced a price
/// yet. Amounts are converted between token base units and the snapshot's
/// amount precision on the way in and out.
pub fn derive_trade(
    state: &SwapState,
    market: &Market,
    snapshot: Option<&OrderBookSnapshot>,
) -> Result<Option<Trade>> {
    let Some(request) = state.request() else {
        return Ok(None);
    };
    let side = market.side_for_output(request.token_out)?;
    let token_in = market
        .token(request.token_in)
        .ok_or(QuoteError::TokenNotInMarket(request.token_in))?;
    let token_out = market
        .token(request.token_out)
        .ok_or(QuoteError::TokenNotInMarket(request.token_out))?;
    if token_in.address == token_out.address {
        return Err(QuoteError::InvalidTradeAmount(format!(
            "cannot trade {} for itself",
            token_in.symbol
        )));
    }

    let Some(snapshot) = snapshot else {
        return Ok(None);
    };
    let known_is_output = request.field == Field::Output;
    let (known_token, opposing_token) = if known_is_output {
        (token_out, token_in)
    } else {
        (token_in, token_out)
    };

    let known_in_book =
        ScaledAmount::new(request.known_amount, known_token.decimals).rescale(snapshot.amount_decimals)?;
    let opposing_in_book =
        compute_opposing_amount(known_in_book, Some(snapshot), side, known_is_output)?;
    let opposing = ScaledAmount::new(opposing_in_book, snapshot.amount_decimals)
        .rescale(opposing_token.decimals)?;

    if opposing.is_zero() {
        debug!(%side, known = %request.known_amount, "no price yet");
        return Ok(None);
    }

    let (amount_in, amount_out) = if known_is_output {
        (opposing, request.known_amount)
    } else {
        (request.known_amount, opposing)
    };
    Ok(Some(Trade {
        token_in: token_in.address,
        token_out: token_out.address,
        amount_in,
        amount_out,
        independent: request.field,
    }))
}

/// Fold a fresh quote into the swap state as its dependent value.
pub fn apply_quote(
    state: &SwapState,
    market: &Market,
    snapshot: Option<&OrderBookSnapshot>,
) -> Result<SwapState> {
    let trade = derive_trade(state, market, snapshot)?;
    let value = trade.map(|t| match t.independent {
        Field::Input => t.amount_out,
        Field::Output => t.amount_in,
    });
    Ok(reduce(state, SwapAction::UpdateDependent { value }))
}
