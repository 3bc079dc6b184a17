use anyhow::{Result, bail};
use orderbook_quoter::{
    book::compute_bounds,
    config::{AppConfig, load_json},
    models::{FeeSchedule, Field, Market, OrderBookSnapshot, Side, UsdRates},
    order::{OrderSigner, SignableOrder, USD_DECIMALS, WalletSigner, build_standardized_order},
    swap::{QuoteOutcome, QuoteSession, SwapAction, SwapState, reduce},
    utils,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        side = %config.trade_side,
        field = ?config.trade_field,
        amount = %config.trade_amount,
        slippage_bips = config.slippage_bips,
        "[INIT] orderbook-quoter starting"
    );

    let market: Market = load_json(&config.market_file)?;
    market.validate()?;
    let book: OrderBookSnapshot = load_json(&config.book_file)?;
    let fees: FeeSchedule = load_json(&config.fees_file)?;
    let rates: UsdRates = load_json(&config.rates_file)?;

    // Book feed: a poller would keep sending here; one snapshot is enough for a run.
    let (book_tx, session) = QuoteSession::channel(market.clone());
    book_tx.send(Some(Arc::new(book)))?;

    let (token_in, token_out) = match config.trade_side {
        Side::Buy => (&market.secondary, &market.primary),
        Side::Sell => (&market.primary, &market.secondary),
    };
    let (typed_token, other_token) = match config.trade_field {
        Field::Input => (token_in, token_out),
        Field::Output => (token_out, token_in),
    };
    let typed_value = utils::parse_units(&config.trade_amount, typed_token.decimals)?;

    let state = [
        SwapAction::SelectCurrency {
            field: Field::Input,
            currency: token_in.address,
        },
        SwapAction::SelectCurrency {
            field: Field::Output,
            currency: token_out.address,
        },
        SwapAction::UpdateIndependent {
            field: config.trade_field,
            value: Some(typed_value),
        },
    ]
    .into_iter()
    .fold(SwapState::default(), |state, action| reduce(&state, action));

    let ticket = session.begin();
    let trade = match session.quote(ticket, &state)? {
        QuoteOutcome::Ready(trade) => trade,
        QuoteOutcome::NotReady => {
            tracing::warn!("[QUOTE] book has no price for this trade yet");
            return Ok(());
        }
        QuoteOutcome::Stale => bail!("quote superseded before it completed"),
    };

    let dependent = match trade.independent {
        Field::Input => trade.amount_out,
        Field::Output => trade.amount_in,
    };
    if let Some(bounds) = compute_bounds(Some(dependent), config.slippage_bips) {
        tracing::info!(
            quote = %utils::format_units(dependent, other_token.decimals),
            minimum = %utils::format_units(bounds.minimum, other_token.decimals),
            maximum = %utils::format_units(bounds.maximum, other_token.decimals),
            token = %other_token.symbol,
            "[QUOTE] dependent amount"
        );
    }

    let order = build_standardized_order(&trade, &market, Some(&fees), Some(&rates))?;
    if let Ok(usd) = orderbook_quoter::order::fee::usd_value(
        match order.side {
            Side::Buy => order.amount_s,
            Side::Sell => order.amount_b,
        },
        &market.secondary,
        &rates,
    ) {
        tracing::info!(usd = %utils::format_units(usd, USD_DECIMALS), "[ORDER] notional");
    }

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
    let valid_until = u32::try_from(now.as_secs())?.saturating_add(config.valid_for_secs);
    let nonce = u64::try_from(now.as_millis())?;
    let signable = SignableOrder::new(order, config.owner, nonce, valid_until);
    tracing::info!(hash = %signable.hash(), "[ORDER] built");

    match config.private_key.as_deref() {
        Some(key) => {
            let signer = WalletSigner::from_private_key(key)?;
            if signer.address() != config.owner {
                tracing::warn!(
                    signer = %signer.address(),
                    owner = %config.owner,
                    "[SIGN] key does not belong to the order owner"
                );
            }
            let signed = signer.sign_order(signable)?;
            println!("{}", serde_json::to_string_pretty(&signed)?);
        }
        None => println!("{}", serde_json::to_string_pretty(&signable)?),
    }

    Ok(())
}
