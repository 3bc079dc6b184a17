//! End-to-end: JSON inputs -> swap state -> quote -> order -> hash -> signature.

use alloy_primitives::U256;
use orderbook_quoter::{
    QuoteError,
    book::compute_bounds,
    models::{FeeSchedule, Field, Market, OrderBookSnapshot, Side, UsdRates},
    order::{OrderSigner, SignableOrder, WalletSigner, build_standardized_order},
    swap::{QuoteOutcome, QuoteSession, SwapAction, SwapState, reduce},
    utils::{parse_units, pow10},
};
use std::sync::Arc;

const MARKET: &str = r#"{
    "primary": {"address": "0x1111111111111111111111111111111111111111", "symbol": "ETH", "decimals": 18},
    "secondary": {"address": "0x2222222222222222222222222222222222222222", "symbol": "USDC", "decimals": 6},
    "primaryDecimals": 4,
    "secondaryDecimals": 2
}"#;

const BOOK: &str = r#"{
    "amountDecimals": 4,
    "buyDepths": [
        {"quantity": "0.5", "price": "2000"},
        {"quantity": "1.0", "price": "2010.5"},
        {"quantity": "4.0", "price": "2050"}
    ],
    "sellDepths": [
        {"quantity": "1.0", "price": "1995"},
        {"quantity": "2.0", "price": "1990.25"}
    ]
}"#;

const FEES: &str = r#"{
    "takerFee": "2000000000000000",
    "lowerTakerFee": "1000000000000000",
    "lowerFeeThresholdUsd": "5000000000",
    "tokens": {
        "0x1111111111111111111111111111111111111111": {"gasFee": "100000000000000", "feeDecimals": 6},
        "0x2222222222222222222222222222222222222222": {"gasFee": "250000", "feeDecimals": 2}
    }
}"#;

const RATES: &str = r#"{
    "rates": {
        "0x1111111111111111111111111111111111111111": "2000000000",
        "0x2222222222222222222222222222222222222222": "1000000"
    }
}"#;

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

struct Inputs {
    market: Market,
    book: OrderBookSnapshot,
    fees: FeeSchedule,
    rates: UsdRates,
}

fn inputs() -> Inputs {
    Inputs {
        market: serde_json::from_str(MARKET).expect("market json"),
        book: serde_json::from_str(BOOK).expect("book json"),
        fees: serde_json::from_str(FEES).expect("fees json"),
        rates: serde_json::from_str(RATES).expect("rates json"),
    }
}

fn swap_state(market: &Market, side: Side, field: Field, value: U256) -> SwapState {
    let (token_in, token_out) = match side {
        Side::Buy => (market.secondary.address, market.primary.address),
        Side::Sell => (market.primary.address, market.secondary.address),
    };
    [
        SwapAction::SelectCurrency {
            field: Field::Input,
            currency: token_in,
        },
        SwapAction::SelectCurrency {
            field: Field::Output,
            currency: token_out,
        },
        SwapAction::UpdateIndependent {
            field,
            value: Some(value),
        },
    ]
    .into_iter()
    .fold(SwapState::default(), |s, a| reduce(&s, a))
}

#[test]
fn buy_quote_to_signed_order() {
    let Inputs {
        market,
        book,
        fees,
        rates,
    } = inputs();
    let (tx, session) = QuoteSession::channel(market.clone());
    tx.send(Some(Arc::new(book))).unwrap();

    // 3010.5 USDC clears the first level (1000) and the second (2010.5).
    let typed = parse_units("3010.5", 6).unwrap();
    let state = swap_state(&market, Side::Buy, Field::Input, typed);
    let trade = match session.quote(session.begin(), &state).unwrap() {
        QuoteOutcome::Ready(trade) => trade,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(trade.amount_in, typed);
    assert_eq!(trade.amount_out, parse_units("1.5", 18).unwrap());

    let bounds = compute_bounds(Some(trade.amount_out), 50).unwrap();
    assert_eq!(bounds.minimum, parse_units("1.4925", 18).unwrap());
    assert_eq!(bounds.maximum, parse_units("1.5075", 18).unwrap());

    let order = build_standardized_order(&trade, &market, Some(&fees), Some(&rates)).unwrap();
    assert_eq!(order.side, Side::Buy);
    // 1.5 * 1.1 = 1.65 ETH, 3010.5 * 1.1 = 3311.55 USDC.
    assert_eq!(order.amount_b, parse_units("1.65", 18).unwrap());
    assert_eq!(order.amount_s, parse_units("3311.55", 6).unwrap());
    assert_eq!(order.amount_b % pow10(14).unwrap(), U256::ZERO);
    // Below $5000: 0.2% of 1.65 = 0.0033 plus 0.0001 gas.
    assert_eq!(order.fee_rate, fees.taker_fee);
    assert_eq!(order.fee_amount, parse_units("0.0034", 18).unwrap());

    let signer = WalletSigner::from_private_key(DEV_KEY).unwrap();
    let signable = SignableOrder::new(order, signer.address(), 42, 1_900_000_000);
    let signed = signer.sign_order(signable).unwrap();
    assert_eq!(signed.hash, signable.hash());
    assert_eq!(signed.signature.len(), 65);

    let json = serde_json::to_value(&signed).unwrap();
    assert_eq!(json["order"]["order"]["amountB"], "1650000000000000000");
}

#[test]
fn sell_output_large_trade_gets_lower_fee() {
    let Inputs {
        market,
        book,
        fees,
        rates,
    } = inputs();
    let (tx, session) = QuoteSession::channel(market.clone());
    tx.send(Some(Arc::new(book))).unwrap();

    // Receive 5975.5 USDC: 1995 from the first level, 3980.5 for 2 ETH at 1990.25.
    let typed = parse_units("5975.5", 6).unwrap();
    let state = swap_state(&market, Side::Sell, Field::Output, typed);
    let trade = match session.quote(session.begin(), &state).unwrap() {
        QuoteOutcome::Ready(trade) => trade,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(trade.amount_in, parse_units("3", 18).unwrap());

    let order = build_standardized_order(&trade, &market, Some(&fees), Some(&rates)).unwrap();
    assert_eq!(order.side, Side::Sell);
    assert_eq!(order.token_b, market.secondary.address);
    // 5975.5 * 10/11 = 5432.2727 -> 5432.27 USDC.
    assert_eq!(order.amount_b, parse_units("5432.27", 6).unwrap());
    // 3 * 10/11 = 2.72727 -> 2.7272 ETH.
    assert_eq!(order.amount_s, parse_units("2.7272", 18).unwrap());
    assert_eq!(order.fee_rate, fees.lower_taker_fee);
    // 0.1% of 5432.27 = 5.43227 plus 0.25 gas, kept at the ETH entry's six fee
    // decimals rather than the USDC entry's two.
    assert_eq!(order.fee_token, market.secondary.address);
    assert_eq!(order.fee_amount, parse_units("5.68227", 6).unwrap());
}

#[test]
fn oversized_request_reports_insufficient_liquidity() {
    let Inputs { market, book, .. } = inputs();
    let (tx, session) = QuoteSession::channel(market.clone());
    tx.send(Some(Arc::new(book))).unwrap();

    let state = swap_state(
        &market,
        Side::Sell,
        Field::Input,
        parse_units("3.0001", 18).unwrap(),
    );
    let err = session.quote(session.begin(), &state).unwrap_err();
    assert!(matches!(err, QuoteError::InsufficientLiquidity));
}
