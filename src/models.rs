//! Shared data structures used throughout the application.

use crate::errors::{QuoteError, Result};
use crate::utils::{parse_units, pow10};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Integer value with an implied number of decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScaledRepr")]
pub struct ScaledAmount {
    #[serde(with = "dec::u256")]
    pub value: U256,
    pub decimals: u8,
}

/// Wire forms accepted for a `ScaledAmount`: a plain decimal string such as
/// `"12.50"` (precision taken from the fraction digits) or an explicit
/// `{ "value": "1250", "decimals": 2 }` pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScaledRepr {
    Text(String),
    Raw {
        #[serde(with = "dec::u256")]
        value: U256,
        decimals: u8,
    },
}

impl TryFrom<ScaledRepr> for ScaledAmount {
    type Error = QuoteError;

    fn try_from(repr: ScaledRepr) -> Result<Self> {
        match repr {
            ScaledRepr::Text(text) => ScaledAmount::parse(&text),
            ScaledRepr::Raw { value, decimals } => Ok(ScaledAmount::new(value, decimals)),
        }
    }
}

impl ScaledAmount {
    pub fn new(value: U256, decimals: u8) -> Self {
        Self { value, decimals }
    }

    pub fn from_u64(value: u64, decimals: u8) -> Self {
        Self::new(U256::from(value), decimals)
    }

    /// Parse a decimal string, keeping exactly as many decimals as it spells out.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let fraction_digits = trimmed
            .split_once('.')
            .map(|(_, fraction)| fraction.len())
            .unwrap_or(0);
        let decimals = u8::try_from(fraction_digits).map_err(|_| {
            QuoteError::InvalidTradeAmount(format!("'{trimmed}' has too many decimals"))
        })?;
        Ok(Self::new(parse_units(trimmed, decimals)?, decimals))
    }

    /// Express the same amount with `decimals` places. Upscaling is exact,
    /// downscaling truncates toward zero.
    pub fn rescale(&self, decimals: u8) -> Result<U256> {
        if decimals >= self.decimals {
            let factor = pow10(u32::from(decimals - self.decimals))?;
            self.value.checked_mul(factor).ok_or(QuoteError::Overflow)
        } else {
            let factor = pow10(u32::from(self.decimals - decimals))?;
            Ok(self.value / factor)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::utils::format_units(self.value, self.decimals))
    }
}

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Amount of primary token resting at this level.
    pub quantity: ScaledAmount,
    /// Secondary token per one primary token.
    pub price: ScaledAmount,
}

impl DepthLevel {
    pub fn new(quantity: ScaledAmount, price: ScaledAmount) -> Self {
        Self { quantity, price }
    }
}

/// Depth ladders for both sides of a market, best price first.
///
/// `buy_depths` is what a buyer of the primary token can take, `sell_depths`
/// what a seller can hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSnapshot {
    /// Precision every level quantity is read at (and the precision of
    /// amounts passed to the fill calculator).
    #[serde(default)]
    pub amount_decimals: u8,
    #[serde(default)]
    pub buy_depths: Vec<DepthLevel>,
    #[serde(default)]
    pub sell_depths: Vec<DepthLevel>,
}

impl OrderBookSnapshot {
    pub fn is_empty(&self) -> bool {
        self.buy_depths.is_empty() && self.sell_depths.is_empty()
    }

    pub fn ladder(&self, side: Side) -> &[DepthLevel] {
        match side {
            Side::Buy => &self.buy_depths,
            Side::Sell => &self.sell_depths,
        }
    }
}

/// Direction of the trade on the market's primary token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// Which swap field carries the amount typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    #[default]
    Input,
    Output,
}

impl Field {
    pub fn opposite(self) -> Self {
        match self {
            Field::Input => Field::Output,
            Field::Output => Field::Input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Static description of a trading pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub primary: TokenInfo,
    pub secondary: TokenInfo,
    /// Decimal places primary-token amounts are truncated to.
    pub primary_decimals: u8,
    /// Decimal places secondary-token amounts are truncated to.
    pub secondary_decimals: u8,
}

impl Market {
    pub fn validate(&self) -> Result<()> {
        if self.primary.address == self.secondary.address {
            return Err(QuoteError::MalformedMarket(format!(
                "primary and secondary are both {}",
                self.primary.address
            )));
        }
        if self.primary_decimals > self.primary.decimals {
            return Err(QuoteError::MalformedMarket(format!(
                "{} grid of {} decimals is finer than the token's {}",
                self.primary.symbol, self.primary_decimals, self.primary.decimals
            )));
        }
        if self.secondary_decimals > self.secondary.decimals {
            return Err(QuoteError::MalformedMarket(format!(
                "{} grid of {} decimals is finer than the token's {}",
                self.secondary.symbol, self.secondary_decimals, self.secondary.decimals
            )));
        }
        Ok(())
    }

    /// Side of a trade that receives `token_out`.
    pub fn side_for_output(&self, token_out: Address) -> Result<Side> {
        if token_out == self.primary.address {
            Ok(Side::Buy)
        } else if token_out == self.secondary.address {
            Ok(Side::Sell)
        } else {
            Err(QuoteError::TokenNotInMarket(token_out))
        }
    }

    pub fn token(&self, address: Address) -> Option<&TokenInfo> {
        [&self.primary, &self.secondary]
            .into_iter()
            .find(|t| t.address == address)
    }
}

/// The amount known with certainty and the pair it trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeRequest {
    pub known_amount: U256,
    pub field: Field,
    pub token_in: Address,
    pub token_out: Address,
}

/// A fully quoted trade, both sides in token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub independent: Field,
}

/// Per-token fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFee {
    /// Flat gas fee charged in the token's base units.
    #[serde(with = "dec::u256")]
    pub gas_fee: U256,
    /// Decimal places the total fee is truncated to.
    pub fee_decimals: u8,
}

/// Taker fee tiers. Rates are in wei, `1e18` meaning 100%.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    #[serde(with = "dec::u256")]
    pub taker_fee: U256,
    #[serde(with = "dec::u256")]
    pub lower_taker_fee: U256,
    /// USD value (6 decimals) at and above which `lower_taker_fee` applies.
    #[serde(with = "dec::u256")]
    pub lower_fee_threshold_usd: U256,
    #[serde(default)]
    pub tokens: HashMap<Address, TokenFee>,
}

/// USD price per whole token, 6 decimals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdRates {
    #[serde(default, with = "dec::u256_map")]
    pub rates: HashMap<Address, U256>,
}

impl UsdRates {
    pub fn rate(&self, token: &Address) -> Option<U256> {
        self.rates.get(token).copied()
    }
}

/// Serde adapters reading and writing `U256` as base-10 strings, the way
/// exchange APIs ship amounts.
pub mod dec {
    use alloy_primitives::{Address, U256};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    fn from_repr<E: serde::de::Error>(repr: Repr) -> Result<U256, E> {
        match repr {
            Repr::Text(text) => U256::from_str_radix(text.trim(), 10)
                .map_err(|e| E::custom(format!("invalid amount '{text}': {e}"))),
            Repr::Number(n) => Ok(U256::from(n)),
        }
    }

    pub mod u256 {
        use super::*;

        pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(value)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
            from_repr(Repr::deserialize(deserializer)?)
        }
    }

    pub mod u256_map {
        use super::*;

        pub fn serialize<S: Serializer>(
            map: &HashMap<Address, U256>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_map(map.iter().map(|(k, v)| (k, v.to_string())))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<HashMap<Address, U256>, D::Error> {
            HashMap::<Address, Repr>::deserialize(deserializer)?
                .into_iter()
                .map(|(k, v)| from_repr(v).map(|v| (k, v)))
                .collect()
        }
    }
}
