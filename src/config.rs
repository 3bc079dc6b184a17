//! Configuration loader and application settings.

use crate::errors::{QuoteError, Result};
use crate::models::{Field, Side};
use alloy_primitives::Address;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file describing the market (tokens and truncation grids).
    pub market_file: PathBuf,
    /// JSON order-book snapshot as returned by the exchange depth endpoint.
    pub book_file: PathBuf,
    /// JSON fee schedule.
    pub fees_file: PathBuf,
    /// JSON USD rates.
    pub rates_file: PathBuf,
    /// Slippage tolerance in basis points.
    pub slippage_bips: u32,
    /// Amount typed by the user, as a human decimal string.
    pub trade_amount: String,
    pub trade_field: Field,
    pub trade_side: Side,
    /// Owner the order is built for.
    pub owner: Address,
    /// Key used to sign the order hash; signing is skipped without it.
    pub private_key: Option<String>,
    /// Order validity window in seconds.
    pub valid_for_secs: u32,
}

const DEFAULT_SLIPPAGE_BIPS: u32 = 50;
const DEFAULT_VALID_FOR_SECS: u32 = 3_600;

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| QuoteError::Config(format!("Set {name} env var")))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| QuoteError::Config(format!("{name} is not valid: '{raw}'"))),
        None => Ok(default),
    }
}

pub fn parse_field(raw: &str) -> Result<Field> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "input" | "in" => Ok(Field::Input),
        "output" | "out" => Ok(Field::Output),
        other => Err(QuoteError::Config(format!(
            "TRADE_FIELD must be input or output, got '{other}'"
        ))),
    }
}

pub fn parse_side(raw: &str) -> Result<Side> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "buy" => Ok(Side::Buy),
        "sell" => Ok(Side::Sell),
        other => Err(QuoteError::Config(format!(
            "TRADE_SIDE must be buy or sell, got '{other}'"
        ))),
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let owner = required("OWNER_ADDRESS")?;
        let owner: Address = owner
            .trim()
            .parse()
            .map_err(|_| QuoteError::Config(format!("OWNER_ADDRESS is not an address: '{owner}'")))?;

        Ok(Self {
            market_file: required("MARKET_FILE")?.into(),
            book_file: required("BOOK_FILE")?.into(),
            fees_file: required("FEES_FILE")?.into(),
            rates_file: required("RATES_FILE")?.into(),
            slippage_bips: parse_or("SLIPPAGE_BIPS", DEFAULT_SLIPPAGE_BIPS)?,
            trade_amount: required("TRADE_AMOUNT")?,
            trade_field: optional("TRADE_FIELD")
                .map(|raw| parse_field(&raw))
                .transpose()?
                .unwrap_or_default(),
            trade_side: parse_side(&required("TRADE_SIDE")?)?,
            owner,
            private_key: optional("PRIVATE_KEY"),
            valid_for_secs: parse_or("VALID_FOR_SECS", DEFAULT_VALID_FOR_SECS)?,
        })
    }
}

/// Read and deserialize one of the JSON inputs.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_and_side_parse_loosely() {
        assert_eq!(parse_field(" Output ").unwrap(), Field::Output);
        assert_eq!(parse_field("in").unwrap(), Field::Input);
        assert!(parse_field("sideways").is_err());
        assert_eq!(parse_side("BUY").unwrap(), Side::Buy);
        assert!(matches!(parse_side("hold"), Err(QuoteError::Config(_))));
    }
}
