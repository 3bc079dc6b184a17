//! Core library for the orderbook-quoter project.
//!
//! Quotes swaps against an off-chain order book depth ladder and turns the
//! quote into a premium-sized, grid-truncated, fee-bearing order ready for
//! hashing and signing. All amounts are `U256` integers with explicit scale;
//! nothing here performs I/O except the config loader used by the binary.

pub mod book;
pub mod config;
pub mod errors;
pub mod models;
pub mod order;
pub mod swap;
pub mod utils;

pub use errors::{QuoteError, Result};
