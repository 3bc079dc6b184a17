//! Order construction: premium sizing, grid truncation, taker fees, hashing
//! and signing.

pub mod builder;
pub mod fee;
pub mod signer;
pub mod types;

pub use builder::{
    PREMIUM_DENOMINATOR, PREMIUM_NUMERATOR, apply_premium, build_standardized_order,
    standardize_amounts,
};
pub use fee::{FEE_RATE_BASE, TakerFee, USD_DECIMALS, compute_taker_fee};
pub use signer::{OrderSigner, WalletSigner};
pub use types::{SignableOrder, SignedOrder, StandardizedOrder};
