use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Insufficient liquidity in order book")]
    InsufficientLiquidity,

    #[error("Invalid trade amount: {0}")]
    InvalidTradeAmount(String),

    #[error("Missing market data: {0}")]
    MissingMarketData(String),

    #[error("Token {0} is not part of the market")]
    TokenNotInMarket(Address),

    #[error("Malformed market configuration: {0}")]
    MalformedMarket(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Signer error: {0}")]
    Signer(#[from] ethers::signers::WalletError),
}

impl QuoteError {
    /// True for conditions the caller should wait out (retry on the next
    /// snapshot or data refresh) rather than surface as hard failures.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, QuoteError::MissingMarketData(_))
    }

    /// True for conditions shown to the user inline.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            QuoteError::InsufficientLiquidity | QuoteError::InvalidTradeAmount(_)
        )
    }
}
