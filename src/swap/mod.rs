//! Swap form state, quoting, and the live quote session.

pub mod quote;
pub mod session;
pub mod state;

pub use quote::{apply_quote, derive_trade};
pub use session::{BookReceiver, BookSender, QuoteOutcome, QuoteSession, QuoteTicket};
pub use state::{SwapAction, SwapState, reduce};
