//! Last-write-wins quoting over a live order book.
//!
//! A poller pushes snapshots through a `watch` channel; UI events ask for
//! quotes with a ticket. Results computed for a superseded ticket are dropped.

use crate::errors::Result;
use crate::models::{Market, OrderBookSnapshot, Trade};
use crate::swap::quote::derive_trade;
use crate::swap::state::SwapState;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

pub type BookSender = watch::Sender<Option<Arc<OrderBookSnapshot>>>;
pub type BookReceiver = watch::Receiver<Option<Arc<OrderBookSnapshot>>>;

/// Identifies one quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuoteTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    Ready(Trade),
    /// Form incomplete or no book yet.
    NotReady,
    /// A newer request was issued while this one was computed.
    Stale,
}

pub struct QuoteSession {
    market: Market,
    book_rx: BookReceiver,
    latest: AtomicU64,
}

impl QuoteSession {
    pub fn new(market: Market, book_rx: BookReceiver) -> Self {
        Self {
            market,
            book_rx,
            latest: AtomicU64::new(0),
        }
    }

    /// Session plus the sender a poller feeds snapshots into.
    pub fn channel(market: Market) -> (BookSender, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(market, rx))
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn snapshot(&self) -> Option<Arc<OrderBookSnapshot>> {
        self.book_rx.borrow().clone()
    }

    /// Issue a ticket; every earlier ticket becomes stale.
    pub fn begin(&self) -> QuoteTicket {
        QuoteTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: QuoteTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Quote `state` against the newest snapshot.
    pub fn quote(&self, ticket: QuoteTicket, state: &SwapState) -> Result<QuoteOutcome> {
        if !self.is_current(ticket) {
            return Ok(QuoteOutcome::Stale);
        }
        let snapshot = self.snapshot();
        let trade = derive_trade(state, &self.market, snapshot.as_deref())?;
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "[QUOTE] dropping stale result");
            return Ok(QuoteOutcome::Stale);
        }
        Ok(match trade {
            Some(trade) => QuoteOutcome::Ready(trade),
            None => QuoteOutcome::NotReady,
        })
    }

    /// Wait for the next snapshot, then requote `state` under a new ticket.
    ///
    /// Returns `None` once the sending side has gone away.
    pub async fn requote_on_update(&mut self, state: &SwapState) -> Option<Result<QuoteOutcome>> {
        if self.book_rx.changed().await.is_err() {
            warn!("[QUOTE] book feed closed");
            return None;
        }
        let ticket = self.begin();
        Some(self.quote(ticket, state))
    }
}
