//! Trait seams for external market data.
//!
//! The aggregation logic stays independent of any concrete exchange or DEX
//! API; implementations live in `graphene-client`.

use crate::book::OrderBook;
use crate::errors::MarketError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How many levels of the order book to request for depth measurement.
pub const FETCH_DEPTH: usize = 50;

/// A minimal exchange ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub last: f64,
}

/// A decentralized exchange exposing order books and settlement feeds.
#[async_trait]
pub trait DexClient: Send + Sync {
    /// Order book for a `QUOTE/BASE` market, best levels first.
    async fn order_book(&self, market: &str, limit: usize) -> Result<OrderBook, MarketError>;

    /// Settlement feed price of a market-pegged asset. By default the price
    /// is MPA per backing asset; `invert` flips it.
    async fn feed_price(&self, asset: &str, invert: bool) -> Result<f64, MarketError>;
}

/// A centralized exchange ticker source.
#[async_trait]
pub trait TickerClient: Send + Sync {
    async fn fetch_ticker(&self, exchange: &str, market: &str) -> Result<Ticker, MarketError>;
}

/// Split a market pair like `RUDEX.GOLOS/BTS` into `(QUOTE, BASE)`.
/// Accepted separators: `/`, `:`, `-`.
pub fn split_pair(market: &str) -> Result<(String, String), MarketError> {
    let upper = market.to_uppercase();
    let mut parts = upper.splitn(2, ['/', ':', '-']);
    let quote = parts.next().filter(|s| !s.is_empty());
    let base = parts.next().filter(|s| !s.is_empty());
    match (quote, base) {
        (Some(quote), Some(base)) => Ok((quote.to_string(), base.to_string())),
        _ => Err(MarketError::BadPair(market.to_string())),
    }
}
