//! Witness objects and price feeds.

use crate::amount::Amount;
use crate::chain_time::chain_time_serde;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A witness's published exchange rate for the debt asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: Amount,
    pub quote: Amount,
}

impl ExchangeRate {
    /// Published price as base/quote. Zero when the witness never published
    /// a feed (the node leaves the quote at zero in that case).
    pub fn price(&self) -> f64 {
        if self.quote.amount == 0.0 {
            return 0.0;
        }
        self.base.amount / self.quote.amount
    }
}

/// Witness object as returned by `get_witness_by_account`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitnessInfo {
    pub owner: String,
    pub signing_key: String,
    pub url: String,
    pub total_missed: u32,
    pub sbd_exchange_rate: ExchangeRate,
    #[serde(with = "chain_time_serde")]
    pub last_sbd_exchange_update: DateTime<Utc>,
}

/// A witness feed paired with its owner, used for chain-wide feed surveys.
#[derive(Debug, Clone, PartialEq)]
pub struct WitnessFeed {
    pub owner: String,
    pub price: f64,
}

/// Feed history entry from `get_feed_history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedHistory {
    pub current_median_history: ExchangeRate,
    #[serde(default)]
    pub price_history: Vec<ExchangeRate>,
}

impl FeedHistory {
    /// The most recent price-history point, which is the best available
    /// estimate of the next conversion median.
    pub fn latest_price(&self) -> Option<f64> {
        self.price_history.last().map(ExchangeRate::price)
    }
}
