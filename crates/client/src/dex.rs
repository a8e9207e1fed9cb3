//! DEX market data over the exchange node's JSON-RPC API.

use crate::errors::{ClientError, Result};
use crate::rpc::JsonRpcClient;
use async_trait::async_trait;
use graphene_market::{split_pair, BookLevel, DexClient, MarketError, OrderBook};
use serde::Deserialize;
use serde_json::json;

/// Graphene market fees are expressed in basis points.
const FEE_SCALE: f64 = 10_000.0;

#[derive(Debug, Deserialize)]
struct RawLevel {
    price: f64,
    base: f64,
    quote: f64,
}

#[derive(Debug, Deserialize)]
struct RawOrderBook {
    bids: Vec<RawLevel>,
    asks: Vec<RawLevel>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    symbol: String,
    market_fee_percent: f64,
}

#[derive(Debug, Deserialize)]
struct RawPriceSide {
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct RawSettlementPrice {
    base: RawPriceSide,
    quote: RawPriceSide,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    settlement_price: RawSettlementPrice,
}

/// [`DexClient`] over the DEX node's `market_api`/`database_api`.
#[derive(Debug)]
pub struct HttpDexClient {
    rpc: JsonRpcClient,
}

impl HttpDexClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(endpoint)?,
        })
    }
}

fn source_err(err: ClientError) -> MarketError {
    MarketError::Source(err.to_string())
}

#[async_trait]
impl DexClient for HttpDexClient {
    async fn order_book(
        &self,
        market: &str,
        limit: usize,
    ) -> std::result::Result<OrderBook, MarketError> {
        let (quote, base) = split_pair(market)?;

        // Book and fee lookups are independent.
        let book_call = self.rpc.call::<RawOrderBook>(
            "market_api",
            "get_order_book",
            json!([base, quote, limit]),
        );
        let assets_call = self.rpc.call::<Vec<RawAsset>>(
            "database_api",
            "get_assets",
            json!([[base, quote]]),
        );
        let (book, assets) = tokio::join!(book_call, assets_call);
        let book = book.map_err(source_err)?;
        let assets = assets.map_err(source_err)?;

        let fee_of = |symbol: &str| {
            assets
                .iter()
                .find(|asset| asset.symbol == symbol)
                .map(|asset| asset.market_fee_percent / FEE_SCALE)
                .unwrap_or(0.0)
        };

        let to_levels = |raw: Vec<RawLevel>| {
            raw.into_iter()
                .map(|level| BookLevel {
                    price: level.price,
                    base: level.base,
                    quote: level.quote,
                })
                .collect()
        };

        Ok(OrderBook {
            bids: to_levels(book.bids),
            asks: to_levels(book.asks),
            base_fee_percent: fee_of(&base),
            quote_fee_percent: fee_of(&quote),
        })
    }

    async fn feed_price(
        &self,
        asset: &str,
        invert: bool,
    ) -> std::result::Result<f64, MarketError> {
        let feed: RawFeed = self
            .rpc
            .call("database_api", "get_feed", json!([asset]))
            .await
            .map_err(source_err)?;

        let base = feed.settlement_price.base.amount;
        let quote = feed.settlement_price.quote.amount;
        if base == 0.0 || quote == 0.0 {
            return Err(MarketError::Source(format!(
                "empty settlement price for {asset}"
            )));
        }
        let price = base / quote;
        Ok(if invert { 1.0 / price } else { price })
    }
}
