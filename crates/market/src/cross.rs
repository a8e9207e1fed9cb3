//! Cross-market price derivation through an intermediate asset.

use crate::book::{buy_price_pct_depth, center_price, sell_price_pct_depth};
use crate::errors::MarketError;
use crate::source::{split_pair, DexClient, FETCH_DEPTH};

/// Center price and bounding volume of one market, measured `depth_pct`
/// percent into each side of the book. A one-sided or empty book yields
/// `(0, 0)` rather than an error.
pub async fn market_center_price(
    dex: &dyn DexClient,
    market: &str,
    depth_pct: f64,
) -> Result<(f64, f64), MarketError> {
    let book = dex.order_book(market, FETCH_DEPTH).await?;
    let (buy_price, buy_volume) = buy_price_pct_depth(&book, depth_pct)?;
    let (sell_price, sell_volume) = sell_price_pct_depth(&book, depth_pct)?;

    let center = center_price(buy_price, sell_price);
    if center == 0.0 {
        return Ok((0.0, 0.0));
    }
    Ok((center, buy_volume.min(sell_volume)))
}

/// Derive the A/C price from the A/B and B/C markets.
///
/// Both legs are measured concurrently. The returned volume is the minimum
/// of the two legs with the second leg converted into A units, so confidence
/// is bounded by the thinner market. When `base == via` the single direct
/// market answers.
pub async fn price_across_two_markets(
    dex: &dyn DexClient,
    market: &str,
    via: &str,
    depth_pct: f64,
) -> Result<(f64, f64), MarketError> {
    let (quote, base) = split_pair(market)?;

    let market1 = format!("{quote}/{via}");
    if base == via {
        return market_center_price(dex, &market1, depth_pct).await;
    }

    let market2 = format!("{via}/{base}");
    let (leg1, leg2) = tokio::join!(
        market_center_price(dex, &market1, depth_pct),
        market_center_price(dex, &market2, depth_pct),
    );
    let (price1, volume1) = leg1?;
    let (price2, volume2) = leg2?;
    tracing::debug!(market1, price1, volume1, market2, price2, volume2, "cross-price legs");

    let price = price1 * price2;
    let volume = if price1 == 0.0 {
        0.0
    } else {
        volume1.min(volume2 / price1)
    };

    Ok((price, volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookLevel, OrderBook};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixtureDex {
        books: HashMap<String, OrderBook>,
    }

    #[async_trait]
    impl DexClient for FixtureDex {
        async fn order_book(&self, market: &str, _limit: usize) -> Result<OrderBook, MarketError> {
            Ok(self.books.get(market).cloned().unwrap_or_default())
        }

        async fn feed_price(&self, _asset: &str, _invert: bool) -> Result<f64, MarketError> {
            Err(MarketError::Source("no feeds in fixture".to_string()))
        }
    }

    fn symmetric_book(price: f64, quote_volume: f64) -> OrderBook {
        OrderBook {
            bids: vec![BookLevel {
                price,
                base: price * quote_volume,
                quote: quote_volume,
            }],
            asks: vec![BookLevel {
                price,
                base: price * quote_volume,
                quote: quote_volume,
            }],
            base_fee_percent: 0.0,
            quote_fee_percent: 0.0,
        }
    }

    fn dex() -> FixtureDex {
        let mut books = HashMap::new();
        // GOLOS/BTS at 2.0 BTS per GOLOS, 100 GOLOS deep
        books.insert("GOLOS/BTS".to_string(), symmetric_book(2.0, 100.0));
        // BTS/BTC at 0.0001 BTC per BTS, 500 BTS deep
        books.insert("BTS/BTC".to_string(), symmetric_book(0.0001, 500.0));
        FixtureDex { books }
    }

    #[tokio::test]
    async fn direct_market_when_base_is_via() {
        let (price, volume) = price_across_two_markets(&dex(), "GOLOS/BTS", "BTS", 10.0)
            .await
            .unwrap();
        assert!((price - 2.0).abs() < 1e-12);
        assert_eq!(volume, 100.0);
    }

    #[tokio::test]
    async fn derived_price_is_product_of_legs() {
        let (price, volume) = price_across_two_markets(&dex(), "GOLOS/BTC", "BTS", 10.0)
            .await
            .unwrap();
        assert!((price - 2.0 * 0.0001).abs() < 1e-12);
        // second leg holds 500 BTS = 250 GOLOS at leg-one price; leg one is thinner
        assert_eq!(volume, 100.0);
    }

    #[tokio::test]
    async fn thin_second_leg_bounds_volume() {
        let mut fixture = dex();
        fixture
            .books
            .insert("BTS/BTC".to_string(), symmetric_book(0.0001, 100.0));
        let (_, volume) = price_across_two_markets(&fixture, "GOLOS/BTC", "BTS", 10.0)
            .await
            .unwrap();
        // 100 BTS / 2.0 = 50 GOLOS equivalent
        assert_eq!(volume, 50.0);
    }

    #[tokio::test]
    async fn missing_market_fails_closed() {
        let (price, volume) = price_across_two_markets(&dex(), "GOLOS/RUBLE", "BTS", 10.0)
            .await
            .unwrap();
        assert_eq!(price, 0.0);
        assert_eq!(volume, 0.0);
    }
}
