//! Order-book depth measurement.
//!
//! All functions here are pure over an [`OrderBook`] snapshot; fetching the
//! book is the [`crate::source::DexClient`]'s job. Prices are BASE/QUOTE,
//! volumes are in QUOTE units.

use crate::errors::MarketError;
use serde::{Deserialize, Serialize};

/// One aggregated order-book level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub base: f64,
    pub quote: f64,
}

/// Order-book snapshot with the per-asset market fees attached, as DEX
/// nodes report them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    /// Sorted best-first (descending price).
    pub bids: Vec<BookLevel>,
    /// Sorted best-first (ascending price).
    pub asks: Vec<BookLevel>,
    /// Market fee fraction charged on the base asset.
    #[serde(default)]
    pub base_fee_percent: f64,
    /// Market fee fraction charged on the quote asset.
    #[serde(default)]
    pub quote_fee_percent: f64,
}

/// Average buy price and QUOTE volume within `depth_pct` percent below the
/// highest bid. Empty book fails closed to `(0, 0)`.
pub fn buy_price_pct_depth(book: &OrderBook, depth_pct: f64) -> Result<(f64, f64), MarketError> {
    if depth_pct <= 0.0 {
        return Err(MarketError::InvalidDepth(depth_pct));
    }
    let Some(best) = book.bids.first() else {
        return Ok((0.0, 0.0));
    };

    let stop_price = best.price / (1.0 + depth_pct / 100.0);
    let mut quote_amount = 0.0;
    let mut base_amount = 0.0;
    for level in &book.bids {
        if level.price > stop_price {
            quote_amount += level.quote;
            base_amount += level.base;
        } else {
            break;
        }
    }

    // A buyer receives fee-reduced quote; volume is inflated accordingly.
    quote_amount *= 1.0 + book.base_fee_percent;

    Ok((base_amount / quote_amount, quote_amount))
}

/// Average sell price and QUOTE volume within `depth_pct` percent above the
/// lowest ask. Empty book fails closed to `(0, 0)`.
pub fn sell_price_pct_depth(book: &OrderBook, depth_pct: f64) -> Result<(f64, f64), MarketError> {
    if depth_pct <= 0.0 {
        return Err(MarketError::InvalidDepth(depth_pct));
    }
    let Some(best) = book.asks.first() else {
        return Ok((0.0, 0.0));
    };

    let stop_price = best.price * (1.0 + depth_pct / 100.0);
    let mut quote_amount = 0.0;
    let mut base_amount = 0.0;
    for level in &book.asks {
        if level.price < stop_price {
            quote_amount += level.quote;
            base_amount += level.base;
        } else {
            break;
        }
    }

    quote_amount /= 1.0 + book.quote_fee_percent;

    Ok((base_amount / quote_amount, quote_amount))
}

/// Geometric-mean center price of a market, `buy * sqrt(sell / buy)`.
/// Returns 0 for a one-sided or empty book.
pub fn center_price(buy_price: f64, sell_price: f64) -> f64 {
    if buy_price == 0.0 || sell_price == 0.0 {
        return 0.0;
    }
    buy_price * (sell_price / buy_price).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(price: f64, quote: f64) -> BookLevel {
        BookLevel {
            price,
            base: price * quote,
            quote,
        }
    }

    fn book() -> OrderBook {
        OrderBook {
            bids: vec![level(0.95, 100.0), level(0.90, 200.0), level(0.50, 1000.0)],
            asks: vec![level(1.05, 100.0), level(1.10, 200.0), level(2.00, 1000.0)],
            base_fee_percent: 0.0,
            quote_fee_percent: 0.0,
        }
    }

    #[test]
    fn depth_walk_stops_at_cutoff() {
        // 10% depth below 0.95 reaches 0.8636..: includes 0.95 and 0.90 only
        let (price, volume) = buy_price_pct_depth(&book(), 10.0).unwrap();
        assert_eq!(volume, 300.0);
        let expected = (0.95 * 100.0 + 0.90 * 200.0) / 300.0;
        assert!((price - expected).abs() < 1e-12);

        let (price, volume) = sell_price_pct_depth(&book(), 10.0).unwrap();
        assert_eq!(volume, 300.0);
        let expected = (1.05 * 100.0 + 1.10 * 200.0) / 300.0;
        assert!((price - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_book_fails_closed() {
        let empty = OrderBook::default();
        assert_eq!(buy_price_pct_depth(&empty, 10.0).unwrap(), (0.0, 0.0));
        assert_eq!(sell_price_pct_depth(&empty, 10.0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn non_positive_depth_is_rejected() {
        assert!(matches!(
            buy_price_pct_depth(&book(), 0.0),
            Err(MarketError::InvalidDepth(_))
        ));
        assert!(matches!(
            sell_price_pct_depth(&book(), -5.0),
            Err(MarketError::InvalidDepth(_))
        ));
    }

    #[test]
    fn fees_shift_measured_volume() {
        let mut with_fee = book();
        with_fee.base_fee_percent = 0.001;
        let (_, volume_plain) = buy_price_pct_depth(&book(), 10.0).unwrap();
        let (_, volume_fee) = buy_price_pct_depth(&with_fee, 10.0).unwrap();
        assert!((volume_fee / volume_plain - 1.001).abs() < 1e-9);
    }

    #[test]
    fn center_price_is_geometric_mean() {
        let center = center_price(0.9, 1.1);
        assert!((center - 0.9 * (1.1f64 / 0.9).sqrt()).abs() < 1e-12);
        // symmetric book centers at the midpoint in log space
        assert!((center_price(2.0, 2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn center_price_of_one_sided_book_is_zero() {
        assert_eq!(center_price(0.0, 1.1), 0.0);
        assert_eq!(center_price(0.9, 0.0), 0.0);
    }
}
