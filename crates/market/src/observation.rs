//! Multi-market observations and their aggregation into one price.

use crate::errors::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One price point from one market, with the volume backing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    pub price: f64,
    pub volume: f64,
    pub market: String,
}

impl MarketObservation {
    pub fn new(price: f64, volume: f64, market: impl Into<String>) -> Self {
        Self {
            price,
            volume,
            market: market.into(),
        }
    }
}

/// Aggregation metric over a set of observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Median,
    Mean,
    WeightedAverage,
}

impl FromStr for Metric {
    type Err = MarketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "median" => Ok(Metric::Median),
            "mean" => Ok(Metric::Mean),
            "weighted_average" => Ok(Metric::WeightedAverage),
            other => Err(MarketError::Source(format!("unknown metric: {other}"))),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Median => "median",
            Metric::Mean => "mean",
            Metric::WeightedAverage => "weighted_average",
        };
        f.write_str(name)
    }
}

/// Combine observations into a single reference price.
///
/// Zero-priced observations (markets that failed closed) are filtered out
/// before aggregation. Median and mean work on prices alone; the weighted
/// average weights each price by its observation volume.
pub fn aggregate(observations: &[MarketObservation], metric: Metric) -> Result<f64, MarketError> {
    let usable: Vec<&MarketObservation> = observations.iter().filter(|o| o.price > 0.0).collect();
    if usable.is_empty() {
        return Err(MarketError::InsufficientData);
    }

    let price = match metric {
        Metric::Median => {
            let mut prices: Vec<f64> = usable.iter().map(|o| o.price).collect();
            prices.sort_by(|a, b| a.total_cmp(b));
            let mid = prices.len() / 2;
            if prices.len() % 2 == 0 {
                (prices[mid - 1] + prices[mid]) / 2.0
            } else {
                prices[mid]
            }
        }
        Metric::Mean => {
            usable.iter().map(|o| o.price).sum::<f64>() / usable.len() as f64
        }
        Metric::WeightedAverage => {
            let total_volume: f64 = usable.iter().map(|o| o.volume).sum();
            if total_volume == 0.0 {
                return Err(MarketError::DivisionByZero);
            }
            usable.iter().map(|o| o.price * o.volume).sum::<f64>() / total_volume
        }
    };

    tracing::debug!(%metric, price, observations = usable.len(), "aggregated market price");
    Ok(price)
}
