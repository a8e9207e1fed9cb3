//! Operator configuration for the feed daemon.

use crate::errors::FeedError;
use serde::Deserialize;
use std::time::Duration;

/// Where the reference price comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// DEX order books, cross-derived through the DEX core asset.
    Dex,
    /// A centralized exchange ticker, by exchange name. Whether the
    /// exchange is supported is the ticker client's call.
    Exchange(String),
}

/// Feed daemon configuration, deserialized from the operator's YAML file.
///
/// Only `nodes` and `witness` are mandatory; everything else falls back to
/// the defaults below. Unknown keys are ignored so one file can carry the
/// settings of several tools.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Chain node RPC endpoints. The first entry is used.
    pub nodes: Vec<String>,
    /// Witness account to publish the feed for. The signing node must hold
    /// this witness's active authority.
    pub witness: String,
    /// Price source: `dex` (alias `bitshares`) or an exchange name.
    #[serde(default = "default_source")]
    pub source: String,
    /// DEX node endpoint, required when `source` is `dex`.
    #[serde(default)]
    pub node_dex: Option<String>,
    /// DEX markets to survey, `QUOTE/BASE` pairs.
    #[serde(default = "default_markets")]
    pub markets: Vec<String>,
    /// Aggregation metric: `median`, `mean` or `weighted_average`.
    #[serde(default = "default_metric")]
    pub metric: String,
    /// How deep into each order book to measure, in percent off the best
    /// price.
    #[serde(default = "default_depth_pct")]
    pub depth_pct: f64,
    /// Relative price change, in percent, that triggers a publish.
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: f64,
    /// Seconds between feed cycles.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Correction coefficient applied to the computed price.
    #[serde(default = "default_k")]
    pub k: f64,
    /// Feed age, in seconds, past which a publish is forced.
    #[serde(default = "default_max_age")]
    pub max_age: u64,
    /// Compute and decide, but never broadcast.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_source() -> String {
    "dex".to_string()
}

fn default_markets() -> Vec<String> {
    [
        "RUDEX.GOLOS/BTS",
        "RUDEX.GOLOS/RUDEX.BTC",
        "RUDEX.GOLOS/RUBLE",
        "RUDEX.GOLOS/RUDEX.USDT",
    ]
    .map(String::from)
    .to_vec()
}

fn default_metric() -> String {
    "weighted_average".to_string()
}

fn default_depth_pct() -> f64 {
    20.0
}

fn default_threshold_pct() -> f64 {
    10.0
}

fn default_interval() -> u64 {
    3600
}

fn default_k() -> f64 {
    1.0
}

fn default_max_age() -> u64 {
    86400
}

impl FeedConfig {
    pub fn from_yaml(raw: &str) -> Result<Self, FeedError> {
        let config: FeedConfig =
            serde_yaml::from_str(raw).map_err(|err| FeedError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), FeedError> {
        if self.nodes.is_empty() {
            return Err(FeedError::Config("at least one node is required".to_string()));
        }
        if self.witness.is_empty() {
            return Err(FeedError::Config("witness must not be empty".to_string()));
        }
        if self.price_source() == PriceSource::Dex && self.node_dex.is_none() {
            return Err(FeedError::Config(
                "node_dex is required for the dex price source".to_string(),
            ));
        }
        Ok(())
    }

    pub fn price_source(&self) -> PriceSource {
        match self.source.as_str() {
            "dex" | "bitshares" => PriceSource::Dex,
            exchange => PriceSource::Exchange(exchange.to_string()),
        }
    }

    /// Publish threshold as a fraction.
    pub fn threshold(&self) -> f64 {
        self.threshold_pct / 100.0
    }

    pub fn max_feed_age(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = FeedConfig::from_yaml(
            "nodes: [\"https://node.example.com\"]\nwitness: alice\nnode_dex: \"wss://dex.example.com\"\n",
        )
        .unwrap();
        assert_eq!(config.price_source(), PriceSource::Dex);
        assert_eq!(config.metric, "weighted_average");
        assert_eq!(config.depth_pct, 20.0);
        assert_eq!(config.threshold(), 0.1);
        assert_eq!(config.interval, 3600);
        assert_eq!(config.k, 1.0);
        assert_eq!(config.max_feed_age(), Duration::from_secs(86400));
        assert!(!config.dry_run);
        assert_eq!(config.markets.len(), 4);
    }

    #[test]
    fn exchange_source_does_not_need_a_dex_node() {
        let config =
            FeedConfig::from_yaml("nodes: [\"https://node.example.com\"]\nwitness: alice\nsource: kuna\n")
                .unwrap();
        assert_eq!(config.price_source(), PriceSource::Exchange("kuna".to_string()));
    }

    #[test]
    fn dex_source_without_dex_node_is_rejected() {
        let err = FeedConfig::from_yaml("nodes: [\"https://node.example.com\"]\nwitness: alice\n")
            .unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = FeedConfig::from_yaml(
            "nodes: [\"https://node.example.com\"]\nwitness: alice\nsource: kuna\nkeys: [\"5J...\"]\n",
        )
        .unwrap();
        assert_eq!(config.witness, "alice");
    }
}
