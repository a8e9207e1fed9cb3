//! The feed cycle: compute, decide, broadcast.

use crate::config::{FeedConfig, PriceSource};
use crate::errors::FeedError;
use chrono::Utc;
use graphene_client::ChainDataClient;
use graphene_market::{
    aggregate, market_center_price, price_across_two_markets, price_troy_ounce_to_price_1mg,
    split_pair, DexClient, GoldPriceSource, MarketError, MarketObservation, Metric, TickerClient,
};
use graphene_types::Amount;
use std::sync::Arc;
use std::time::Duration;

/// Debt asset the feed prices, pegged to 1 mg of gold.
pub const DEBT_SYMBOL: &str = "GBG";
/// Core chain asset the feed prices against.
pub const CORE_SYMBOL: &str = "GOLOS";

/// Core asset of the DEX where the survey markets live.
const DEX_CORE: &str = "BTS";
/// Gold-feed assets tried in order when the fiat gold source is down.
/// Their feeds price a troy ounce.
const GOLD_FEED_FALLBACKS: [&str; 2] = ["HONEST.XAU", "GOLD"];
/// Market giving the USD price of the DEX core asset.
const DEX_USD_MARKET: &str = "BTS/RUDEX.USDT";
/// Feed asset fallback for the USD price of the DEX core asset.
const DEX_USD_FEED: &str = "HONEST.USD";
/// Ticker pairs for the exchange price path.
const EXCHANGE_CORE_PAIR: &str = "GOL/BTC";
const EXCHANGE_USD_PAIR: &str = "BTC/USDT";

/// Why a cycle broadcast, or how far the price was from doing so.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Publish(PublishReason),
    Skip { relative_delta: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublishReason {
    /// The published feed is older than the configured maximum age.
    Stale,
    /// The price moved past the publish threshold.
    Threshold { relative_delta: f64 },
}

/// Publish decision for a freshly computed price.
///
/// Staleness wins over the threshold check: a feed older than `max_age` is
/// republished even at zero delta. The delta is `|old/new - 1|`, so a witness
/// that never published (zero old price) always crosses any threshold below
/// 100%. `new_price` is expected positive; callers surface a zero price as an
/// error before deciding.
pub fn decide(
    old_price: f64,
    new_price: f64,
    age: Duration,
    max_age: Duration,
    threshold: f64,
) -> Decision {
    if age > max_age {
        return Decision::Publish(PublishReason::Stale);
    }
    let relative_delta = (old_price / new_price - 1.0).abs();
    if relative_delta > threshold {
        Decision::Publish(PublishReason::Threshold { relative_delta })
    } else {
        Decision::Skip { relative_delta }
    }
}

/// What one feed cycle produced.
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    /// Computed price after correction, in debt units per core asset.
    pub price: f64,
    pub decision: Decision,
    /// Whether a feed was actually broadcast. False on skip and on dry run.
    pub published: bool,
}

/// Publishes a witness's debt-asset price feed.
///
/// Owns no chain state: every cycle re-reads the witness object, so several
/// instances (or a restart) never disagree with the chain.
pub struct FeedPublisher {
    config: FeedConfig,
    metric: Metric,
    source: PriceSource,
    chain: Arc<dyn ChainDataClient>,
    dex: Option<Arc<dyn DexClient>>,
    tickers: Arc<dyn TickerClient>,
    gold: Arc<dyn GoldPriceSource>,
}

impl FeedPublisher {
    pub fn new(
        config: FeedConfig,
        chain: Arc<dyn ChainDataClient>,
        dex: Option<Arc<dyn DexClient>>,
        tickers: Arc<dyn TickerClient>,
        gold: Arc<dyn GoldPriceSource>,
    ) -> Result<Self, FeedError> {
        let metric = config.metric.parse::<Metric>()?;
        let source = config.price_source();
        if source == PriceSource::Dex && dex.is_none() {
            return Err(FeedError::Config(
                "the dex price source needs a DEX client".to_string(),
            ));
        }
        Ok(Self {
            config,
            metric,
            source,
            chain,
            dex,
            tickers,
            gold,
        })
    }

    fn dex(&self) -> Result<&dyn DexClient, FeedError> {
        self.dex
            .as_deref()
            .ok_or_else(|| FeedError::Config("no DEX client configured".to_string()))
    }

    /// Core-asset price of the chain token, aggregated over the configured
    /// DEX markets. Each pair is re-derived against the DEX core asset
    /// through its own base, so thin direct markets still contribute.
    async fn dex_core_price(&self) -> Result<f64, FeedError> {
        let dex = self.dex()?;
        let mut observations = Vec::with_capacity(self.config.markets.len());
        for market in &self.config.markets {
            let (quote, base) = split_pair(market)?;
            let target = format!("{quote}/{DEX_CORE}");
            let (price, volume) =
                price_across_two_markets(dex, &target, &base, self.config.depth_pct).await?;
            tracing::debug!(market, price, volume, "derived market price");
            observations.push(MarketObservation::new(price, volume, market.clone()));
        }
        Ok(aggregate(&observations, self.metric)?)
    }

    /// Price of 1 mg of gold in DEX core units.
    ///
    /// Primary path: fiat gold rate divided by the USD price of the core
    /// asset (order book first, settlement feed as backup). When the fiat
    /// source is down entirely, fall back to the gold-pegged feed assets.
    async fn dex_gold_price(&self) -> Result<f64, FeedError> {
        let dex = self.dex()?;
        match self.gold.usd_per_mg().await {
            Ok(usd_gold) => {
                tracing::info!(usd_gold, "gold price from fiat source, USD per mg");
                let usd_core =
                    match market_center_price(dex, DEX_USD_MARKET, self.config.depth_pct).await {
                        Ok((price, _)) if price > 0.0 => price,
                        Ok(_) => {
                            tracing::warn!(
                                market = DEX_USD_MARKET,
                                "empty USD market, falling back to feed"
                            );
                            dex.feed_price(DEX_USD_FEED, false).await?
                        }
                        Err(err) => {
                            tracing::warn!(
                                market = DEX_USD_MARKET,
                                %err,
                                "USD market failed, falling back to feed"
                            );
                            dex.feed_price(DEX_USD_FEED, false).await?
                        }
                    };
                if usd_core == 0.0 {
                    return Err(MarketError::DivisionByZero.into());
                }
                Ok(usd_gold / usd_core)
            }
            Err(err) => {
                tracing::warn!(%err, "fiat gold source failed, trying feed assets");
                let mut last = FeedError::from(MarketError::InsufficientData);
                for asset in GOLD_FEED_FALLBACKS {
                    match dex.feed_price(asset, true).await {
                        Ok(price_troy_ounce) => {
                            let price = price_troy_ounce_to_price_1mg(price_troy_ounce);
                            tracing::info!(asset, price, "gold price from feed, core units per mg");
                            return Ok(price);
                        }
                        Err(err) => {
                            tracing::warn!(asset, %err, "gold feed failed");
                            last = err.into();
                        }
                    }
                }
                Err(last)
            }
        }
    }

    /// Debt units per core asset from the configured source, before
    /// correction.
    pub async fn reference_price(&self) -> Result<f64, FeedError> {
        match &self.source {
            PriceSource::Dex => {
                let core = self.dex_core_price().await?;
                tracing::info!(core, "chain token price in DEX core units");
                let gold = self.dex_gold_price().await?;
                if gold == 0.0 {
                    return Err(MarketError::DivisionByZero.into());
                }
                let price = core / gold;
                tracing::info!(price, "debt asset price from DEX markets");
                Ok(price)
            }
            PriceSource::Exchange(exchange) => {
                let usd_gold = self.gold.usd_per_mg().await?;
                tracing::info!(usd_gold, "gold price from fiat source, USD per mg");
                let core_btc = self
                    .tickers
                    .fetch_ticker(exchange, EXCHANGE_CORE_PAIR)
                    .await?
                    .last;
                if core_btc <= 0.0 {
                    return Err(MarketError::InsufficientData.into());
                }
                let usd_btc = self
                    .tickers
                    .fetch_ticker(exchange, EXCHANGE_USD_PAIR)
                    .await?
                    .last;
                if usd_btc == 0.0 {
                    return Err(MarketError::DivisionByZero.into());
                }
                let gold_btc = usd_gold / usd_btc;
                if gold_btc == 0.0 {
                    return Err(MarketError::DivisionByZero.into());
                }
                let price = core_btc / gold_btc;
                tracing::info!(exchange, price, "debt asset price from exchange tickers");
                Ok(price)
            }
        }
    }

    /// Apply the correction factor, compare with the witness's published
    /// feed and broadcast when warranted.
    pub async fn decide_and_publish(&self, price: f64) -> Result<CycleOutcome, FeedError> {
        let price = price * self.config.k;
        if self.config.k != 1.0 {
            tracing::info!(price, k = self.config.k, "price after correction");
        }
        // A dead ticker can report a zero last price; that must never reach
        // the chain as a feed.
        if price <= 0.0 {
            return Err(MarketError::InsufficientData.into());
        }

        let witness = self.chain.get_witness(&self.config.witness).await?;
        let old_price = witness.sbd_exchange_rate.price();
        let age = (Utc::now() - witness.last_sbd_exchange_update)
            .to_std()
            .unwrap_or_default();
        tracing::debug!(old_price, age_secs = age.as_secs(), "published feed state");

        let history = self.chain.get_feed_history().await?;
        tracing::info!(
            median = history.current_median_history.price(),
            "current conversion price"
        );

        let decision = decide(
            old_price,
            price,
            age,
            self.config.max_feed_age(),
            self.config.threshold(),
        );
        let published = match decision {
            Decision::Publish(reason) => {
                match reason {
                    PublishReason::Stale => {
                        tracing::info!("published feed older than max age, forcing update")
                    }
                    PublishReason::Threshold { relative_delta } => {
                        tracing::info!(relative_delta, "price moved past threshold")
                    }
                }
                if self.config.dry_run {
                    tracing::info!(price, "dry run, not broadcasting feed");
                    false
                } else {
                    let base = Amount::new(price, DEBT_SYMBOL);
                    let quote = Amount::new(1.0, CORE_SYMBOL);
                    self.chain
                        .publish_price_feed(&self.config.witness, &base, &quote)
                        .await?;
                    true
                }
            }
            Decision::Skip { relative_delta } => {
                tracing::debug!(relative_delta, "price difference below threshold, skipping");
                false
            }
        };

        Ok(CycleOutcome {
            price,
            decision,
            published,
        })
    }

    /// One full feed cycle.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, FeedError> {
        let price = self.reference_price().await?;
        self.decide_and_publish(price).await
    }

    /// Run cycles at the configured interval until the task is dropped.
    /// A failed cycle is logged and the next one runs on schedule.
    pub async fn run_forever(&self) {
        let mut ticker = tokio::time::interval(self.config.cycle_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(outcome) => tracing::info!(
                    price = outcome.price,
                    published = outcome.published,
                    "feed cycle complete"
                ),
                Err(err) => tracing::error!(%err, "feed cycle failed"),
            }
        }
    }
}
