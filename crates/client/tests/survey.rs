//! Witness feed survey against an in-memory chain client.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use graphene_client::{survey, ChainDataClient, ClientError, Result, TxResult};
use graphene_types::{
    AccountInfo, Amount, ChainGlobalProps, ChainMedianProps, ExchangeRate, FeedHistory,
    WitnessInfo,
};

struct FixtureChain {
    feeds: Vec<(&'static str, f64)>,
    fetched: AtomicUsize,
}

impl FixtureChain {
    fn with_feeds(feeds: Vec<(&'static str, f64)>) -> Self {
        Self {
            feeds,
            fetched: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }
}

fn witness(owner: &str, price: f64) -> WitnessInfo {
    let quote = if price == 0.0 { 0.0 } else { 1.0 };
    WitnessInfo {
        owner: owner.to_string(),
        signing_key: "GLS6ZPDH9DVcyEJzAqZr5WHbK3bLzvRBMwMkgpRd9hAEKtUeu8pDK".to_string(),
        url: String::new(),
        total_missed: 0,
        sbd_exchange_rate: ExchangeRate {
            base: Amount::new(price, "GBG"),
            quote: Amount::new(quote, "GOLOS"),
        },
        last_sbd_exchange_update: Utc::now(),
    }
}

#[async_trait]
impl ChainDataClient for FixtureChain {
    async fn get_dynamic_global_properties(&self) -> Result<ChainGlobalProps> {
        Err(ClientError::BadResponse("not wired in this test".to_string()))
    }

    async fn get_chain_median_props(&self) -> Result<ChainMedianProps> {
        Err(ClientError::BadResponse("not wired in this test".to_string()))
    }

    async fn get_active_witnesses(&self) -> Result<Vec<String>> {
        Ok(self.feeds.iter().map(|(owner, _)| owner.to_string()).collect())
    }

    async fn get_witness(&self, owner: &str) -> Result<WitnessInfo> {
        self.fetched.fetch_add(1, Ordering::SeqCst);
        self.feeds
            .iter()
            .find(|(name, _)| *name == owner)
            .map(|(name, price)| witness(name, *price))
            .ok_or_else(|| ClientError::BadResponse(format!("no such witness: {owner}")))
    }

    async fn get_account(&self, _name: &str) -> Result<AccountInfo> {
        Err(ClientError::BadResponse("not wired in this test".to_string()))
    }

    async fn get_feed_history(&self) -> Result<FeedHistory> {
        Err(ClientError::BadResponse("not wired in this test".to_string()))
    }

    async fn publish_price_feed(
        &self,
        _witness: &str,
        _base: &Amount,
        _quote: &Amount,
    ) -> Result<TxResult> {
        Err(ClientError::Broadcast("read-only fixture".to_string()))
    }
}

#[tokio::test]
async fn feeds_are_sorted_and_unpublished_witnesses_are_skipped() {
    let chain =
        FixtureChain::with_feeds(vec![("alice", 1.4), ("bob", 0.0), ("carol", 0.9), ("dave", 1.1)]);

    let feeds = survey::witness_feeds(&chain).await.unwrap();

    let owners: Vec<&str> = feeds.iter().map(|feed| feed.owner.as_str()).collect();
    assert_eq!(owners, ["carol", "dave", "alice"]);
    assert_eq!(feeds[0].price, 0.9);
}

#[tokio::test]
async fn next_median_is_the_middle_published_feed() {
    let chain =
        FixtureChain::with_feeds(vec![("alice", 1.4), ("bob", 0.0), ("carol", 0.9), ("dave", 1.1)]);

    let feeds = survey::witness_feeds(&chain).await.unwrap();
    assert_eq!(survey::estimate_next_median(&feeds), Some(1.1));
}

#[tokio::test]
async fn median_uses_the_survey_without_refetching() {
    let chain = FixtureChain::with_feeds(vec![("alice", 1.4), ("carol", 0.9), ("dave", 1.1)]);

    let feeds = survey::witness_feeds(&chain).await.unwrap();
    assert_eq!(chain.fetches(), feeds.len());
    let _ = survey::estimate_next_median(&feeds);
    assert_eq!(chain.fetches(), feeds.len());
}

#[tokio::test]
async fn empty_survey_has_no_median() {
    let chain = FixtureChain::with_feeds(vec![]);
    assert!(survey::witness_feeds(&chain).await.unwrap().is_empty());
    assert_eq!(survey::estimate_next_median(&[]), None);
}
