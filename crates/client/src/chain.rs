//! Chain node access.

use crate::errors::{ClientError, Result};
use crate::rpc::JsonRpcClient;
use async_trait::async_trait;
use graphene_types::{
    AccountInfo, Amount, ChainGlobalProps, ChainMedianProps, FeedHistory, WitnessInfo,
};
use serde_json::{json, Value};

/// Result of a broadcast transaction.
#[derive(Debug, Clone)]
pub struct TxResult {
    pub raw: Value,
}

/// Read access to chain state plus the one write this toolkit performs
/// (witness feed publication). Implementations own connections and
/// timeouts; callers treat a failed call as a single synchronous error.
#[async_trait]
pub trait ChainDataClient: Send + Sync {
    async fn get_dynamic_global_properties(&self) -> Result<ChainGlobalProps>;

    async fn get_chain_median_props(&self) -> Result<ChainMedianProps>;

    async fn get_active_witnesses(&self) -> Result<Vec<String>>;

    async fn get_witness(&self, owner: &str) -> Result<WitnessInfo>;

    async fn get_account(&self, name: &str) -> Result<AccountInfo>;

    async fn get_feed_history(&self) -> Result<FeedHistory>;

    /// Broadcast a `feed_publish` operation for `witness`. Chain-side
    /// rejection (missing authority, bad key) surfaces as
    /// [`ClientError::Broadcast`].
    async fn publish_price_feed(
        &self,
        witness: &str,
        base: &Amount,
        quote: &Amount,
    ) -> Result<TxResult>;
}

/// [`ChainDataClient`] over a node's HTTP JSON-RPC endpoint. Broadcast
/// goes through the node's signing endpoint; key custody stays outside
/// this toolkit.
#[derive(Debug)]
pub struct JsonRpcChainClient {
    rpc: JsonRpcClient,
}

impl JsonRpcChainClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(endpoint)?,
        })
    }
}

#[async_trait]
impl ChainDataClient for JsonRpcChainClient {
    async fn get_dynamic_global_properties(&self) -> Result<ChainGlobalProps> {
        self.rpc
            .call("database_api", "get_dynamic_global_properties", json!([]))
            .await
    }

    async fn get_chain_median_props(&self) -> Result<ChainMedianProps> {
        self.rpc
            .call("database_api", "get_chain_properties", json!([]))
            .await
    }

    async fn get_active_witnesses(&self) -> Result<Vec<String>> {
        self.rpc
            .call("database_api", "get_active_witnesses", json!([]))
            .await
    }

    async fn get_witness(&self, owner: &str) -> Result<WitnessInfo> {
        let witness: Option<WitnessInfo> = self
            .rpc
            .call("database_api", "get_witness_by_account", json!([owner]))
            .await?;
        witness.ok_or_else(|| ClientError::BadResponse(format!("no such witness: {owner}")))
    }

    async fn get_account(&self, name: &str) -> Result<AccountInfo> {
        let accounts: Vec<AccountInfo> = self
            .rpc
            .call("database_api", "get_accounts", json!([[name]]))
            .await?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::BadResponse(format!("no such account: {name}")))
    }

    async fn get_feed_history(&self) -> Result<FeedHistory> {
        self.rpc
            .call("database_api", "get_feed_history", json!([]))
            .await
    }

    async fn publish_price_feed(
        &self,
        witness: &str,
        base: &Amount,
        quote: &Amount,
    ) -> Result<TxResult> {
        let params = json!([
            witness,
            { "base": base.to_string(), "quote": quote.to_string() },
            true,
        ]);
        let result: Value = self
            .rpc
            .call("witness_api", "feed_publish", params)
            .await
            .map_err(|err| match err {
                ClientError::Rpc { message, .. } => ClientError::Broadcast(message),
                other => other,
            })?;
        tracing::info!(witness, %base, %quote, "price feed broadcast");
        Ok(TxResult { raw: result })
    }
}
