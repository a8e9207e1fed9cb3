//! Minimal JSON-RPC transport shared by the chain and DEX clients.

use crate::errors::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC 2.0 client for Graphene-style nodes, speaking the
/// `call(api, method, params)` envelope over HTTP.
#[derive(Debug)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(RPC_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue `call(api, method, params)` and deserialize the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        api: &str,
        method: &str,
        params: Value,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "call",
            "params": [api, method, params],
        });
        tracing::trace!(api, method, id, "rpc call");

        let envelope: RpcEnvelope = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        let result = envelope
            .result
            .ok_or_else(|| ClientError::BadResponse("missing result".to_string()))?;
        Ok(serde_json::from_value(result)?)
    }
}
