use thiserror::Error;

/// Errors crossing the collaborator boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transaction rejected by the chain: {0}")]
    Broadcast(String),

    #[error("unexpected response shape: {0}")]
    BadResponse(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
