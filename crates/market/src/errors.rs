use thiserror::Error;

/// Errors from price aggregation and market data retrieval.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("no usable price observations to aggregate")]
    InsufficientData,

    #[error("total volume is zero, cannot weight prices")]
    DivisionByZero,

    #[error("depth_pct must be greater than 0, got {0}")]
    InvalidDepth(f64),

    #[error("malformed market pair: {0:?}")]
    BadPair(String),

    #[error("market data source error: {0}")]
    Source(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
