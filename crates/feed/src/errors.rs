//! Feed daemon errors.

use graphene_client::ClientError;
use graphene_market::MarketError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("market data error: {0}")]
    Market(#[from] MarketError),

    #[error("chain client error: {0}")]
    Client(#[from] ClientError),
}
