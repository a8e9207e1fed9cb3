//! Collaborator clients: chain node RPC, DEX order books, exchange tickers.
//!
//! The computation crates only see the trait seams
//! ([`ChainDataClient`], [`graphene_market::DexClient`],
//! [`graphene_market::TickerClient`]); this crate provides the JSON-RPC and
//! REST implementations over reqwest. Connection lifecycle, timeouts and
//! retries live here, never in the computation layer.

pub mod chain;
pub mod dex;
pub mod errors;
pub mod rpc;
pub mod survey;
pub mod tickers;

pub use chain::*;
pub use dex::*;
pub use errors::*;
pub use rpc::*;
pub use survey::*;
pub use tickers::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
