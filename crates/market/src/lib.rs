//! External market price aggregation.
//!
//! Combines order-book depth measurements and exchange tickers into a single
//! reference price: per-market observations, median/mean/volume-weighted
//! aggregation, cross-market price derivation through an intermediate asset,
//! and the gold/fiat reference feeds used to anchor the debt asset.

pub mod book;
pub mod cross;
pub mod errors;
pub mod gold;
pub mod observation;
pub mod source;

pub use book::*;
pub use cross::*;
pub use errors::*;
pub use gold::*;
pub use observation::*;
pub use source::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
