//! Witness price feed publication.
//!
//! A feed cycle derives a gold-anchored debt-asset price from the configured
//! source, compares it with the witness's published feed and broadcasts an
//! update when the feed is stale or the price moved past the threshold.
//! Cycles are stateless: every run re-reads chain state.

pub mod config;
pub mod errors;
pub mod publisher;

pub use config::*;
pub use errors::*;
pub use publisher::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
