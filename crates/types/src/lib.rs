//! Shared data model for the Graphene operator toolkit.
//!
//! Mirrors the JSON shapes served by a Golos/Steem-style `database_api` so
//! that every crate in the workspace deserializes node responses into the
//! same domain types.

pub mod amount;
pub mod chain_time;
pub mod props;
pub mod witness;

pub use amount::*;
pub use chain_time::*;
pub use props::*;
pub use witness::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
