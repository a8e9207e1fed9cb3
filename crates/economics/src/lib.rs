//! Client-side reconstruction of Golos consensus economics.
//!
//! Everything in this crate is a pure, synchronous function over chain
//! snapshots: the reward curve, the inflation schedule, the bandwidth
//! regeneration model, voting-power regeneration and debt-asset analytics.
//! No I/O, no shared state; safe to call from any number of threads.

pub mod bandwidth;
pub mod debt;
pub mod errors;
pub mod inflation;
pub mod params;
pub mod reward;
pub mod voting;

pub use bandwidth::*;
pub use debt::*;
pub use errors::*;
pub use inflation::*;
pub use params::*;
pub use reward::*;
pub use voting::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
