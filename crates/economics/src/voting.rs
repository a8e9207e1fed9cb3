//! Real-time voting power, regenerated from the stale stored value.

use crate::params::{ChainParams, PERCENT_100};
use chrono::{DateTime, Utc};
use graphene_types::AccountInfo;

/// Current voting power of an account as a 0-100 percentage.
///
/// The stored `voting_power` only updates on votes; power regenerates
/// linearly over the chain's regeneration window, capped at 100%.
pub fn current_voting_power(
    account: &AccountInfo,
    now: DateTime<Utc>,
    params: &ChainParams,
) -> f64 {
    let stored = account.voting_power as f64 / 100.0;
    let elapsed = (now - account.last_vote_time).num_seconds().max(0) as f64;
    let regenerated =
        PERCENT_100 as f64 * elapsed / params.vote_regeneration_seconds as f64 / 100.0;
    (stored + regenerated).min(100.0)
}
