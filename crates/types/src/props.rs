//! Global chain state snapshots.

use crate::amount::{u128_from_string_or_number, Amount};
use crate::chain_time::chain_time_serde;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dynamic global properties, an immutable chain snapshot fetched fresh per
/// computation. Field names match the node's `get_dynamic_global_properties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainGlobalProps {
    pub head_block_number: u64,
    #[serde(with = "chain_time_serde")]
    pub time: DateTime<Utc>,
    pub virtual_supply: Amount,
    pub current_supply: Amount,
    /// Debt-asset supply (GBG on Golos).
    pub current_sbd_supply: Amount,
    /// Debt-asset print rate in basis points (0-10000).
    pub sbd_print_rate: u16,
    pub total_vesting_shares: Amount,
    pub total_reward_fund_steem: Amount,
    #[serde(deserialize_with = "u128_from_string_or_number")]
    pub total_reward_shares2: u128,
    #[serde(deserialize_with = "u128_from_string_or_number")]
    pub max_virtual_bandwidth: u128,
}

/// Witness-voted chain parameters (median props). Only the inflation split
/// percents are consumed here; each is in basis points and the remainder up
/// to 10000 is the implicit author/content share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChainMedianProps {
    pub worker_reward_percent: u16,
    pub witness_reward_percent: u16,
    pub vesting_reward_percent: u16,
}

/// Account state relevant to bandwidth and voting-power estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub name: String,
    pub vesting_shares: Amount,
    pub delegated_vesting_shares: Amount,
    pub received_vesting_shares: Amount,
    /// Stored as a stringified integer by newer node versions.
    #[serde(deserialize_with = "u128_from_string_or_number")]
    pub average_bandwidth: u128,
    #[serde(deserialize_with = "u128_from_string_or_number")]
    pub average_market_bandwidth: u128,
    #[serde(with = "chain_time_serde")]
    pub last_bandwidth_update: DateTime<Utc>,
    #[serde(with = "chain_time_serde")]
    pub last_market_bandwidth_update: DateTime<Utc>,
    /// Stale stored voting power, basis points.
    pub voting_power: u16,
    #[serde(with = "chain_time_serde")]
    pub last_vote_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_node_props_json() {
        let raw = serde_json::json!({
            "head_block_number": 40_000_000u64,
            "time": "2023-04-01T12:30:45",
            "virtual_supply": "250000000.000 GOLOS",
            "current_supply": "210000000.000 GOLOS",
            "current_sbd_supply": "2500000.000 GBG",
            "sbd_print_rate": 10000,
            "total_vesting_shares": "150000000000.000000 GESTS",
            "total_reward_fund_steem": "50000.000 GOLOS",
            "total_reward_shares2": "1234567890123456789012345",
            "max_virtual_bandwidth": "5986734968066277376"
        });
        let props: ChainGlobalProps = serde_json::from_value(raw).unwrap();
        assert_eq!(props.head_block_number, 40_000_000);
        assert_eq!(props.total_reward_shares2, 1234567890123456789012345u128);
        assert_eq!(props.virtual_supply.symbol, "GOLOS");
    }
}
