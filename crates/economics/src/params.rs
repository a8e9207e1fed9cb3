//! Consensus parameter table.
//!
//! These constants mirror one specific protocol version of the node
//! (libraries/chain in golosd v0.16.x). They are gathered in one
//! serializable table instead of scattered literals so a chain upgrade only
//! has to swap the table.

use serde::{Deserialize, Serialize};

/// 100% expressed in basis points.
pub const PERCENT_100: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainParams {
    /// Native (liquid) asset symbol.
    pub native_symbol: String,
    /// Pegged debt asset symbol.
    pub debt_symbol: String,
    /// Vesting share symbol.
    pub vesting_symbol: String,

    /// Reward-curve offset `s` in `(r + s)^2 - s^2`.
    pub content_constant: u128,

    /// Inflation rate at genesis, basis points.
    pub inflation_rate_start: u32,
    /// Inflation floor, basis points.
    pub inflation_rate_floor: u32,
    /// Blocks per basis point of inflation narrowing.
    pub inflation_narrowing_period: u64,

    /// Target block interval, seconds.
    pub block_interval: u64,

    /// Witness schedule size per round.
    pub max_witnesses: u64,
    /// Pay weight of the round-robin (timeshare) slot.
    pub timeshare_weight: u64,
    /// Pay weight of a top-voted slot.
    pub top19_weight: u64,
    /// Normalization divisor for witness pay (19*1 + 1*5 + 1*1).
    pub witness_pay_normalization_factor: u64,

    /// Bandwidth decay window, seconds (7 days).
    pub bandwidth_average_window_seconds: u64,
    /// Bandwidth is tracked in units of 1/precision bytes.
    pub bandwidth_precision: u64,

    /// Voting power regeneration window, seconds (5 days).
    pub vote_regeneration_seconds: u64,
}

impl ChainParams {
    /// Golos mainnet parameters.
    pub fn golos() -> Self {
        Self {
            native_symbol: "GOLOS".to_string(),
            debt_symbol: "GBG".to_string(),
            vesting_symbol: "GESTS".to_string(),
            content_constant: 2_000_000_000_000,
            inflation_rate_start: 1_515,
            inflation_rate_floor: 95,
            inflation_narrowing_period: 250_000,
            block_interval: 3,
            max_witnesses: 21,
            timeshare_weight: 5,
            top19_weight: 1,
            witness_pay_normalization_factor: 25,
            bandwidth_average_window_seconds: 60 * 60 * 24 * 7,
            bandwidth_precision: 1_000_000,
            vote_regeneration_seconds: 5 * 60 * 60 * 24,
        }
    }

    pub fn blocks_per_year(&self) -> f64 {
        (365 * 24 * 60 * 60) as f64 / self.block_interval as f64
    }

    pub fn blocks_per_day(&self) -> f64 {
        (24 * 60 * 60) as f64 / self.block_interval as f64
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::golos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golos_defaults() {
        let params = ChainParams::golos();
        assert_eq!(params.content_constant, 2_000_000_000_000);
        assert_eq!(params.inflation_rate_start, 1515);
        assert_eq!(params.inflation_rate_floor, 95);
        assert_eq!(params.blocks_per_year(), 10_512_000.0);
        assert_eq!(params.blocks_per_day(), 28_800.0);
        // one timeshare slot at weight 5 plus twenty top slots at weight 1
        assert_eq!(
            params.witness_pay_normalization_factor,
            (params.max_witnesses - 1) * params.top19_weight + params.timeshare_weight
        );
    }

    #[test]
    fn table_round_trips_through_serde() {
        let params = ChainParams::golos();
        let json = serde_json::to_string(&params).unwrap();
        let back: ChainParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
