//! Per-block inflation simulation.
//!
//! Re-derives the node's emission schedule over an arbitrary block range:
//! the inflation rate narrows by one basis point every
//! `inflation_narrowing_period` blocks until it hits the floor, and every
//! block emits `virtual_supply * rate / (10000 * blocks_per_year)`.

use crate::params::{ChainParams, PERCENT_100};
use serde::{Deserialize, Serialize};

/// Inflation split percents, basis points. The implicit remainder up to
/// 10000 is the content (author/curation) share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmissionPercents {
    pub worker: u16,
    pub witness: u16,
    pub vesting: u16,
}

/// Simulated emission over a block range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub worker: f64,
    pub witness: f64,
    pub vesting: f64,
    pub content: f64,
    /// Witness pay attributed to top-voted production slots (precise only).
    pub top19: f64,
    /// Witness pay attributed to round-robin slots (precise only).
    pub timeshare: f64,
    /// Virtual supply after the simulated range.
    pub virtual_supply: f64,
    /// Inflation rate at the end of the range, as a fraction.
    pub current_inflation_rate: f64,
    pub total: f64,
}

fn inflation_rate_at(block_num: u64, params: &ChainParams) -> u64 {
    let adjustment = block_num / params.inflation_narrowing_period;
    (params.inflation_rate_start as u64)
        .saturating_sub(adjustment)
        .max(params.inflation_rate_floor as u64)
}

/// Simulate emission from `start_block` to `stop_block` (exclusive).
///
/// With `precise = false` only the grand total is accumulated per block and
/// the bucket split is applied once at the end. This assumes the percents
/// are constant across the whole range; if the voted parameters step-change
/// mid-range the fast path diverges from the precise one. Use
/// `precise = true` for short validation windows (a day) and the fast path
/// for multi-year projections.
///
/// With `precise = true` every block's emission is split into
/// worker/witness/vesting/content, and the witness bucket is weighted by
/// producer slot: each 21st block is a timeshare slot paid at weight 5, the
/// rest are top-voted slots at weight 1, normalized by 25.
pub fn simulate(
    start_block: u64,
    stop_block: u64,
    virtual_supply: f64,
    percents: EmissionPercents,
    precise: bool,
    params: &ChainParams,
) -> Emission {
    let percent_100 = PERCENT_100 as f64;
    let blocks_per_year = params.blocks_per_year();

    let mut supply = virtual_supply;
    let mut worker_acc = 0.0;
    let mut witness_acc = 0.0;
    let mut vesting_acc = 0.0;
    let mut content_acc = 0.0;
    let mut top19_acc = 0.0;
    let mut timeshare_acc = 0.0;
    let mut raw_total = 0.0;

    let mut rate = inflation_rate_at(start_block, params);

    for block_num in start_block..stop_block {
        rate = inflation_rate_at(block_num, params);
        let new_emission = supply * rate as f64 / (percent_100 * blocks_per_year);

        if precise {
            let worker = new_emission * percents.worker as f64 / percent_100;
            let mut witness = new_emission * percents.witness as f64 / percent_100;
            let vesting = new_emission * percents.vesting as f64 / percent_100;
            let content = new_emission - worker - witness - vesting;

            // Full witness pool for the round, then weight by slot kind.
            witness *= params.max_witnesses as f64;
            if block_num % params.max_witnesses == 0 {
                witness = witness * params.timeshare_weight as f64
                    / params.witness_pay_normalization_factor as f64;
                timeshare_acc += witness;
            } else {
                witness = witness * params.top19_weight as f64
                    / params.witness_pay_normalization_factor as f64;
                top19_acc += witness;
            }

            worker_acc += worker;
            witness_acc += witness;
            vesting_acc += vesting;
            content_acc += content;

            // The node advances supply by the post-normalization emission.
            supply += content + vesting + witness;
        } else {
            raw_total += new_emission;
            supply += new_emission;
        }
    }

    let total;
    if precise {
        total = worker_acc + witness_acc + vesting_acc + content_acc;
    } else {
        worker_acc = raw_total * percents.worker as f64 / percent_100;
        witness_acc = raw_total * percents.witness as f64 / percent_100;
        vesting_acc = raw_total * percents.vesting as f64 / percent_100;
        content_acc = raw_total - worker_acc - witness_acc - vesting_acc;
        total = raw_total;
    }

    Emission {
        worker: worker_acc,
        witness: witness_acc,
        vesting: vesting_acc,
        content: content_acc,
        top19: top19_acc,
        timeshare: timeshare_acc,
        virtual_supply: supply,
        current_inflation_rate: rate as f64 / percent_100,
        total,
    }
}
