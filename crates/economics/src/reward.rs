//! Post payout estimation from the chain reward curve.

use crate::errors::EconomicsError;
use crate::params::{ChainParams, PERCENT_100};
use graphene_types::{Amount, ChainGlobalProps};

/// Reward curve selectable per chain era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Linear,
    Quadratic,
}

/// Split of an author's pending payout across the three payout assets.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorPayout {
    /// Power (vested native) portion, in native-asset units.
    pub power: f64,
    /// Debt-asset portion, in debt-asset units.
    pub debt: f64,
    /// Liquid native portion, in native-asset units.
    pub liquid: f64,
}

/// Apply the reward curve to raw rshares.
///
/// The quadratic branch reproduces the node's
/// `(rshares + s) * (rshares + s) - s * s` in 128-bit integer arithmetic;
/// squaring an `i64` plus the content constant stays well inside `i128`, so
/// the result is bit-exact with the reference before the final float
/// conversion.
fn curve_vshares(net_rshares: i64, curve: CurveKind, params: &ChainParams) -> u128 {
    match curve {
        CurveKind::Linear => net_rshares.max(0) as u128,
        CurveKind::Quadratic => {
            let s = params.content_constant as i128;
            let r = net_rshares as i128 + s;
            (r * r - s * s).max(0) as u128
        }
    }
}

/// Predict the payout (in native asset) a post with `net_rshares` would
/// settle at, given the current reward fund snapshot.
pub fn calc_payout(
    net_rshares: i64,
    curve: CurveKind,
    props: &ChainGlobalProps,
    params: &ChainParams,
) -> Result<f64, EconomicsError> {
    if props.total_reward_shares2 == 0 {
        return Err(EconomicsError::Computation(
            "total_reward_shares2 is zero in global properties",
        ));
    }

    let vshares = curve_vshares(net_rshares, curve, params);
    let payout =
        vshares as f64 * props.total_reward_fund_steem.amount / props.total_reward_shares2 as f64;
    tracing::debug!(net_rshares, ?curve, payout, "calculated post payout");
    Ok(payout)
}

/// Estimate how an author's pending payout settles across Power, debt asset
/// and liquid native asset.
///
/// `pending_payout` must be denominated in the debt asset; `median_price` is
/// the current debt/native conversion price. Curators take a fixed 25%, the
/// author half splits 50/50 into Power and liquid value, and the liquid half
/// prints debt asset only up to the chain's current print rate.
pub fn estimate_author_payout(
    pending_payout: &Amount,
    props: &ChainGlobalProps,
    median_price: f64,
    params: &ChainParams,
) -> Result<AuthorPayout, EconomicsError> {
    if !pending_payout.is_asset(&params.debt_symbol) {
        return Err(EconomicsError::InvalidAsset {
            expected: params.debt_symbol.clone(),
            got: pending_payout.symbol.clone(),
        });
    }
    if median_price <= 0.0 {
        return Err(EconomicsError::Computation("median price is zero"));
    }

    let author_reward = pending_payout.amount * 0.75;
    let half = author_reward / 2.0;

    let power = half / median_price;
    let debt = half * props.sbd_print_rate as f64 / PERCENT_100 as f64;
    let liquid = (half - debt) / median_price;

    Ok(AuthorPayout {
        power,
        debt,
        liquid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use graphene_types::Amount;

    fn props(reward_fund: f64, reward_shares2: u128, print_rate: u16) -> ChainGlobalProps {
        ChainGlobalProps {
            head_block_number: 1,
            time: Utc::now(),
            virtual_supply: Amount::new(250_000_000.0, "GOLOS"),
            current_supply: Amount::new(210_000_000.0, "GOLOS"),
            current_sbd_supply: Amount::new(2_000_000.0, "GBG"),
            sbd_print_rate: print_rate,
            total_vesting_shares: Amount::new(1.5e11, "GESTS"),
            total_reward_fund_steem: Amount::new(reward_fund, "GOLOS"),
            total_reward_shares2: reward_shares2,
            max_virtual_bandwidth: 5_986_734_968_066_277_376,
        }
    }

    #[test]
    fn zero_rshares_pay_zero_on_both_curves() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 10u128.pow(25), 10_000);
        for curve in [CurveKind::Linear, CurveKind::Quadratic] {
            assert_eq!(calc_payout(0, curve, &props, &params).unwrap(), 0.0);
        }
    }

    #[test]
    fn linear_payout_is_monotonic() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 10u128.pow(25), 10_000);
        let mut last = -1.0;
        for rshares in [0i64, 1, 1_000, 10_000_000_000, 5_000_000_000_000] {
            let payout = calc_payout(rshares, CurveKind::Linear, &props, &params).unwrap();
            assert!(payout >= last);
            last = payout;
        }
    }

    #[test]
    fn quadratic_grows_superlinearly() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 10u128.pow(30), 10_000);
        let r = 1_000_000_000_000i64;
        let q1 = calc_payout(r, CurveKind::Quadratic, &props, &params).unwrap();
        let q2 = calc_payout(2 * r, CurveKind::Quadratic, &props, &params).unwrap();
        // doubling rshares more than doubles the quadratic payout
        assert!(q2 > 2.0 * q1);
    }

    #[test]
    fn quadratic_matches_reference_formula() {
        let params = ChainParams::golos();
        let props = props(1.0, 1, 10_000);
        let r = 3i64;
        let s = params.content_constant as i128;
        let expected = ((r as i128 + s) * (r as i128 + s) - s * s) as f64;
        let payout = calc_payout(r, CurveKind::Quadratic, &props, &params).unwrap();
        assert_eq!(payout, expected);
    }

    #[test]
    fn zero_reward_shares_denominator_is_an_error() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 0, 10_000);
        let err = calc_payout(1, CurveKind::Linear, &props, &params).unwrap_err();
        assert!(matches!(err, EconomicsError::Computation(_)));
    }

    #[test]
    fn author_payout_rejects_native_denomination() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 1, 10_000);
        let pending = Amount::new(10.0, "GOLOS");
        let err = estimate_author_payout(&pending, &props, 0.04, &params).unwrap_err();
        assert_eq!(
            err,
            EconomicsError::InvalidAsset {
                expected: "GBG".to_string(),
                got: "GOLOS".to_string(),
            }
        );
    }

    #[test]
    fn author_payout_full_print_rate_prints_no_liquid() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 1, 10_000);
        let pending = Amount::new(100.0, "GBG");
        let split = estimate_author_payout(&pending, &props, 0.05, &params).unwrap();
        // 75 GBG author reward, halves of 37.5
        assert!((split.debt - 37.5).abs() < 1e-9);
        assert!(split.liquid.abs() < 1e-9);
        assert!((split.power - 37.5 / 0.05).abs() < 1e-9);
    }

    #[test]
    fn author_payout_half_print_rate_splits_liquid() {
        let params = ChainParams::golos();
        let props = props(50_000.0, 1, 5_000);
        let pending = Amount::new(100.0, "GBG");
        let split = estimate_author_payout(&pending, &props, 0.05, &params).unwrap();
        assert!((split.debt - 18.75).abs() < 1e-9);
        assert!((split.liquid - 18.75 / 0.05).abs() < 1e-9);
    }
}
