//! Debt-asset (pegged asset) analytics.
//!
//! The chain caps system debt at 10% of market capitalisation by flooring
//! the conversion price at `9 * debt_supply / current_supply`
//! (libraries/chain/database.cpp). These helpers reproduce that cap and
//! model what full conversion of the debt supply would do to the native
//! supply.

use crate::params::PERCENT_100;
use graphene_types::ChainGlobalProps;
use serde::{Deserialize, Serialize};

/// Minimal possible median price the chain will use for conversions.
pub fn min_median_price(props: &ChainGlobalProps) -> f64 {
    9.0 * props.current_sbd_supply.amount / props.current_supply.amount
}

/// System debt as a percentage of virtual supply, valued at `price`
/// (debt units per native unit).
pub fn debt_percent(props: &ChainGlobalProps, price: f64) -> f64 {
    props.current_sbd_supply.amount / price * 100.0 / props.virtual_supply.amount
}

/// Approximate daily debt-asset emission through content rewards: half the
/// reward fund pays out weekly in debt asset, scaled by the print rate.
pub fn daily_debt_emission(props: &ChainGlobalProps, median_price: f64) -> f64 {
    let print_fraction = props.sbd_print_rate as f64 / PERCENT_100 as f64;
    let weekly = props.total_reward_fund_steem.amount / 2.0 * median_price * print_fraction;
    weekly / 7.0
}

/// Outcome of gradually converting the whole debt supply in fixed steps,
/// with the price floor tracking the shrinking debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionProjection {
    /// Native asset printed by converting everything.
    pub new_native_supply: f64,
    /// Debt supply remaining when system debt first drops under 20%.
    pub debt_at_20_percent: Option<f64>,
    /// Native printed by the time debt drops under 20%.
    pub native_at_20_percent: Option<f64>,
}

/// Model stepwise conversion of the full debt supply at `feed_price`,
/// re-flooring the conversion price after every step.
pub fn project_gradual_conversion(
    props: &ChainGlobalProps,
    feed_price: f64,
    step: f64,
) -> ConversionProjection {
    let mut debt = props.current_sbd_supply.amount;
    let mut native = props.current_supply.amount;
    let mut price = min_median_price(props);
    let mut debt_at_20 = None;
    let mut native_at_20 = None;

    while debt > step {
        debt -= step;
        native += step / price;
        price = (9.0 * debt / native).max(feed_price);
        let virtual_supply = native + debt / price;
        let percent = debt / feed_price * 100.0 / virtual_supply;
        if percent < 20.0 && debt_at_20.is_none() {
            debt_at_20 = Some(debt);
            native_at_20 = Some(native - props.current_supply.amount);
        }
    }

    ConversionProjection {
        new_native_supply: native - props.current_supply.amount,
        debt_at_20_percent: debt_at_20,
        native_at_20_percent: native_at_20,
    }
}
