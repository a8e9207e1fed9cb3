//! Account bandwidth usage against the chain's decaying-average model.

use crate::errors::EconomicsError;
use crate::params::ChainParams;
use chrono::{DateTime, Utc};
use graphene_types::{AccountInfo, ChainGlobalProps};

/// Bandwidth pools tracked by the chain. Market operations (transfers,
/// orders) are charged against a separate pool at a 10x multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandwidthKind {
    Market,
    Forum,
    /// Custom-operation bandwidth; the chain tracks it but this model does
    /// not reproduce it.
    Custom,
}

impl BandwidthKind {
    fn kb_divisor(self) -> f64 {
        match self {
            BandwidthKind::Market => 10.0,
            _ => 1.0,
        }
    }
}

/// Inputs to the bandwidth estimate, all taken from one account object and
/// one global-properties snapshot.
#[derive(Debug, Clone)]
pub struct BandwidthSnapshot {
    pub vesting_shares: f64,
    pub delegated_vesting_shares: f64,
    pub received_vesting_shares: f64,
    pub average_bandwidth: f64,
    pub last_update_time: DateTime<Utc>,
    pub max_virtual_bandwidth: f64,
    pub total_vesting_shares: f64,
}

impl BandwidthSnapshot {
    /// Assemble a snapshot from RPC objects, selecting the bandwidth pool
    /// matching `kind`.
    pub fn from_account(
        account: &AccountInfo,
        props: &ChainGlobalProps,
        kind: BandwidthKind,
    ) -> Result<Self, EconomicsError> {
        let (average_bandwidth, last_update_time) = match kind {
            BandwidthKind::Market => (
                account.average_market_bandwidth as f64,
                account.last_market_bandwidth_update,
            ),
            BandwidthKind::Forum => {
                (account.average_bandwidth as f64, account.last_bandwidth_update)
            }
            BandwidthKind::Custom => {
                return Err(EconomicsError::UnsupportedBandwidthKind(
                    "custom".to_string(),
                ))
            }
        };

        Ok(Self {
            vesting_shares: account.vesting_shares.amount,
            delegated_vesting_shares: account.delegated_vesting_shares.amount,
            received_vesting_shares: account.received_vesting_shares.amount,
            average_bandwidth,
            last_update_time,
            max_virtual_bandwidth: props.max_virtual_bandwidth as f64,
            total_vesting_shares: props.total_vesting_shares.amount,
        })
    }
}

/// Derived bandwidth usage figures.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthUsage {
    pub used_kb: f64,
    pub avail_kb: f64,
    pub ratio: f64,
}

impl BandwidthUsage {
    pub fn has_bandwidth(&self) -> bool {
        self.ratio < 1.0
    }
}

/// Estimate current bandwidth usage for an account snapshot.
///
/// Regeneration follows the node: after a full window without activity the
/// average resets to zero, otherwise it decays linearly within the window.
/// The comparison the chain makes is
/// `account_vshares * max_virtual_bandwidth > average_bandwidth * total_vshares`.
pub fn estimate(
    snapshot: &BandwidthSnapshot,
    kind: BandwidthKind,
    now: DateTime<Utc>,
    params: &ChainParams,
) -> Result<BandwidthUsage, EconomicsError> {
    if matches!(kind, BandwidthKind::Custom) {
        return Err(EconomicsError::UnsupportedBandwidthKind(
            "custom".to_string(),
        ));
    }

    let vshares = snapshot.vesting_shares - snapshot.delegated_vesting_shares
        + snapshot.received_vesting_shares;

    let window = params.bandwidth_average_window_seconds as f64;
    let elapsed = (now - snapshot.last_update_time).num_seconds() as f64;
    let average_bandwidth = if elapsed > window {
        0.0
    } else {
        snapshot.average_bandwidth * (window - elapsed) / window
    };

    let avail = vshares * snapshot.max_virtual_bandwidth;
    let used = average_bandwidth * snapshot.total_vesting_shares;
    if avail == 0.0 {
        return Err(EconomicsError::Computation(
            "account has no effective vesting shares",
        ));
    }
    let ratio = used / avail;

    let precision = params.bandwidth_precision as f64;
    let divisor = kind.kb_divisor();
    let used_kb = average_bandwidth / precision / 1024.0 / divisor;
    let avail_kb = vshares / snapshot.total_vesting_shares * snapshot.max_virtual_bandwidth
        / precision
        / 1024.0
        / divisor;

    tracing::debug!(used_kb, avail_kb, ratio, "estimated account bandwidth");
    Ok(BandwidthUsage {
        used_kb,
        avail_kb,
        ratio,
    })
}
