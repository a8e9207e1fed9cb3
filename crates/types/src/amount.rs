//! Asset-tagged quantities in the chain's `"1.000 SYM"` wire format.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed amount string: {0:?}")]
    Malformed(String),
    #[error("unparseable amount value: {0:?}")]
    BadValue(String),
}

/// A quantity of some chain asset, e.g. `12.345 GOLOS`.
///
/// The node serializes amounts as a single string with a fixed-precision
/// decimal and the asset symbol. Arithmetic on the numeric part is done in
/// `f64`, which matches the precision the operator tooling needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    pub amount: f64,
    pub symbol: String,
}

impl Amount {
    pub fn new(amount: f64, symbol: impl Into<String>) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
        }
    }

    /// Whether this amount is denominated in `symbol`.
    pub fn is_asset(&self, symbol: &str) -> bool {
        self.symbol == symbol
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split_whitespace();
        let raw = parts
            .next()
            .ok_or_else(|| AmountError::Malformed(value.to_string()))?;
        let symbol = parts
            .next()
            .ok_or_else(|| AmountError::Malformed(value.to_string()))?;
        if parts.next().is_some() {
            return Err(AmountError::Malformed(value.to_string()));
        }
        let amount = raw
            .parse::<f64>()
            .map_err(|_| AmountError::BadValue(raw.to_string()))?;
        Ok(Self {
            amount,
            symbol: symbol.to_string(),
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Golos assets all use 3-digit precision on the wire.
        write!(f, "{:.3} {}", self.amount, self.symbol)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Deserialize an integer that the node may send either as a JSON number or
/// as a decimal string (`total_reward_shares2`, `max_virtual_bandwidth`).
pub fn u128_from_string_or_number<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u128),
        String(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::String(value) => value.parse::<u128>().map_err(de::Error::custom),
    }
}
