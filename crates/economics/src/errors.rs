use thiserror::Error;

/// Errors that can occur while reproducing consensus economics client-side.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconomicsError {
    #[error("expected amount denominated in {expected}, got {got}")]
    InvalidAsset { expected: String, got: String },

    #[error("inconsistent chain snapshot: {0}")]
    Computation(&'static str),

    #[error("unsupported bandwidth kind: {0}")]
    UnsupportedBandwidthKind(String),
}
