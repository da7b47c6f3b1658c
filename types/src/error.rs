//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the TRUTH engine's value types.
#[derive(Debug, Error)]
pub enum TruthError {
    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid TRUTH amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid tier: {0:?}")]
    InvalidTier(String),

    #[error("invalid decision: {0:?} (expected verify or dispute)")]
    InvalidDecision(String),

    #[error("invalid tokenomics: {0}")]
    InvalidTokenomics(String),
}
