use thiserror::Error;
use truth_ledger::LedgerError;
use truth_reputation::RegistryError;
use truth_store::StoreError;
use truth_types::{TruthAmount, TruthError};

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("insufficient TRUTH tokens: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TruthAmount,
        available: TruthAmount,
    },

    #[error("stake {stake} is below the minimum of {minimum}")]
    StakeTooLow {
        stake: TruthAmount,
        minimum: TruthAmount,
    },

    #[error("claim not found: {0}")]
    ClaimNotFound(String),

    #[error("{voter} has already voted on {claim}")]
    AlreadyVoted { voter: String, claim: String },

    #[error("claim {0} is resolved and no longer accepts votes")]
    ClaimAlreadyResolved(String),

    #[error("claim {0} has already been resolved")]
    AlreadyResolved(String),

    #[error("derived claim id {0} is already taken")]
    ClaimIdTaken(String),

    #[error("invalid input: {0}")]
    Invalid(#[from] TruthError),

    #[error("validator registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl VerificationError {
    /// Whether the caller can correct the request and retry.
    ///
    /// Everything else is an integration or storage fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::StakeTooLow { .. }
                | Self::ClaimNotFound(_)
                | Self::AlreadyVoted { .. }
                | Self::ClaimAlreadyResolved(_)
                | Self::Invalid(_)
        )
    }
}

impl From<LedgerError> for VerificationError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            LedgerError::Storage(err) => Self::Storage(err),
            other => Self::Ledger(other),
        }
    }
}
