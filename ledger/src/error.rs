use thiserror::Error;
use truth_types::TruthAmount;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient TRUTH balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TruthAmount,
        available: TruthAmount,
    },

    #[error("staked amount underflow for {address}: releasing {releasing}, staked {staked}")]
    StakeUnderflow {
        address: String,
        releasing: TruthAmount,
        staked: TruthAmount,
    },

    #[error("cannot return {returned} from a stake of {stake}")]
    ReturnExceedsStake {
        returned: TruthAmount,
        stake: TruthAmount,
    },

    #[error("storage error: {0}")]
    Storage(#[from] truth_store::StoreError),
}
