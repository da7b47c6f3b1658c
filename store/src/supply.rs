//! Supply bookkeeping storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use truth_types::TruthAmount;

/// Where every token that is not held by an account currently sits.
///
/// Together with account holdings this makes conservation checkable:
/// `Σ holdings + treasury + burned == issued + genesis_treasury + minted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyState {
    /// Sum of all starting balances handed to lazily created accounts.
    pub issued: TruthAmount,
    /// Current treasury pool.
    pub treasury: TruthAmount,
    /// Tokens destroyed by penalties.
    pub burned: TruthAmount,
    /// Treasury pool the ledger was created with. Fixed at genesis.
    pub genesis_treasury: TruthAmount,
    /// Rewards and bonuses paid beyond what the treasury held.
    pub minted: TruthAmount,
    /// Incremented by every committed write. A batch carrying version `n`
    /// only applies over stored version `n - 1`.
    pub version: u64,
}

impl SupplyState {
    /// Supply state before any activity.
    pub fn genesis(treasury_pool: TruthAmount) -> Self {
        Self {
            issued: TruthAmount::ZERO,
            treasury: treasury_pool,
            burned: TruthAmount::ZERO,
            genesis_treasury: treasury_pool,
            minted: TruthAmount::ZERO,
            version: 0,
        }
    }

    /// Check that `self` directly succeeds `stored` (version 0 when absent).
    pub fn check_successor(&self, stored: Option<&SupplyState>) -> Result<(), StoreError> {
        let current = stored.map_or(0, |s| s.version);
        if self.version != current + 1 {
            return Err(StoreError::Stale(format!(
                "supply version {} written over stored version {current}",
                self.version
            )));
        }
        Ok(())
    }
}


/// Trait for the singleton supply record.
pub trait SupplyStore {
    /// The stored supply state, or `None` before the first commit.
    fn get_supply(&self) -> Result<Option<SupplyState>, StoreError>;
    fn put_supply(&self, supply: &SupplyState) -> Result<(), StoreError>;
}
