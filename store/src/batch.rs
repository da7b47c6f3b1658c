//! Atomic multi-store writes.

use crate::{
    AccountBalance, AccountStore, ClaimRecord, ClaimStore, StoreError, SupplyState, SupplyStore,
    TransactionLog,
};
use truth_types::{ClaimId, TransactionRecord};

/// A set of writes applied all-or-nothing by [`TruthStore::commit_batch`].
#[derive(Clone, Debug, Default)]
pub struct StoreBatch {
    pub accounts: Vec<AccountBalance>,
    pub claims: Vec<ClaimRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub supply: Option<SupplyState>,
    /// When set, the commit fails with [`StoreError::Conflict`] if this claim
    /// is already resolved in the store.
    pub resolves: Option<ClaimId>,
}

impl StoreBatch {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.claims.is_empty()
            && self.transactions.is_empty()
            && self.supply.is_none()
    }
}

/// Every store the engine needs, plus an atomic commit across them.
pub trait TruthStore:
    AccountStore + ClaimStore + TransactionLog + SupplyStore + Send + Sync
{
    /// Apply every write in `batch` atomically: either all become visible or none do.
    ///
    /// Implementations must reject transactions whose sequence already exists
    /// ([`StoreError::Duplicate`]) and honour [`StoreBatch::resolves`].
    fn commit_batch(&self, batch: StoreBatch) -> Result<(), StoreError>;
}
