//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use truth_store::{
    AccountBalance, AccountStore, ClaimRecord, ClaimStore, StoreBatch, StoreError, SupplyState,
    SupplyStore, TransactionLog, TruthStore,
};
use truth_types::{ClaimId, TransactionRecord, WalletAddress};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<WalletAddress, AccountBalance>,
    claims: HashMap<ClaimId, ClaimRecord>,
    /// Claim ids in insertion order.
    claim_order: Vec<ClaimId>,
    transactions: Vec<TransactionRecord>,
    supply: Option<SupplyState>,
}

impl MemoryState {
    fn put_claim(&mut self, record: ClaimRecord) {
        let id = record.id().clone();
        if self.claims.insert(id.clone(), record).is_none() {
            self.claim_order.push(id);
        }
    }

    fn append(&mut self, record: TransactionRecord) -> Result<(), StoreError> {
        let expected = self.transactions.len() as u64 + 1;
        if record.sequence != expected {
            return Err(StoreError::Duplicate(format!(
                "transaction sequence {} (next free is {expected})",
                record.sequence
            )));
        }
        self.transactions.push(record);
        Ok(())
    }
}

/// An in-memory implementation of every store trait.
///
/// One mutex guards all state, so [`TruthStore::commit_batch`] is atomic.
/// Thread-safe for use behind a shared engine.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<MemoryState>,
    fail_commits: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `commit_batch` fail with a backend error
    /// (without applying anything) until switched off again.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

impl AccountStore for NullStore {
    fn get_account(&self, address: &WalletAddress) -> Result<Option<AccountBalance>, StoreError> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    fn put_account(&self, account: &AccountBalance) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.address.clone(), account.clone());
        Ok(())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().unwrap().accounts.len() as u64)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountBalance>, StoreError> {
        let mut accounts: Vec<_> = self.state.lock().unwrap().accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(accounts)
    }
}

impl ClaimStore for NullStore {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, StoreError> {
        Ok(self.state.lock().unwrap().claims.get(id).cloned())
    }

    fn put_claim(&self, record: &ClaimRecord) -> Result<(), StoreError> {
        self.state.lock().unwrap().put_claim(record.clone());
        Ok(())
    }

    fn claim_count(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().unwrap().claims.len() as u64)
    }

    fn iter_claims(&self) -> Result<Vec<ClaimRecord>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .claim_order
            .iter()
            .filter_map(|id| state.claims.get(id).cloned())
            .collect())
    }
}

impl TransactionLog for NullStore {
    fn append_transaction(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        self.state.lock().unwrap().append(record.clone())
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().unwrap().transactions.len() as u64)
    }

    fn iter_transactions(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.state.lock().unwrap().transactions.clone())
    }
}

impl SupplyStore for NullStore {
    fn get_supply(&self) -> Result<Option<SupplyState>, StoreError> {
        Ok(self.state.lock().unwrap().supply)
    }

    fn put_supply(&self, supply: &SupplyState) -> Result<(), StoreError> {
        self.state.lock().unwrap().supply = Some(*supply);
        Ok(())
    }
}

impl TruthStore for NullStore {
    fn commit_batch(&self, batch: StoreBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".into()));
        }
        let mut state = self.state.lock().unwrap();

        // Validate everything before touching state.
        if let Some(id) = &batch.resolves {
            if state.claims.get(id).is_some_and(ClaimRecord::is_resolved) {
                return Err(StoreError::Conflict(format!("claim {id} is already resolved")));
            }
        }
        if let Some(supply) = &batch.supply {
            supply.check_successor(state.supply.as_ref())?;
        }
        let next = state.transactions.len() as u64 + 1;
        for (offset, tx) in batch.transactions.iter().enumerate() {
            if tx.sequence != next + offset as u64 {
                return Err(StoreError::Duplicate(format!(
                    "transaction sequence {}",
                    tx.sequence
                )));
            }
        }

        for account in batch.accounts {
            state.accounts.insert(account.address.clone(), account);
        }
        for record in batch.claims {
            state.put_claim(record);
        }
        state.transactions.extend(batch.transactions);
        if let Some(supply) = batch.supply {
            state.supply = Some(supply);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truth_types::{Counterparty, Timestamp, TransactionKind, TruthAmount};

    fn tx(sequence: u64) -> TransactionRecord {
        TransactionRecord::new(
            sequence,
            TransactionKind::Burn,
            TruthAmount::from_truth(1),
            Counterparty::Treasury,
            Counterparty::Burn,
            None,
            Timestamp::new(1),
        )
    }

    fn supply(version: u64) -> SupplyState {
        SupplyState {
            version,
            ..SupplyState::genesis(TruthAmount::from_truth(5))
        }
    }

    #[test]
    fn commit_applies_everything() {
        let store = NullStore::new();
        let account = AccountBalance::new(WalletAddress::new("addr1a"), TruthAmount::from_truth(1_000));
        let batch = StoreBatch {
            accounts: vec![account.clone()],
            transactions: vec![tx(1), tx(2)],
            supply: Some(supply(1)),
            ..StoreBatch::default()
        };
        store.commit_batch(batch).unwrap();

        assert_eq!(store.get_account(&account.address).unwrap(), Some(account));
        assert_eq!(store.transaction_count().unwrap(), 2);
        assert!(store.get_supply().unwrap().is_some());
    }

    #[test]
    fn stale_supply_rejects_whole_batch() {
        let store = NullStore::new();
        store
            .commit_batch(StoreBatch {
                supply: Some(supply(1)),
                ..StoreBatch::default()
            })
            .unwrap();

        // Another writer also started from version 0.
        let account = AccountBalance::new(WalletAddress::new("addr1late"), TruthAmount::ZERO);
        let stale = StoreBatch {
            accounts: vec![account.clone()],
            supply: Some(supply(1)),
            ..StoreBatch::default()
        };
        assert!(matches!(store.commit_batch(stale), Err(StoreError::Stale(_))));
        assert_eq!(store.get_account(&account.address).unwrap(), None);
        assert_eq!(store.get_supply().unwrap().unwrap().version, 1);
    }

    #[test]
    fn sequence_gap_rejects_whole_batch() {
        let store = NullStore::new();
        let account = AccountBalance::new(WalletAddress::new("addr1a"), TruthAmount::ZERO);
        let batch = StoreBatch {
            accounts: vec![account.clone()],
            transactions: vec![tx(1), tx(3)],
            ..StoreBatch::default()
        };
        assert!(matches!(store.commit_batch(batch), Err(StoreError::Duplicate(_))));
        assert_eq!(store.get_account(&account.address).unwrap(), None);
        assert_eq!(store.transaction_count().unwrap(), 0);
    }

    #[test]
    fn injected_failure_applies_nothing() {
        let store = NullStore::new();
        store.fail_commits(true);
        let batch = StoreBatch {
            transactions: vec![tx(1)],
            ..StoreBatch::default()
        };
        assert!(store.commit_batch(batch).is_err());
        assert_eq!(store.transaction_count().unwrap(), 0);
    }
}
