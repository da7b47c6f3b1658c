//! Atomic batch commit. Every write in a [`StoreBatch`] goes through one LMDB
//! write transaction; any error aborts it, so nothing partial is ever visible.
//! LMDB admits one writer at a time, so the claim fence and the supply
//! version check see every earlier commit, including other processes'.

use truth_store::{StoreBatch, StoreError, TruthStore};

use crate::environment::LmdbStore;
use crate::LmdbError;

impl TruthStore for LmdbStore {
    fn commit_batch(&self, batch: StoreBatch) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if let Some(id) = &batch.resolves {
            if self.claim_is_resolved(&wtxn, id)? {
                return Err(StoreError::Conflict(format!("claim {id} is already resolved")));
            }
        }

        if let Some(supply) = &batch.supply {
            let stored = self.read_supply(&wtxn)?;
            supply.check_successor(stored.as_ref())?;
        }

        for record in &batch.transactions {
            self.append_in(&mut wtxn, record)?;
        }
        for account in &batch.accounts {
            self.write_account(&mut wtxn, account)?;
        }
        for record in &batch.claims {
            self.write_claim(&mut wtxn, record)?;
        }
        if let Some(supply) = &batch.supply {
            self.write_supply(&mut wtxn, supply)?;
        }

        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(
            accounts = batch.accounts.len(),
            claims = batch.claims.len(),
            transactions = batch.transactions.len(),
            "batch committed"
        );
        Ok(())
    }
}
