//! The ledger service: reads plus single-step committed writes.

use std::sync::Arc;

use truth_store::{AccountBalance, SupplyState, TruthStore};
use truth_types::{
    ClaimId, Counterparty, Timestamp, Tokenomics, TransactionKind, TransactionRecord, TruthAmount,
    WalletAddress,
};

use crate::audit::SupplyAudit;
use crate::batch::LedgerBatch;
use crate::error::LedgerError;

/// Balances, supply and the transaction log over a [`TruthStore`].
pub struct Ledger<S> {
    store: Arc<S>,
    starting_balance: TruthAmount,
    treasury_pool: TruthAmount,
}

impl<S: TruthStore> Ledger<S> {
    pub fn new(store: Arc<S>, tokenomics: &Tokenomics) -> Self {
        Self {
            store,
            starting_balance: tokenomics.starting_balance,
            treasury_pool: tokenomics.treasury_pool,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Balance handed to a lazily created account.
    pub fn starting_balance(&self) -> TruthAmount {
        self.starting_balance
    }

    /// Start staging a set of mutations.
    pub fn begin(&self, now: Timestamp) -> Result<LedgerBatch<'_, S>, LedgerError> {
        let supply = self.supply()?;
        let next_sequence = self.store.transaction_count()? + 1;
        Ok(LedgerBatch::new(self, now, supply, next_sequence))
    }

    /// The account for `address`, created with the starting balance on first
    /// reference. Creation is persisted immediately.
    pub fn get_balance(
        &self,
        address: &WalletAddress,
        now: Timestamp,
    ) -> Result<AccountBalance, LedgerError> {
        if let Some(account) = self.store.get_account(address)? {
            return Ok(account);
        }
        let mut batch = self.begin(now)?;
        let account = batch.account(address)?.clone();
        batch.commit()?;
        Ok(account)
    }

    /// The stored account, without creating it.
    pub fn peek_balance(&self, address: &WalletAddress) -> Result<Option<AccountBalance>, LedgerError> {
        Ok(self.store.get_account(address)?)
    }

    /// Move `amount` out of `from`'s spendable balance in one committed step.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] and changes nothing when
    /// `from` cannot cover the amount.
    pub fn transfer(
        &self,
        from: &WalletAddress,
        to: Counterparty,
        amount: TruthAmount,
        kind: TransactionKind,
        claim_id: Option<&ClaimId>,
        now: Timestamp,
    ) -> Result<TransactionRecord, LedgerError> {
        let mut batch = self.begin(now)?;
        let record = batch.transfer(from, to, amount, kind, claim_id)?;
        batch.commit()?;
        Ok(record)
    }

    /// The full log, or only records involving `address`.
    pub fn transaction_history(
        &self,
        address: Option<&WalletAddress>,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let records = match address {
            Some(address) => self.store.account_transactions(address)?,
            None => self.store.iter_transactions()?,
        };
        Ok(records)
    }

    /// Current supply state (genesis state before the first commit).
    ///
    /// Once a supply record exists it is authoritative; the configured pool
    /// only seeds a fresh store.
    pub fn supply(&self) -> Result<SupplyState, LedgerError> {
        Ok(self
            .store
            .get_supply()?
            .unwrap_or_else(|| SupplyState::genesis(self.treasury_pool)))
    }

    /// Sum every holding and compare against what was issued.
    pub fn audit(&self) -> Result<SupplyAudit, LedgerError> {
        let accounts = self.store.iter_accounts()?;
        let supply = self.supply()?;
        Ok(SupplyAudit {
            accounts: accounts.len() as u64,
            account_holdings: accounts.iter().map(AccountBalance::holdings).sum(),
            treasury: supply.treasury,
            burned: supply.burned,
            issued: supply.issued,
            genesis_treasury: supply.genesis_treasury,
            minted: supply.minted,
        })
    }
}
