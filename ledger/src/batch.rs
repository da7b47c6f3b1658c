//! Staged ledger mutations, committed atomically.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use truth_store::{AccountBalance, ClaimRecord, StoreBatch, SupplyState, TruthStore};
use truth_types::{
    ClaimId, Counterparty, Timestamp, TransactionKind, TransactionRecord, TruthAmount,
    WalletAddress,
};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// A unit of work against the ledger.
///
/// Accounts are loaded (or lazily created) on first touch and mutated in
/// memory. Nothing reaches the store until [`LedgerBatch::commit`]; dropping
/// the batch discards every staged change.
pub struct LedgerBatch<'a, S> {
    ledger: &'a Ledger<S>,
    now: Timestamp,
    accounts: BTreeMap<WalletAddress, AccountBalance>,
    claims: Vec<ClaimRecord>,
    transactions: Vec<TransactionRecord>,
    supply: SupplyState,
    next_sequence: u64,
    resolves: Option<ClaimId>,
}

impl<'a, S: TruthStore> LedgerBatch<'a, S> {
    pub(crate) fn new(
        ledger: &'a Ledger<S>,
        now: Timestamp,
        supply: SupplyState,
        next_sequence: u64,
    ) -> Self {
        Self {
            ledger,
            now,
            accounts: BTreeMap::new(),
            claims: Vec::new(),
            transactions: Vec::new(),
            supply,
            next_sequence,
            resolves: None,
        }
    }

    /// The timestamp every record in this batch carries.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Supply state including staged changes.
    pub fn supply(&self) -> SupplyState {
        self.supply
    }

    /// Mutable access to an account, loading or creating it on first touch.
    pub fn account(&mut self, address: &WalletAddress) -> Result<&mut AccountBalance, LedgerError> {
        match self.accounts.entry(address.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let account = match self.ledger.store().get_account(address)? {
                    Some(account) => account,
                    None => {
                        let starting = self.ledger.starting_balance();
                        self.supply.issued = self.supply.issued + starting;
                        tracing::debug!(%address, "creating account");
                        AccountBalance::new(address.clone(), starting)
                    }
                };
                Ok(entry.insert(account))
            }
        }
    }

    /// Guarded movement out of `from`'s spendable balance.
    ///
    /// - `Account(to)` credits that account's spendable balance.
    /// - `Treasury` credits the treasury pool.
    /// - `Burn` destroys the amount.
    /// - `Staked` locks the amount in `from`'s own staked balance.
    ///
    /// Appends one record. Fails with [`LedgerError::InsufficientBalance`]
    /// without mutating anything when `from` cannot cover `amount`.
    pub fn transfer(
        &mut self,
        from: &WalletAddress,
        to: Counterparty,
        amount: TruthAmount,
        kind: TransactionKind,
        claim_id: Option<&ClaimId>,
    ) -> Result<TransactionRecord, LedgerError> {
        let available = self.account(from)?.spendable;
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if let Counterparty::Account(dest) = &to {
            self.account(dest)?;
        }

        let source = self.account(from)?;
        source.spendable = source.spendable - amount;
        match &to {
            Counterparty::Account(dest) => {
                let dest = self.account(dest)?;
                dest.spendable = dest.spendable + amount;
            }
            Counterparty::Treasury => self.supply.treasury = self.supply.treasury + amount,
            Counterparty::Burn => self.supply.burned = self.supply.burned + amount,
            Counterparty::Staked => {
                let source = self.account(from)?;
                source.staked = source.staked + amount;
            }
        }
        Ok(self.record(kind, amount, Counterparty::Account(from.clone()), to, claim_id))
    }

    /// Lock `amount` of `voter`'s spendable balance behind a vote.
    pub fn stake(
        &mut self,
        voter: &WalletAddress,
        amount: TruthAmount,
        claim_id: &ClaimId,
    ) -> Result<TransactionRecord, LedgerError> {
        self.transfer(voter, Counterparty::Staked, amount, TransactionKind::VoteStake, Some(claim_id))
    }

    /// Unlock a vote's `stake`, returning `returned` of it to spendable.
    /// The remainder is destroyed.
    pub fn release_stake(
        &mut self,
        address: &WalletAddress,
        stake: TruthAmount,
        returned: TruthAmount,
    ) -> Result<(), LedgerError> {
        if returned > stake {
            return Err(LedgerError::ReturnExceedsStake { returned, stake });
        }
        let account = self.account(address)?;
        account.staked = account
            .staked
            .checked_sub(stake)
            .ok_or_else(|| LedgerError::StakeUnderflow {
                address: address.to_string(),
                releasing: stake,
                staked: account.staked,
            })?;
        account.spendable = account.spendable + returned;
        self.supply.burned = self.supply.burned + (stake - returned);
        Ok(())
    }

    /// Pay `amount` into `address`'s spendable balance, counting it as earned.
    ///
    /// The treasury pool covers as much as it holds; any shortfall is minted
    /// and tracked in [`SupplyState::minted`]. Returns the minted part.
    pub fn pay_from_treasury(
        &mut self,
        address: &WalletAddress,
        amount: TruthAmount,
    ) -> Result<TruthAmount, LedgerError> {
        let from_pool = amount.min(self.supply.treasury);
        let minted = amount - from_pool;
        let account = self.account(address)?;
        account.spendable = account.spendable + amount;
        account.rewards_earned = account.rewards_earned + amount;
        self.supply.treasury = self.supply.treasury - from_pool;
        self.supply.minted = self.supply.minted + minted;
        if !minted.is_zero() {
            tracing::warn!(%address, %amount, %minted, "treasury short, minting the difference");
        }
        Ok(minted)
    }

    /// Destroy up to `amount` of `address`'s spendable balance, never taking
    /// it below zero. Returns the amount actually charged.
    pub fn charge_to_burn(
        &mut self,
        address: &WalletAddress,
        amount: TruthAmount,
    ) -> Result<TruthAmount, LedgerError> {
        let account = self.account(address)?;
        let charged = amount.min(account.spendable);
        account.spendable = account.spendable - charged;
        self.supply.burned = self.supply.burned + charged;
        Ok(charged)
    }

    /// Append a record without moving any balance.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        amount: TruthAmount,
        from: Counterparty,
        to: Counterparty,
        claim_id: Option<&ClaimId>,
    ) -> TransactionRecord {
        let record = TransactionRecord::new(
            self.next_sequence,
            kind,
            amount,
            from,
            to,
            claim_id.cloned(),
            self.now,
        );
        self.next_sequence += 1;
        self.transactions.push(record.clone());
        record
    }

    /// Stage a new or updated claim record.
    pub fn put_claim(&mut self, record: ClaimRecord) {
        match self.claims.iter_mut().find(|c| c.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.claims.push(record),
        }
    }

    /// Whether `claim_id` is staged in this batch or already stored.
    pub fn claim_exists(&self, claim_id: &ClaimId) -> Result<bool, LedgerError> {
        if self.claims.iter().any(|c| c.id() == claim_id) {
            return Ok(true);
        }
        Ok(self.ledger.store().get_claim(claim_id)?.is_some())
    }

    /// Fence the commit on `claim_id` still being unresolved in the store.
    pub fn fence_resolution(&mut self, claim_id: &ClaimId) {
        self.resolves = Some(claim_id.clone());
    }

    /// Write every staged change in one atomic store commit.
    ///
    /// The supply record is written as the successor of the version this
    /// batch began from, so a concurrent writer's commit makes this one fail
    /// with `StoreError::Stale` instead of overwriting it.
    ///
    /// Returns the records appended by this batch.
    pub fn commit(mut self) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.supply.version += 1;
        tracing::debug!(
            accounts = self.accounts.len(),
            claims = self.claims.len(),
            transactions = self.transactions.len(),
            "committing ledger batch"
        );
        let batch = StoreBatch {
            accounts: self.accounts.into_values().collect(),
            claims: self.claims,
            transactions: self.transactions.clone(),
            supply: Some(self.supply),
            resolves: self.resolves,
        };
        self.ledger.store().commit_batch(batch)?;
        Ok(self.transactions)
    }
}
