//! Account storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use truth_types::{ReputationTier, Timestamp, TruthAmount, WalletAddress};

/// Per-participant balance and reputation record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: WalletAddress,
    /// Spendable TRUTH.
    pub spendable: TruthAmount,
    /// TRUTH locked behind unresolved votes.
    pub staked: TruthAmount,
    /// Lifetime rewards and bonuses received.
    pub rewards_earned: TruthAmount,
    /// `successful_votes / total_votes` in basis points, floored.
    pub accuracy_bps: u32,
    pub total_votes: u64,
    pub successful_votes: u64,
    /// Consecutive votes on the winning side; reset by any losing vote.
    pub consecutive_accurate_votes: u64,
    pub total_submissions: u64,
    pub verified_submissions: u64,
    pub penalty_count: u32,
    pub last_vote_at: Timestamp,
    pub reputation: ReputationTier,
}

impl AccountBalance {
    /// A fresh account holding `starting_balance`.
    pub fn new(address: WalletAddress, starting_balance: TruthAmount) -> Self {
        Self {
            address,
            spendable: starting_balance,
            staked: TruthAmount::ZERO,
            rewards_earned: TruthAmount::ZERO,
            accuracy_bps: 0,
            total_votes: 0,
            successful_votes: 0,
            consecutive_accurate_votes: 0,
            total_submissions: 0,
            verified_submissions: 0,
            penalty_count: 0,
            last_vote_at: Timestamp::EPOCH,
            reputation: ReputationTier::Novice,
        }
    }

    /// Spendable plus staked.
    pub fn holdings(&self) -> TruthAmount {
        self.spendable + self.staked
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    fn get_account(&self, address: &WalletAddress) -> Result<Option<AccountBalance>, StoreError>;
    fn put_account(&self, account: &AccountBalance) -> Result<(), StoreError>;
    fn account_count(&self) -> Result<u64, StoreError>;
    fn iter_accounts(&self) -> Result<Vec<AccountBalance>, StoreError>;

    fn exists(&self, address: &WalletAddress) -> Result<bool, StoreError> {
        self.get_account(address).map(|a| a.is_some())
    }
}
