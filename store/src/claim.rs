//! Claim storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use truth_types::{Claim, ClaimId, Vote, VotingResult, WalletAddress};

/// A claim with its ordered votes and, once resolved, its terminal result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim: Claim,
    /// Votes in cast order.
    pub votes: Vec<Vote>,
    /// Set exactly once, by resolution.
    pub result: Option<VotingResult>,
}

impl ClaimRecord {
    /// A freshly submitted claim with no votes.
    pub fn open(claim: Claim) -> Self {
        Self {
            claim,
            votes: Vec::new(),
            result: None,
        }
    }

    pub fn id(&self) -> &ClaimId {
        &self.claim.id
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_voted(&self, voter: &WalletAddress) -> bool {
        self.votes.iter().any(|v| &v.voter == voter)
    }
}

/// Trait for claim storage. Votes are embedded in the claim record.
pub trait ClaimStore {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, StoreError>;
    fn put_claim(&self, record: &ClaimRecord) -> Result<(), StoreError>;
    fn claim_count(&self) -> Result<u64, StoreError>;

    /// All claims, oldest first.
    fn iter_claims(&self) -> Result<Vec<ClaimRecord>, StoreError>;
}
