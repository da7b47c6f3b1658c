//! Stake-backed voting on open claims.

use truth_ledger::LedgerBatch;
use truth_reputation::{holds_privilege, PrivilegeKind};
use truth_store::{ClaimRecord, TruthStore};
use truth_types::{
    ClaimId, Decision, Tokenomics, TruthAmount, ValidatorTier, Vote, WalletAddress,
};

use crate::error::VerificationError;

/// A vote as requested by a participant, before it is cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub voter: WalletAddress,
    pub claim_id: ClaimId,
    pub decision: Decision,
    pub justification: String,
    pub stake: TruthAmount,
    pub validator_tier: Option<ValidatorTier>,
    pub regional_validator: bool,
}

impl Ballot {
    pub fn new(voter: WalletAddress, claim_id: ClaimId, decision: Decision, stake: TruthAmount) -> Self {
        Self {
            voter,
            claim_id,
            decision,
            justification: String::new(),
            stake,
            validator_tier: None,
            regional_validator: false,
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = justification.into();
        self
    }

    /// Cast as a validator of `tier`, optionally regional for the claim.
    pub fn as_validator(mut self, tier: ValidatorTier, regional: bool) -> Self {
        self.validator_tier = Some(tier);
        self.regional_validator = regional;
        self
    }
}

/// Minimum stake for a voter holding `tier`. Halved (floored to whole TRUTH)
/// for tiers with the reduced-stake privilege.
pub fn minimum_stake(tokenomics: &Tokenomics, tier: Option<ValidatorTier>) -> TruthAmount {
    match tier {
        Some(tier) if holds_privilege(tier, PrivilegeKind::ReducedStake) => tokenomics
            .minimum_vote_stake
            .mul_bps(PrivilegeKind::ReducedStake.multiplier_bps())
            .floor_to_unit(),
        _ => tokenomics.minimum_vote_stake,
    }
}

pub struct VotingService<'a> {
    tokenomics: &'a Tokenomics,
}

impl<'a> VotingService<'a> {
    pub fn new(tokenomics: &'a Tokenomics) -> Self {
        Self { tokenomics }
    }

    /// Stage `ballot` into `batch` against the claim in `record`.
    ///
    /// Checks, in order: the claim is open, the voter has not voted on it,
    /// the stake meets the tier-adjusted minimum, and the voter can cover it.
    /// On success the stake moves from spendable to staked and the vote is
    /// appended to `record`.
    pub fn cast<S: TruthStore>(
        &self,
        batch: &mut LedgerBatch<'_, S>,
        record: &mut ClaimRecord,
        ballot: Ballot,
    ) -> Result<Vote, VerificationError> {
        if record.is_resolved() {
            return Err(VerificationError::ClaimAlreadyResolved(record.id().to_string()));
        }
        if record.has_voted(&ballot.voter) {
            return Err(VerificationError::AlreadyVoted {
                voter: ballot.voter.to_string(),
                claim: record.id().to_string(),
            });
        }
        let minimum = minimum_stake(self.tokenomics, ballot.validator_tier);
        if ballot.stake < minimum || ballot.stake.is_zero() {
            return Err(VerificationError::StakeTooLow {
                stake: ballot.stake,
                minimum,
            });
        }

        batch.stake(&ballot.voter, ballot.stake, record.id())?;
        batch.account(&ballot.voter)?.total_votes += 1;

        let vote = Vote {
            voter: ballot.voter,
            claim_id: record.id().clone(),
            decision: ballot.decision,
            justification: ballot.justification,
            stake: ballot.stake,
            timestamp: batch.now(),
            validator_tier: ballot.validator_tier,
            regional_validator: ballot.regional_validator,
        };
        record.votes.push(vote.clone());
        batch.put_claim(record.clone());
        Ok(vote)
    }
}
