//! Claim resolution: settle a claim by stake weight, then distribute rewards
//! and penalties.
//!
//! [`compute_resolution`] is pure. It sees the claim, its votes and each
//! voter's record as it stood before resolution, and returns every amount
//! that will move. [`apply_resolution`] then stages those movements into a
//! ledger batch.
//!
//! Winners share `total_stake * reward_multiplier`. Each winner's share of the
//! pool is proportional to stake and then compounded, in order, by:
//! - the early-voter bonus (first `early_voter_slots` winners in cast order),
//! - the streak bonus from consecutive accurate votes (capped),
//! - the premium multiplier for validators holding bonus rewards,
//! - the regional multiplier for regional validators on a located claim,
//! - the voter's reputation tier multiplier.
//!
//! Losers get their stake back minus the penalty rate, escalated for repeat
//! offenders. The forfeited part is destroyed.

use std::collections::BTreeMap;

use serde::Serialize;
use truth_ledger::LedgerBatch;
use truth_reputation::{holds_privilege, reclassify, PrivilegeKind};
use truth_store::{AccountBalance, ClaimRecord, TruthStore};
use truth_types::{
    Claim, Counterparty, Decision, ReputationTier, Tokenomics, TransactionKind, TruthAmount,
    Verdict, Vote, VotingResult, WalletAddress,
};

use crate::error::VerificationError;

/// The parts of a voter's record that resolution reads, taken before any
/// change is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoterSnapshot {
    pub consecutive_accurate_votes: u64,
    pub penalty_count: u32,
    pub reputation: ReputationTier,
}

impl From<&AccountBalance> for VoterSnapshot {
    fn from(account: &AccountBalance) -> Self {
        Self {
            consecutive_accurate_votes: account.consecutive_accurate_votes,
            penalty_count: account.penalty_count,
            reputation: account.reputation,
        }
    }
}

/// What resolution does to one vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoterOutcome {
    pub voter: WalletAddress,
    pub decision: Decision,
    pub stake: TruthAmount,
    /// Voted with the verdict.
    pub won: bool,
    /// Paid from the treasury on top of the returned stake (winners only).
    pub reward: TruthAmount,
    /// Part of the stake destroyed (losers only).
    pub penalty: TruthAmount,
    /// Part of the stake handed back to spendable.
    pub returned: TruthAmount,
    pub early_voter: bool,
    /// Penalty rate actually applied, after escalation.
    pub penalty_rate_bps: u32,
}

/// What resolution does to the claim's author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmitterOutcome {
    pub author: WalletAddress,
    /// Truthful-submission bonus (verified claims).
    pub bonus: TruthAmount,
    /// Penalty owed (disputed claims).
    pub penalty_due: TruthAmount,
    /// Penalty actually charged; never more than the author's balance.
    pub penalty_charged: TruthAmount,
}

/// Everything a resolution moves, in application order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionOutcome {
    pub result: VotingResult,
    /// Winners in cast order, then losers in cast order.
    pub voters: Vec<VoterOutcome>,
    pub submitter: SubmitterOutcome,
    /// Nominal burn recorded in the log; moves no balance.
    pub burn_amount: TruthAmount,
}

impl ResolutionOutcome {
    pub fn total_rewards(&self) -> TruthAmount {
        self.voters.iter().map(|v| v.reward).sum()
    }

    pub fn total_penalties(&self) -> TruthAmount {
        self.voters.iter().map(|v| v.penalty).sum()
    }
}

fn side_stake(votes: &[&Vote]) -> TruthAmount {
    votes.iter().map(|v| v.stake).sum()
}

fn escalated_penalty_rate(tokenomics: &Tokenomics, penalty_count: u32) -> u32 {
    let base = tokenomics.penalty_rate_bps;
    if penalty_count <= tokenomics.penalty_escalation_after {
        return base;
    }
    let factor = 10_000u64 + u64::from(penalty_count) * u64::from(tokenomics.penalty_escalation_step_bps);
    let escalated = u64::from(base) * factor / 10_000;
    escalated.min(u64::from(tokenomics.max_penalty_rate_bps)) as u32
}

/// Settle `claim` over `votes` (in cast order).
///
/// `snapshots` holds each voter's pre-resolution record; a voter missing from
/// it is treated as a fresh account.
pub fn compute_resolution(
    tokenomics: &Tokenomics,
    claim: &Claim,
    votes: &[Vote],
    snapshots: &BTreeMap<WalletAddress, VoterSnapshot>,
) -> ResolutionOutcome {
    let (verify, dispute): (Vec<&Vote>, Vec<&Vote>) =
        votes.iter().partition(|v| v.decision == Decision::Verify);
    let verify_stake = side_stake(&verify);
    let dispute_stake = side_stake(&dispute);
    let total_stake = verify_stake + dispute_stake;

    let verdict = Verdict::from_stakes(verify_stake, dispute_stake);
    let (winners, losers, winning_stake) = match verdict {
        Verdict::Verified => (&verify, &dispute, verify_stake),
        Verdict::Disputed => (&dispute, &verify, dispute_stake),
    };
    let reward_pool = total_stake.mul_bps(tokenomics.reward_multiplier_bps);

    let snapshot = |voter: &WalletAddress| snapshots.get(voter).copied().unwrap_or_default();
    let mut voters = Vec::with_capacity(votes.len());

    for (index, vote) in winners.iter().enumerate() {
        let before = snapshot(&vote.voter);
        let early_voter = index < tokenomics.early_voter_slots as usize;

        let mut reward = vote.stake.mul_div(reward_pool, winning_stake);
        if early_voter {
            reward = reward.mul_bps(10_000 + tokenomics.early_voter_bonus_bps);
        }
        let streak_bps = before
            .consecutive_accurate_votes
            .saturating_mul(u64::from(tokenomics.consecutive_accuracy_bonus_bps))
            .min(u64::from(tokenomics.consecutive_bonus_cap_bps)) as u32;
        reward = reward.mul_bps(10_000 + streak_bps);
        if vote
            .validator_tier
            .is_some_and(|tier| holds_privilege(tier, PrivilegeKind::BonusRewards))
        {
            reward = reward.mul_bps(tokenomics.premium_validator_multiplier_bps);
        }
        if vote.regional_validator && claim.location.is_some() {
            reward = reward.mul_bps(tokenomics.regional_validator_multiplier_bps);
        }
        reward = reward.mul_bps(before.reputation.reward_multiplier_bps());

        voters.push(VoterOutcome {
            voter: vote.voter.clone(),
            decision: vote.decision,
            stake: vote.stake,
            won: true,
            reward,
            penalty: TruthAmount::ZERO,
            returned: vote.stake,
            early_voter,
            penalty_rate_bps: 0,
        });
    }

    for vote in losers.iter() {
        let before = snapshot(&vote.voter);
        let rate = escalated_penalty_rate(tokenomics, before.penalty_count);
        let penalty = vote.stake.mul_bps(rate);
        voters.push(VoterOutcome {
            voter: vote.voter.clone(),
            decision: vote.decision,
            stake: vote.stake,
            won: false,
            reward: TruthAmount::ZERO,
            penalty,
            returned: vote.stake - penalty,
            early_voter: false,
            penalty_rate_bps: rate,
        });
    }

    let submitter = match verdict {
        Verdict::Verified => SubmitterOutcome {
            author: claim.author.clone(),
            bonus: tokenomics.truthful_submission_bonus,
            penalty_due: TruthAmount::ZERO,
            penalty_charged: TruthAmount::ZERO,
        },
        Verdict::Disputed => SubmitterOutcome {
            author: claim.author.clone(),
            bonus: TruthAmount::ZERO,
            penalty_due: claim
                .submission_stake
                .mul_bps(tokenomics.false_submission_penalty_bps),
            penalty_charged: TruthAmount::ZERO,
        },
    };

    ResolutionOutcome {
        result: VotingResult {
            claim_id: claim.id.clone(),
            verify_votes: verify.len() as u32,
            dispute_votes: dispute.len() as u32,
            total_stake,
            is_resolved: true,
            final_verdict: verdict,
            reward_pool,
        },
        voters,
        submitter,
        burn_amount: total_stake.mul_bps(tokenomics.burn_rate_bps),
    }
}

/// Projected result for an unresolved claim, moving nothing.
pub fn preview_result(tokenomics: &Tokenomics, claim: &Claim, votes: &[Vote]) -> VotingResult {
    let verify_votes = votes.iter().filter(|v| v.decision == Decision::Verify).count() as u32;
    let verify_stake: TruthAmount = votes
        .iter()
        .filter(|v| v.decision == Decision::Verify)
        .map(|v| v.stake)
        .sum();
    let total_stake: TruthAmount = votes.iter().map(|v| v.stake).sum();
    VotingResult {
        claim_id: claim.id.clone(),
        verify_votes,
        dispute_votes: votes.len() as u32 - verify_votes,
        total_stake,
        is_resolved: false,
        final_verdict: Verdict::from_stakes(verify_stake, total_stake - verify_stake),
        reward_pool: total_stake.mul_bps(tokenomics.reward_multiplier_bps),
    }
}

/// Stage `outcome` into `batch` and mark `record` resolved.
///
/// Fills in the submitter's actually charged penalty.
pub fn apply_resolution<S: TruthStore>(
    batch: &mut LedgerBatch<'_, S>,
    record: &mut ClaimRecord,
    outcome: &mut ResolutionOutcome,
) -> Result<(), VerificationError> {
    let now = batch.now();
    let claim_id = record.id().clone();

    for voter in &outcome.voters {
        batch.release_stake(&voter.voter, voter.stake, voter.returned)?;
        if voter.won {
            batch.pay_from_treasury(&voter.voter, voter.reward)?;
        }
        let account = batch.account(&voter.voter)?;
        if voter.won {
            account.successful_votes += 1;
            account.consecutive_accurate_votes += 1;
        } else {
            account.penalty_count += 1;
            account.consecutive_accurate_votes = 0;
        }
        account.last_vote_at = now;
        reclassify(account);
        tracing::debug!(
            claim = %claim_id,
            voter = %voter.voter,
            won = voter.won,
            reward = %voter.reward,
            penalty = %voter.penalty,
            "voter settled"
        );
    }

    let author = outcome.submitter.author.clone();
    match outcome.result.final_verdict {
        Verdict::Verified => {
            let bonus = outcome.submitter.bonus;
            batch.pay_from_treasury(&author, bonus)?;
            batch.account(&author)?.verified_submissions += 1;
            batch.record(
                TransactionKind::Reward,
                bonus,
                Counterparty::Treasury,
                Counterparty::Account(author.clone()),
                Some(&claim_id),
            );
        }
        Verdict::Disputed => {
            let charged = batch.charge_to_burn(&author, outcome.submitter.penalty_due)?;
            outcome.submitter.penalty_charged = charged;
            batch.record(
                TransactionKind::Penalty,
                charged,
                Counterparty::Account(author.clone()),
                Counterparty::Burn,
                Some(&claim_id),
            );
        }
    }
    reclassify(batch.account(&author)?);

    batch.record(
        TransactionKind::Burn,
        outcome.burn_amount,
        Counterparty::Treasury,
        Counterparty::Burn,
        Some(&claim_id),
    );

    record.result = Some(outcome.result.clone());
    batch.put_claim(record.clone());
    batch.fence_resolution(&claim_id);
    Ok(())
}
