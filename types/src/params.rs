//! Tokenomics policy: every rate, bonus and threshold used by the engine.
//!
//! Amounts are [`TruthAmount`]s; rates and multipliers are basis points
//! (10_000 = 100%, or ×1.0 for multipliers).

use serde::{Deserialize, Serialize};

use crate::amount::TruthAmount;
use crate::error::TruthError;

/// Process-wide immutable configuration for submission, voting and resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenomics {
    // ── Supply ───────────────────────────────────────────────────────────
    /// Total TRUTH supply. Reported only.
    pub total_supply: TruthAmount,
    /// TRUTH in circulation. Reported only.
    pub circulating_supply: TruthAmount,
    /// Initial treasury pool funding bonuses and rewards.
    pub treasury_pool: TruthAmount,
    /// Spendable balance given to an account on first reference.
    pub starting_balance: TruthAmount,

    // ── Submission ───────────────────────────────────────────────────────
    /// Undiscounted fee to submit a claim.
    pub submission_cost: TruthAmount,
    /// Fixed bonus paid to the author of a verified claim.
    pub truthful_submission_bonus: TruthAmount,
    /// Fraction of the submission stake taken from the author of a disputed claim.
    pub false_submission_penalty_bps: u32,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Minimum stake per vote (halved for validators holding reduced-stake).
    pub minimum_vote_stake: TruthAmount,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Reward pool as a multiple of the total stake on a claim.
    pub reward_multiplier_bps: u32,
    /// Bonus for the first `early_voter_slots` winning voters.
    pub early_voter_bonus_bps: u32,
    /// How many winning voters (in cast order) receive the early-voter bonus.
    pub early_voter_slots: u32,
    /// Bonus per consecutive accurate vote.
    pub consecutive_accuracy_bonus_bps: u32,
    /// Cap on the total consecutive-accuracy bonus.
    pub consecutive_bonus_cap_bps: u32,
    /// Multiplier for voters holding the bonus-rewards validator privilege.
    pub premium_validator_multiplier_bps: u32,
    /// Multiplier for regional validators voting on a located claim.
    pub regional_validator_multiplier_bps: u32,
    /// Accuracy threshold for reputation bonuses. Reported only.
    pub reputation_threshold_bps: u32,

    // ── Penalties ────────────────────────────────────────────────────────
    /// Fraction of stake lost by a losing voter.
    pub penalty_rate_bps: u32,
    /// Ceiling for the escalated penalty rate.
    pub max_penalty_rate_bps: u32,
    /// Escalation applies once a voter has more than this many penalties.
    pub penalty_escalation_after: u32,
    /// Escalation per prior penalty, applied as `rate * (1 + count * step)`.
    pub penalty_escalation_step_bps: u32,
    /// Nominal share of total stake recorded as burned on resolution.
    pub burn_rate_bps: u32,
}

impl Tokenomics {
    /// TRUTH defaults: the intended configuration for the platform.
    pub fn truth_defaults() -> Self {
        Self {
            total_supply: TruthAmount::from_truth(10_000_000),
            circulating_supply: TruthAmount::from_truth(7_500_000), // 75%
            treasury_pool: TruthAmount::from_truth(2_500_000),      // 25%
            starting_balance: TruthAmount::from_truth(1_000),

            submission_cost: TruthAmount::from_truth(100),
            truthful_submission_bonus: TruthAmount::from_truth(200),
            false_submission_penalty_bps: 5_000, // 50%

            minimum_vote_stake: TruthAmount::from_truth(10),

            reward_multiplier_bps: 15_000, // ×1.5
            early_voter_bonus_bps: 2_500,  // 25%
            early_voter_slots: 10,
            consecutive_accuracy_bonus_bps: 1_000, // 10% per streak step
            consecutive_bonus_cap_bps: 10_000,     // at most +100%
            premium_validator_multiplier_bps: 15_000,
            regional_validator_multiplier_bps: 12_000,
            reputation_threshold_bps: 8_000,

            penalty_rate_bps: 2_000,     // 20%
            max_penalty_rate_bps: 8_000, // 80%
            penalty_escalation_after: 5,
            penalty_escalation_step_bps: 1_000,
            burn_rate_bps: 1_000, // 10%
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), TruthError> {
        let fractions = [
            ("false_submission_penalty_bps", self.false_submission_penalty_bps),
            ("penalty_rate_bps", self.penalty_rate_bps),
            ("max_penalty_rate_bps", self.max_penalty_rate_bps),
            ("burn_rate_bps", self.burn_rate_bps),
            ("reputation_threshold_bps", self.reputation_threshold_bps),
        ];
        for (name, bps) in fractions {
            if bps > 10_000 {
                return Err(TruthError::InvalidTokenomics(format!(
                    "{name} must not exceed 10000, got {bps}"
                )));
            }
        }
        if self.max_penalty_rate_bps < self.penalty_rate_bps {
            return Err(TruthError::InvalidTokenomics(format!(
                "max_penalty_rate_bps ({}) is below penalty_rate_bps ({})",
                self.max_penalty_rate_bps, self.penalty_rate_bps
            )));
        }
        if self.minimum_vote_stake.is_zero() {
            return Err(TruthError::InvalidTokenomics(
                "minimum_vote_stake must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Default is the TRUTH platform configuration.
impl Default for Tokenomics {
    fn default() -> Self {
        Self::truth_defaults()
    }
}
