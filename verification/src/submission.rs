//! Claim submission: the author pays a reputation-discounted fee into the
//! treasury and a new claim opens for voting.

use truth_ledger::LedgerBatch;
use truth_store::{ClaimRecord, TruthStore};
use truth_types::{
    Claim, ClaimContent, ClaimId, Counterparty, Location, ReputationTier, Tokenomics,
    TransactionKind, TruthAmount, WalletAddress,
};

use crate::error::VerificationError;

/// Submission fee for an author at `tier`, floored to whole TRUTH.
pub fn submission_fee(tokenomics: &Tokenomics, tier: ReputationTier) -> TruthAmount {
    tokenomics
        .submission_cost
        .mul_bps(10_000 - tier.submission_discount_bps())
        .floor_to_unit()
}

pub struct SubmissionService<'a> {
    tokenomics: &'a Tokenomics,
}

impl<'a> SubmissionService<'a> {
    pub fn new(tokenomics: &'a Tokenomics) -> Self {
        Self { tokenomics }
    }

    /// Stage a submission into `batch`.
    ///
    /// `sequence` is the number of claims already stored; it keeps derived
    /// claim ids unique. Fails with `ClaimIdTaken` if the derived id already
    /// names a claim, and with `InsufficientBalance` when the author cannot
    /// cover the fee, leaving the batch's balances untouched.
    pub fn submit<S: TruthStore>(
        &self,
        batch: &mut LedgerBatch<'_, S>,
        author: &WalletAddress,
        content: ClaimContent,
        location: Option<Location>,
        sequence: u64,
    ) -> Result<Claim, VerificationError> {
        let tier = batch.account(author)?.reputation;
        let fee = submission_fee(self.tokenomics, tier);
        let created_at = batch.now();
        let id = ClaimId::derive(author, &content.title, created_at, sequence);
        if batch.claim_exists(&id)? {
            return Err(VerificationError::ClaimIdTaken(id.to_string()));
        }

        batch.transfer(
            author,
            Counterparty::Treasury,
            fee,
            TransactionKind::Submission,
            Some(&id),
        )?;
        batch.account(author)?.total_submissions += 1;

        let claim = Claim {
            id,
            author: author.clone(),
            content,
            location,
            created_at,
            submission_stake: fee,
        };
        batch.put_claim(ClaimRecord::open(claim.clone()));
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_discount_by_tier() {
        let t = Tokenomics::default();
        assert_eq!(submission_fee(&t, ReputationTier::Novice), TruthAmount::from_truth(100));
        assert_eq!(submission_fee(&t, ReputationTier::Trusted), TruthAmount::from_truth(85));
        assert_eq!(submission_fee(&t, ReputationTier::Expert), TruthAmount::from_truth(70));
        assert_eq!(submission_fee(&t, ReputationTier::Authority), TruthAmount::from_truth(50));
    }

    #[test]
    fn discounted_fee_floors_to_whole_truth() {
        let mut t = Tokenomics::default();
        t.submission_cost = TruthAmount::from_truth(15);
        // 15 * 0.85 = 12.75
        assert_eq!(submission_fee(&t, ReputationTier::Trusted), TruthAmount::from_truth(12));
        // 15 * 0.5 = 7.5
        assert_eq!(submission_fee(&t, ReputationTier::Authority), TruthAmount::from_truth(7));
    }
}
