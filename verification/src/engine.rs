//! The news verification engine: submission, voting, resolution and queries
//! over one ledger.

use std::collections::BTreeMap;
use std::sync::Arc;

use truth_ledger::{Ledger, LedgerError, SupplyAudit};
use truth_reputation::{ValidatorDirectory, ValidatorRegistry};
use truth_store::{AccountBalance, ClaimRecord, StoreError, TruthStore};
use truth_types::{
    Claim, ClaimContent, ClaimId, Clock, Location, SystemClock, Tokenomics, TransactionRecord,
    TruthError, Vote, VotingResult, WalletAddress,
};

use crate::error::VerificationError;
use crate::resolution::{
    apply_resolution, compute_resolution, preview_result, ResolutionOutcome, VoterSnapshot,
};
use crate::stats::{EngineStats, StatsSnapshot};
use crate::submission::SubmissionService;
use crate::voting::{Ballot, VotingService};

/// Single-writer verification service.
///
/// Every mutating operation takes `&mut self`; share the engine behind a
/// `Mutex` when several callers need it. Each operation stages its changes in
/// one ledger batch and commits them atomically, so a failed operation leaves
/// no trace.
pub struct NewsVerification<S> {
    ledger: Ledger<S>,
    tokenomics: Tokenomics,
    clock: Arc<dyn Clock>,
    stats: EngineStats,
}

impl<S: TruthStore> NewsVerification<S> {
    pub fn new(
        store: Arc<S>,
        tokenomics: Tokenomics,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, VerificationError> {
        tokenomics.validate()?;
        if let Some(stored) = store.get_supply()? {
            if stored.genesis_treasury != tokenomics.treasury_pool {
                tracing::warn!(
                    stored = %stored.genesis_treasury,
                    configured = %tokenomics.treasury_pool,
                    "configured treasury pool differs from the store's genesis; keeping the stored pool"
                );
            }
        }
        Ok(Self {
            ledger: Ledger::new(store, &tokenomics),
            tokenomics,
            clock,
            stats: EngineStats::new(),
        })
    }

    pub fn with_system_clock(store: Arc<S>, tokenomics: Tokenomics) -> Result<Self, VerificationError> {
        Self::new(store, tokenomics, Arc::new(SystemClock))
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        self.ledger.store()
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Submit a claim, charging the author's discounted fee.
    pub fn submit(
        &mut self,
        content: ClaimContent,
        author: &WalletAddress,
        location: Option<Location>,
    ) -> Result<ClaimId, VerificationError> {
        let result = self.try_submit(content, author, location);
        let claim = self.track("submit", result)?;
        self.stats.record_submission();
        tracing::info!(
            claim = %claim.id,
            author = %claim.author,
            fee = %claim.submission_stake,
            located = claim.location.is_some(),
            "claim submitted"
        );
        Ok(claim.id)
    }

    fn try_submit(
        &self,
        content: ClaimContent,
        author: &WalletAddress,
        location: Option<Location>,
    ) -> Result<Claim, VerificationError> {
        check_address(author)?;
        let sequence = self.store().claim_count()?;
        let mut batch = self.ledger.begin(self.clock.now())?;
        let claim = SubmissionService::new(&self.tokenomics).submit(
            &mut batch,
            author,
            content,
            location,
            sequence,
        )?;
        batch.commit()?;
        Ok(claim)
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Cast a stake-backed vote.
    pub fn vote(&mut self, ballot: Ballot) -> Result<Vote, VerificationError> {
        let result = self.try_vote(ballot);
        let vote = self.track("vote", result)?;
        self.stats.record_vote();
        tracing::info!(
            claim = %vote.claim_id,
            voter = %vote.voter,
            decision = ?vote.decision,
            stake = %vote.stake,
            validator_tier = ?vote.validator_tier,
            regional = vote.regional_validator,
            "vote cast"
        );
        Ok(vote)
    }

    /// Cast a vote with the voter's validator tier and regional standing
    /// taken from `directory`. Any tier or flag already on the ballot is
    /// replaced.
    pub fn vote_as_validator(
        &mut self,
        directory: &dyn ValidatorDirectory,
        ballot: Ballot,
    ) -> Result<Vote, VerificationError> {
        let lookup = self.load_claim(&ballot.claim_id);
        let record = self.track("vote", lookup)?;
        let ballot = match directory.tier_of(&ballot.voter) {
            Some(tier) => {
                let regional = match (directory.region_of(&ballot.voter), &record.claim.location) {
                    (Some(region), Some(location)) => region == location.region,
                    _ => false,
                };
                ballot.as_validator(tier, regional)
            }
            None => Ballot {
                validator_tier: None,
                regional_validator: false,
                ..ballot
            },
        };
        self.vote(ballot)
    }

    fn try_vote(&self, ballot: Ballot) -> Result<Vote, VerificationError> {
        check_address(&ballot.voter)?;
        let mut record = self.load_claim(&ballot.claim_id)?;
        let mut batch = self.ledger.begin(self.clock.now())?;
        let vote = VotingService::new(&self.tokenomics).cast(&mut batch, &mut record, ballot)?;
        batch.commit()?;
        Ok(vote)
    }

    // ── Resolution ───────────────────────────────────────────────────────

    /// Settle a claim. A claim can be resolved exactly once.
    pub fn resolve(&mut self, claim_id: &ClaimId) -> Result<VotingResult, VerificationError> {
        self.resolve_with_outcome(claim_id).map(|outcome| outcome.result)
    }

    /// Settle a claim and report every amount that moved.
    pub fn resolve_with_outcome(
        &mut self,
        claim_id: &ClaimId,
    ) -> Result<ResolutionOutcome, VerificationError> {
        let result = self.try_resolve(claim_id);
        let outcome = self.track("resolve", result)?;
        self.stats.record_resolution();
        tracing::info!(
            claim = %claim_id,
            verdict = %outcome.result.final_verdict,
            verify_votes = outcome.result.verify_votes,
            dispute_votes = outcome.result.dispute_votes,
            total_stake = %outcome.result.total_stake,
            reward_pool = %outcome.result.reward_pool,
            rewards = %outcome.total_rewards(),
            penalties = %outcome.total_penalties(),
            "claim resolved"
        );
        Ok(outcome)
    }

    /// Settle a claim, then fold each registered validator's correctness
    /// into `registry`.
    pub fn resolve_with_validators(
        &mut self,
        claim_id: &ClaimId,
        registry: &mut ValidatorRegistry,
    ) -> Result<ResolutionOutcome, VerificationError> {
        let outcome = self.resolve_with_outcome(claim_id)?;
        let region = self
            .article(claim_id)?
            .and_then(|claim| claim.location)
            .map(|location| location.region);
        for voter in &outcome.voters {
            if registry.ranking(&voter.voter).is_some() {
                registry.record_validation(&voter.voter, voter.won, region.as_deref())?;
            }
        }
        Ok(outcome)
    }

    fn try_resolve(&self, claim_id: &ClaimId) -> Result<ResolutionOutcome, VerificationError> {
        let mut record = self.load_claim(claim_id)?;
        if record.is_resolved() {
            return Err(VerificationError::AlreadyResolved(claim_id.to_string()));
        }

        let mut batch = self.ledger.begin(self.clock.now())?;
        let mut snapshots = BTreeMap::new();
        for vote in &record.votes {
            let account = batch.account(&vote.voter)?;
            snapshots.insert(vote.voter.clone(), VoterSnapshot::from(&*account));
        }

        let mut outcome =
            compute_resolution(&self.tokenomics, &record.claim, &record.votes, &snapshots);
        apply_resolution(&mut batch, &mut record, &mut outcome)?;
        batch.commit().map_err(|err| match err {
            LedgerError::Storage(StoreError::Conflict(_)) => {
                VerificationError::AlreadyResolved(claim_id.to_string())
            }
            other => other.into(),
        })?;
        Ok(outcome)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// The account for `address`, created with the starting balance on first
    /// reference.
    pub fn get_balance(&mut self, address: &WalletAddress) -> Result<AccountBalance, VerificationError> {
        check_address(address)?;
        Ok(self.ledger.get_balance(address, self.clock.now())?)
    }

    /// The account for `address` if it exists, without creating it.
    pub fn peek_balance(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<AccountBalance>, VerificationError> {
        Ok(self.ledger.peek_balance(address)?)
    }

    pub fn tokenomics(&self) -> &Tokenomics {
        &self.tokenomics
    }

    pub fn transaction_history(
        &self,
        address: Option<&WalletAddress>,
    ) -> Result<Vec<TransactionRecord>, VerificationError> {
        Ok(self.ledger.transaction_history(address)?)
    }

    pub fn article(&self, claim_id: &ClaimId) -> Result<Option<Claim>, VerificationError> {
        Ok(self.store().get_claim(claim_id)?.map(|record| record.claim))
    }

    /// Every claim, oldest first.
    pub fn all_articles(&self) -> Result<Vec<Claim>, VerificationError> {
        Ok(self
            .store()
            .iter_claims()?
            .into_iter()
            .map(|record| record.claim)
            .collect())
    }

    /// Votes on a claim in cast order.
    pub fn votes(&self, claim_id: &ClaimId) -> Result<Vec<Vote>, VerificationError> {
        Ok(self.load_claim(claim_id)?.votes)
    }

    /// The stored result of a resolved claim, or a non-binding preview of an
    /// open one. `None` for an open claim without votes.
    pub fn voting_result(
        &self,
        claim_id: &ClaimId,
    ) -> Result<Option<VotingResult>, VerificationError> {
        let record = self.load_claim(claim_id)?;
        if let Some(result) = record.result {
            return Ok(Some(result));
        }
        if record.votes.is_empty() {
            return Ok(None);
        }
        Ok(Some(preview_result(&self.tokenomics, &record.claim, &record.votes)))
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Conservation report over the whole ledger.
    pub fn audit(&self) -> Result<SupplyAudit, VerificationError> {
        Ok(self.ledger.audit()?)
    }

    fn load_claim(&self, claim_id: &ClaimId) -> Result<ClaimRecord, VerificationError> {
        self.store()
            .get_claim(claim_id)?
            .ok_or_else(|| VerificationError::ClaimNotFound(claim_id.to_string()))
    }

    fn track<T>(
        &self,
        operation: &'static str,
        result: Result<T, VerificationError>,
    ) -> Result<T, VerificationError> {
        if let Err(err) = &result {
            self.stats.record_rejection();
            if err.is_recoverable() {
                tracing::warn!(operation, error = %err, "operation rejected");
            } else {
                tracing::error!(operation, error = %err, "operation failed");
            }
        }
        result
    }
}

fn check_address(address: &WalletAddress) -> Result<(), VerificationError> {
    if address.is_valid() {
        Ok(())
    } else {
        Err(TruthError::InvalidAddress(address.to_string()).into())
    }
}
