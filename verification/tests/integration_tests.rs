//! End-to-end flows through the verification engine over the in-memory store.

use std::sync::Arc;

use truth_nullables::{NullClock, NullStore};
use truth_reputation::ValidatorRegistry;
use truth_store::{AccountBalance, AccountStore, ClaimRecord, ClaimStore};
use truth_types::{
    Claim, ClaimContent, ClaimId, Clock, Counterparty, Decision, Location, ReputationTier,
    Timestamp, Tokenomics, TransactionKind, TruthAmount, ValidatorTier, Verdict, WalletAddress,
};
use truth_verification::{Ballot, NewsVerification, VerificationError};

struct Harness {
    store: Arc<NullStore>,
    clock: Arc<NullClock>,
    engine: NewsVerification<NullStore>,
}

fn harness_with(tokenomics: Tokenomics) -> Harness {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let engine = NewsVerification::new(store.clone(), tokenomics, clock.clone()).unwrap();
    Harness { store, clock, engine }
}

fn harness() -> Harness {
    harness_with(Tokenomics::default())
}

fn addr(name: &str) -> WalletAddress {
    WalletAddress::new(format!("addr1{name}"))
}

fn truth(n: u128) -> TruthAmount {
    TruthAmount::from_truth(n)
}

fn content(title: &str) -> ClaimContent {
    ClaimContent {
        title: title.into(),
        body: "Reported by two outlets.".into(),
        category: "local".into(),
        sources: vec!["https://news.example/1".into()],
    }
}

fn europe() -> Location {
    Location {
        region: "Europe".into(),
        country: "FR".into(),
    }
}

impl Harness {
    fn submit(&mut self, author: &str) -> ClaimId {
        self.engine.submit(content("claim"), &addr(author), None).unwrap()
    }

    fn vote(&mut self, voter: &str, claim: &ClaimId, decision: Decision, stake: u128) {
        self.engine
            .vote(Ballot::new(addr(voter), claim.clone(), decision, truth(stake)))
            .unwrap();
    }

    fn spendable(&self, name: &str) -> TruthAmount {
        self.engine.peek_balance(&addr(name)).unwrap().unwrap().spendable
    }

    fn account(&self, name: &str) -> AccountBalance {
        self.engine.peek_balance(&addr(name)).unwrap().unwrap()
    }
}

#[test]
fn three_verify_one_dispute() {
    let mut h = harness();
    let claim = h.submit("author");
    h.vote("a", &claim, Decision::Verify, 10);
    h.vote("b", &claim, Decision::Verify, 10);
    h.vote("c", &claim, Decision::Dispute, 10);
    h.vote("d", &claim, Decision::Verify, 10);
    h.clock.advance(3_600);

    let result = h.engine.resolve(&claim).unwrap();
    assert_eq!(result.final_verdict, Verdict::Verified);
    assert_eq!(result.verify_votes, 3);
    assert_eq!(result.dispute_votes, 1);
    assert_eq!(result.total_stake, truth(40));
    assert_eq!(result.reward_pool, truth(60));
    assert!(result.is_resolved);

    for winner in ["a", "b", "d"] {
        let account = h.account(winner);
        assert_eq!(account.spendable, truth(1_025));
        assert_eq!(account.staked, TruthAmount::ZERO);
        assert_eq!(account.rewards_earned, truth(25));
        assert_eq!(account.successful_votes, 1);
        assert_eq!(account.consecutive_accurate_votes, 1);
        assert_eq!(account.accuracy_bps, 10_000);
        assert_eq!(account.last_vote_at.as_secs(), 1_700_003_600);
    }

    let loser = h.account("c");
    assert_eq!(loser.spendable, truth(998));
    assert_eq!(loser.staked, TruthAmount::ZERO);
    assert_eq!(loser.penalty_count, 1);
    assert_eq!(loser.accuracy_bps, 0);

    let author = h.account("author");
    assert_eq!(author.spendable, truth(1_100));
    assert_eq!(author.verified_submissions, 1);
    assert_eq!(author.rewards_earned, truth(200));

    let history = h.engine.transaction_history(None).unwrap();
    let kinds: Vec<_> = history.iter().map(|tx| tx.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Submission,
            TransactionKind::VoteStake,
            TransactionKind::VoteStake,
            TransactionKind::VoteStake,
            TransactionKind::VoteStake,
            TransactionKind::Reward,
            TransactionKind::Burn,
        ]
    );
    assert_eq!(history[6].amount, truth(4));
    assert_eq!(history[6].from, Counterparty::Treasury);
    assert_eq!(history[6].to, Counterparty::Burn);
    assert_eq!(history[0].id, "tx_00000001");

    let audit = h.engine.audit().unwrap();
    assert!(audit.is_balanced(), "{audit:?}");
    assert_eq!(audit.burned, truth(2));
    assert_eq!(audit.treasury, truth(2_500_000 + 100 - 75 - 200));
}

#[test]
fn authority_author_pays_half() {
    let mut h = harness();
    let mut author = AccountBalance::new(addr("author"), truth(1_000));
    author.reputation = ReputationTier::Authority;
    h.store.put_account(&author).unwrap();

    let claim = h.submit("author");
    assert_eq!(h.engine.article(&claim).unwrap().unwrap().submission_stake, truth(50));
    assert_eq!(h.spendable("author"), truth(950));
    assert_eq!(h.account("author").total_submissions, 1);
}

#[test]
fn submission_needs_balance() {
    let mut tokenomics = Tokenomics::default();
    tokenomics.submission_cost = truth(1_001);
    let mut h = harness_with(tokenomics);

    let err = h.engine.submit(content("x"), &addr("author"), None).unwrap_err();
    assert!(matches!(err, VerificationError::InsufficientBalance { .. }));
    assert!(err.is_recoverable());
    assert!(h.engine.all_articles().unwrap().is_empty());
    assert!(h.engine.transaction_history(None).unwrap().is_empty());
}

#[test]
fn gold_validator_below_halved_minimum() {
    let mut h = harness();
    let claim = h.submit("author");
    let before = h.engine.get_balance(&addr("gold")).unwrap();
    let tx_count = h.engine.transaction_history(None).unwrap().len();

    let ballot = Ballot::new(addr("gold"), claim.clone(), Decision::Verify, truth(4))
        .as_validator(ValidatorTier::Gold, false);
    let err = h.engine.vote(ballot).unwrap_err();
    assert!(matches!(
        err,
        VerificationError::StakeTooLow { stake, minimum } if stake == truth(4) && minimum == truth(5)
    ));
    assert_eq!(h.account("gold"), before);
    assert_eq!(h.engine.transaction_history(None).unwrap().len(), tx_count);
    assert!(h.engine.votes(&claim).unwrap().is_empty());

    let ballot = Ballot::new(addr("gold"), claim.clone(), Decision::Verify, truth(5))
        .as_validator(ValidatorTier::Gold, false);
    h.engine.vote(ballot).unwrap();
    assert_eq!(h.account("gold").staked, truth(5));
}

#[test]
fn plain_voter_needs_full_minimum() {
    let mut h = harness();
    let claim = h.submit("author");
    let err = h
        .engine
        .vote(Ballot::new(addr("v"), claim, Decision::Verify, truth(9)))
        .unwrap_err();
    assert!(matches!(err, VerificationError::StakeTooLow { .. }));
}

#[test]
fn vote_guards() {
    let mut h = harness();
    let claim = h.submit("author");

    let err = h
        .engine
        .vote(Ballot::new(addr("rich"), claim.clone(), Decision::Verify, truth(1_001)))
        .unwrap_err();
    assert!(matches!(err, VerificationError::InsufficientBalance { .. }));

    h.vote("v", &claim, Decision::Verify, 10);
    let err = h
        .engine
        .vote(Ballot::new(addr("v"), claim.clone(), Decision::Dispute, truth(10)))
        .unwrap_err();
    assert!(matches!(err, VerificationError::AlreadyVoted { .. }));

    h.engine.resolve(&claim).unwrap();
    let err = h
        .engine
        .vote(Ballot::new(addr("late"), claim.clone(), Decision::Verify, truth(10)))
        .unwrap_err();
    assert!(matches!(err, VerificationError::ClaimAlreadyResolved(_)));
    assert_eq!(h.engine.stats().rejections, 3);
}

#[test]
fn tie_resolves_disputed() {
    let mut h = harness();
    let claim = h.submit("author");
    h.vote("a", &claim, Decision::Verify, 10);
    h.vote("b", &claim, Decision::Dispute, 10);

    let result = h.engine.resolve(&claim).unwrap();
    assert_eq!(result.final_verdict, Verdict::Disputed);

    // Lone dispute winner: pool 30, full share ×1.25.
    assert_eq!(h.spendable("b"), TruthAmount::new(1_037_500_000));
    assert_eq!(h.spendable("a"), truth(998));
    assert_eq!(h.spendable("author"), truth(850));

    let penalty = h
        .engine
        .transaction_history(Some(&addr("author")))
        .unwrap()
        .into_iter()
        .find(|tx| tx.kind == TransactionKind::Penalty)
        .unwrap();
    assert_eq!(penalty.amount, truth(50));
    assert_eq!(penalty.to, Counterparty::Burn);
    assert!(h.engine.audit().unwrap().is_balanced());
}

#[test]
fn claim_without_votes_resolves_disputed() {
    let mut h = harness();
    let claim = h.submit("author");
    let result = h.engine.resolve(&claim).unwrap();
    assert_eq!(result.final_verdict, Verdict::Disputed);
    assert_eq!(result.total_stake, TruthAmount::ZERO);
    assert_eq!(h.spendable("author"), truth(850));
}

#[test]
fn author_penalty_saturates_at_zero() {
    let mut h = harness();
    let claim = h.submit("author");
    let mut author = h.account("author");
    author.spendable = truth(10);
    h.store.put_account(&author).unwrap();

    h.engine.resolve(&claim).unwrap();
    assert_eq!(h.spendable("author"), TruthAmount::ZERO);
    let penalty = h
        .engine
        .transaction_history(Some(&addr("author")))
        .unwrap()
        .into_iter()
        .find(|tx| tx.kind == TransactionKind::Penalty)
        .unwrap();
    assert_eq!(penalty.amount, truth(10));
}

#[test]
fn losing_vote_resets_streak() {
    let mut h = harness();

    let first = h.submit("author");
    h.vote("x", &first, Decision::Verify, 10);
    h.engine.resolve(&first).unwrap();
    assert_eq!(h.account("x").consecutive_accurate_votes, 1);

    let second = h.submit("author");
    h.vote("x", &second, Decision::Verify, 10);
    let before = h.spendable("x");
    h.engine.resolve(&second).unwrap();
    // Pool 15, early ×1.25, streak of one ×1.1.
    assert_eq!(h.spendable("x"), before + truth(10) + TruthAmount::new(20_625_000));
    assert_eq!(h.account("x").consecutive_accurate_votes, 2);

    let third = h.submit("author");
    h.vote("x", &third, Decision::Verify, 10);
    h.vote("y", &third, Decision::Dispute, 20);
    h.engine.resolve(&third).unwrap();

    let x = h.account("x");
    assert_eq!(x.consecutive_accurate_votes, 0);
    assert_eq!(x.penalty_count, 1);
    assert_eq!(x.successful_votes, 2);
    assert_eq!(x.total_votes, 3);
    assert_eq!(x.accuracy_bps, 6_666);
    assert!(h.engine.audit().unwrap().is_balanced());
}

#[test]
fn second_resolution_is_fatal() {
    let mut h = harness();
    let claim = h.submit("author");
    h.vote("a", &claim, Decision::Verify, 10);
    h.engine.resolve(&claim).unwrap();

    let balances: Vec<_> = ["a", "author"].iter().map(|n| h.account(n)).collect();
    let tx_count = h.engine.transaction_history(None).unwrap().len();

    let err = h.engine.resolve(&claim).unwrap_err();
    assert!(matches!(err, VerificationError::AlreadyResolved(_)));
    assert!(!err.is_recoverable());

    let after: Vec<_> = ["a", "author"].iter().map(|n| h.account(n)).collect();
    assert_eq!(balances, after);
    assert_eq!(h.engine.transaction_history(None).unwrap().len(), tx_count);
}

#[test]
fn unknown_claim_resolution() {
    let mut h = harness();
    let err = h.engine.resolve(&ClaimId::new("claim_nope")).unwrap_err();
    assert!(matches!(err, VerificationError::ClaimNotFound(_)));
    assert!(matches!(
        h.engine.voting_result(&ClaimId::new("claim_nope")),
        Err(VerificationError::ClaimNotFound(_))
    ));
}

#[test]
fn empty_treasury_still_resolves_by_minting() {
    let mut tokenomics = Tokenomics::default();
    tokenomics.treasury_pool = TruthAmount::ZERO;
    let mut h = harness_with(tokenomics);

    let claim = h.submit("author");
    h.vote("a", &claim, Decision::Verify, 10);

    // Reward 15 × 1.25 early = 18.75 plus the 200 bonus, against the 100 fee.
    let result = h.engine.resolve(&claim).unwrap();
    assert_eq!(result.final_verdict, Verdict::Verified);
    assert_eq!(h.account("a").staked, TruthAmount::ZERO);
    assert_eq!(h.spendable("a"), TruthAmount::new(1_018_750_000));
    assert_eq!(h.spendable("author"), truth(1_100));

    let audit = h.engine.audit().unwrap();
    assert_eq!(audit.treasury, TruthAmount::ZERO);
    assert_eq!(audit.minted, TruthAmount::new(118_750_000));
    assert!(audit.is_balanced(), "{audit:?}");
}

#[test]
fn reconfigured_pool_keeps_the_stored_genesis() {
    let mut h = harness();
    h.submit("author");

    let mut tokenomics = Tokenomics::default();
    tokenomics.treasury_pool = truth(50);
    let reopened = NewsVerification::new(h.store.clone(), tokenomics, h.clock.clone()).unwrap();
    let audit = reopened.audit().unwrap();
    assert_eq!(audit.genesis_treasury, truth(2_500_000));
    assert_eq!(audit.treasury, truth(2_500_100));
    assert!(audit.is_balanced(), "{audit:?}");
}

#[test]
fn taken_claim_id_is_not_overwritten() {
    let mut h = harness();
    let author = addr("author");
    // With one claim stored, the next submission derives its id from sequence 1.
    let taken = ClaimId::derive(&author, "claim", h.clock.now(), 1);
    let blocker = ClaimRecord::open(Claim {
        id: taken.clone(),
        author: addr("other"),
        content: content("earlier claim"),
        location: None,
        created_at: Timestamp::new(1),
        submission_stake: truth(100),
    });
    h.store.put_claim(&blocker).unwrap();

    let err = h.engine.submit(content("claim"), &author, None).unwrap_err();
    assert!(matches!(err, VerificationError::ClaimIdTaken(ref id) if id == taken.as_str()));
    assert_eq!(h.engine.article(&taken).unwrap().unwrap().author, addr("other"));
    assert_eq!(h.engine.all_articles().unwrap().len(), 1);
    assert!(h.engine.peek_balance(&author).unwrap().is_none());
}

#[test]
fn failed_commit_leaves_no_trace() {
    let mut h = harness();
    let claim = h.submit("author");
    h.vote("a", &claim, Decision::Verify, 10);

    h.store.fail_commits(true);
    let err = h.engine.resolve(&claim).unwrap_err();
    assert!(matches!(err, VerificationError::Storage(_)));
    h.store.fail_commits(false);

    assert_eq!(h.account("a").staked, truth(10));
    let result = h.engine.resolve(&claim).unwrap();
    assert_eq!(result.final_verdict, Verdict::Verified);
}

#[test]
fn validator_vote_uses_directory() {
    let mut h = harness();
    let mut registry = ValidatorRegistry::new();
    registry
        .register(addr("plat"), ValidatorTier::Platinum, "Europe", vec!["local".into()])
        .unwrap();

    let claim = h
        .engine
        .submit(content("Flooding in Lyon"), &addr("author"), Some(europe()))
        .unwrap();
    let vote = h
        .engine
        .vote_as_validator(
            &registry,
            Ballot::new(addr("plat"), claim.clone(), Decision::Verify, truth(5)),
        )
        .unwrap();
    assert_eq!(vote.validator_tier, Some(ValidatorTier::Platinum));
    assert!(vote.regional_validator);

    // Unregistered voters keep no validator standing.
    let vote = h
        .engine
        .vote_as_validator(
            &registry,
            Ballot::new(addr("anon"), claim.clone(), Decision::Dispute, truth(10))
                .as_validator(ValidatorTier::Diamond, true),
        )
        .unwrap();
    assert_eq!(vote.validator_tier, None);
    assert!(!vote.regional_validator);

    let outcome = h.engine.resolve_with_validators(&claim, &mut registry).unwrap();
    assert_eq!(outcome.result.final_verdict, Verdict::Disputed);

    let ranking = registry.ranking(&addr("plat")).unwrap();
    assert_eq!(ranking.total_validations, 1);
    assert_eq!(ranking.reputation, 995);
}

#[test]
fn premium_regional_winner() {
    let mut h = harness();
    let mut registry = ValidatorRegistry::new();
    registry
        .register(addr("plat"), ValidatorTier::Platinum, "Europe", vec![])
        .unwrap();
    let claim = h
        .engine
        .submit(content("Strike ends"), &addr("author"), Some(europe()))
        .unwrap();
    h.engine
        .vote_as_validator(
            &registry,
            Ballot::new(addr("plat"), claim.clone(), Decision::Verify, truth(10)),
        )
        .unwrap();

    let outcome = h.engine.resolve_with_validators(&claim, &mut registry).unwrap();
    // 15 × 1.25 × 1.5 × 1.2
    assert_eq!(outcome.voters[0].reward, TruthAmount::new(33_750_000));
    assert_eq!(registry.ranking(&addr("plat")).unwrap().reputation, 1_015);
}
