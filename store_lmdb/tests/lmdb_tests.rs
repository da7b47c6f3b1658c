//! The LMDB backend under the store contract and the full engine.

use std::sync::Arc;

use truth_nullables::NullClock;
use truth_store::{
    AccountBalance, AccountStore, ClaimRecord, ClaimStore, StoreBatch, StoreError, SupplyState,
    SupplyStore, TransactionLog, TruthStore,
};
use truth_store_lmdb::{check_integrity, LmdbStore, Migrator, CURRENT_SCHEMA_VERSION};
use truth_types::{
    Claim, ClaimContent, ClaimId, Counterparty, Decision, Timestamp, Tokenomics, TransactionKind,
    TransactionRecord, TruthAmount, Verdict, VotingResult, WalletAddress,
};
use truth_verification::{Ballot, NewsVerification};

fn addr(name: &str) -> WalletAddress {
    WalletAddress::new(format!("addr1{name}"))
}

fn claim(id: &str) -> ClaimRecord {
    ClaimRecord::open(Claim {
        id: ClaimId::new(id),
        author: addr("author"),
        content: ClaimContent {
            title: id.into(),
            ..Default::default()
        },
        location: None,
        created_at: Timestamp::new(1_700_000_000),
        submission_stake: TruthAmount::from_truth(100),
    })
}

fn tx(sequence: u64) -> TransactionRecord {
    TransactionRecord::new(
        sequence,
        TransactionKind::Submission,
        TruthAmount::from_truth(100),
        Counterparty::Account(addr("author")),
        Counterparty::Treasury,
        None,
        Timestamp::new(1_700_000_000 + sequence),
    )
}

fn supply(version: u64) -> SupplyState {
    SupplyState {
        version,
        ..SupplyState::genesis(TruthAmount::from_truth(1))
    }
}

fn resolved(mut record: ClaimRecord) -> ClaimRecord {
    record.result = Some(VotingResult {
        claim_id: record.id().clone(),
        verify_votes: 0,
        dispute_votes: 0,
        total_stake: TruthAmount::ZERO,
        is_resolved: true,
        final_verdict: Verdict::Disputed,
        reward_pool: TruthAmount::ZERO,
    });
    record
}

#[test]
fn fresh_store_is_stamped_and_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    assert_eq!(Migrator::stored_version(&store).unwrap(), CURRENT_SCHEMA_VERSION);
    assert_eq!(store.account_count().unwrap(), 0);
    assert_eq!(store.transaction_count().unwrap(), 0);
    assert!(store.get_supply().unwrap().is_none());
}

#[test]
fn claims_iterate_in_submission_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    for id in ["claim_zz", "claim_aa", "claim_mm"] {
        store.put_claim(&claim(id)).unwrap();
    }
    // Rewriting a claim keeps its original position.
    store.put_claim(&resolved(claim("claim_zz"))).unwrap();

    let ids: Vec<String> = store
        .iter_claims()
        .unwrap()
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(ids, ["claim_zz", "claim_aa", "claim_mm"]);
    assert_eq!(store.claim_count().unwrap(), 3);
    assert!(store.get_claim(&ClaimId::new("claim_zz")).unwrap().unwrap().is_resolved());
}

#[test]
fn transaction_log_must_be_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    store.append_transaction(&tx(1)).unwrap();
    assert!(matches!(store.append_transaction(&tx(1)), Err(StoreError::Duplicate(_))));
    assert!(matches!(store.append_transaction(&tx(3)), Err(StoreError::Duplicate(_))));
    store.append_transaction(&tx(2)).unwrap();

    let sequences: Vec<u64> = store.iter_transactions().unwrap().iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, [1, 2]);
    assert_eq!(store.account_transactions(&addr("author")).unwrap().len(), 2);
    assert!(store.account_transactions(&addr("nobody")).unwrap().is_empty());
}

#[test]
fn failed_batch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    store.append_transaction(&tx(1)).unwrap();

    let batch = StoreBatch {
        accounts: vec![AccountBalance::new(addr("a"), TruthAmount::from_truth(1000))],
        claims: vec![claim("claim_01")],
        // Sequence 5 leaves a gap after 3.
        transactions: vec![tx(2), tx(3), tx(5)],
        supply: Some(supply(1)),
        resolves: None,
    };
    assert!(matches!(store.commit_batch(batch), Err(StoreError::Duplicate(_))));

    assert_eq!(store.transaction_count().unwrap(), 1);
    assert!(store.get_account(&addr("a")).unwrap().is_none());
    assert!(store.get_claim(&ClaimId::new("claim_01")).unwrap().is_none());
    assert!(store.get_supply().unwrap().is_none());
    assert!(check_integrity(&store).unwrap().is_healthy());
}

#[test]
fn stale_supply_write_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    let first = StoreBatch {
        accounts: vec![AccountBalance::new(addr("a"), TruthAmount::from_truth(1000))],
        supply: Some(supply(1)),
        ..Default::default()
    };
    store.commit_batch(first).unwrap();

    // A second writer that read the supply before the first commit.
    let second = StoreBatch {
        accounts: vec![AccountBalance::new(addr("b"), TruthAmount::from_truth(1000))],
        supply: Some(supply(1)),
        ..Default::default()
    };
    assert!(matches!(store.commit_batch(second), Err(StoreError::Stale(_))));
    assert!(store.get_account(&addr("b")).unwrap().is_none());
    assert_eq!(store.get_supply().unwrap().unwrap().version, 1);
}

#[test]
fn resolution_fence_rejects_second_commit() {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    let id = ClaimId::new("claim_01");
    store.put_claim(&claim("claim_01")).unwrap();

    let first = StoreBatch {
        claims: vec![resolved(claim("claim_01"))],
        resolves: Some(id.clone()),
        ..Default::default()
    };
    store.commit_batch(first).unwrap();

    let second = StoreBatch {
        accounts: vec![AccountBalance::new(addr("late"), TruthAmount::from_truth(1000))],
        resolves: Some(id),
        ..Default::default()
    };
    assert!(matches!(store.commit_batch(second), Err(StoreError::Conflict(_))));
    assert!(store.get_account(&addr("late")).unwrap().is_none());
}

#[test]
fn engine_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let stake = TruthAmount::from_truth(10);

    let (claim_id, balances, tx_count) = {
        let store = Arc::new(LmdbStore::open(dir.path()).unwrap());
        let mut engine = NewsVerification::new(store, Tokenomics::default(), clock.clone()).unwrap();
        let claim_id = engine
            .submit(ClaimContent { title: "bridge closed".into(), ..Default::default() }, &addr("author"), None)
            .unwrap();
        for voter in ["a", "b", "c"] {
            clock.advance(5);
            engine
                .vote(Ballot::new(addr(voter), claim_id.clone(), Decision::Verify, stake))
                .unwrap();
        }
        clock.advance(5);
        engine
            .vote(Ballot::new(addr("d"), claim_id.clone(), Decision::Dispute, stake))
            .unwrap();
        let result = engine.resolve(&claim_id).unwrap();
        assert_eq!(result.final_verdict, Verdict::Verified);
        assert!(engine.audit().unwrap().is_balanced());

        let balances: Vec<_> = ["author", "a", "b", "c", "d"]
            .iter()
            .map(|n| engine.peek_balance(&addr(n)).unwrap().unwrap())
            .collect();
        let tx_count = engine.transaction_history(None).unwrap().len();
        (claim_id, balances, tx_count)
    };

    let store = Arc::new(LmdbStore::open(dir.path()).unwrap());
    assert!(check_integrity(&store).unwrap().is_healthy());
    let mut engine = NewsVerification::new(store, Tokenomics::default(), clock).unwrap();

    for before in &balances {
        assert_eq!(&engine.peek_balance(&before.address).unwrap().unwrap(), before);
    }
    assert_eq!(engine.transaction_history(None).unwrap().len(), tx_count);
    assert!(engine.voting_result(&claim_id).unwrap().unwrap().is_resolved);
    assert!(engine.audit().unwrap().is_balanced());
    assert!(engine.resolve(&claim_id).is_err());
}
