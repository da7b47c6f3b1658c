//! Drives the `truth-daemon` binary against a temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn daemon(data_dir: &Path, args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_truth-daemon"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--log-level")
        .arg("warn")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("daemon runs");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn daemon_fails(data_dir: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_truth-daemon"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("daemon runs");
    assert!(!output.status.success(), "{args:?} unexpectedly succeeded");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn claim_lifecycle_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");

    let submitted = daemon(&data, &["submit", "--author", "addr1author", "--title", "Dam released water"]);
    let claim = submitted["claim_id"].as_str().unwrap().to_string();
    assert!(claim.starts_with("claim_"));

    for (voter, decision) in [("addr1a", "verify"), ("addr1b", "verify"), ("addr1c", "verify"), ("addr1d", "dispute")] {
        daemon(&data, &["vote", "--voter", voter, "--claim", &claim, "--decision", decision, "--stake", "10"]);
    }
    assert_eq!(daemon(&data, &["votes", &claim]).as_array().unwrap().len(), 4);

    let preview = daemon(&data, &["result", &claim]);
    assert_eq!(preview["is_resolved"], Value::Bool(false));

    let outcome = daemon(&data, &["resolve", &claim]);
    assert_eq!(outcome["result"]["final_verdict"], "Verified");
    assert_eq!(outcome["result"]["verify_votes"], 3);

    let result = daemon(&data, &["result", &claim]);
    assert_eq!(result["is_resolved"], Value::Bool(true));

    let claims = daemon(&data, &["claims"]);
    assert_eq!(claims.as_array().unwrap().len(), 1);
    assert_eq!(claims[0]["id"], claim.as_str());

    let history = daemon(&data, &["history", "--address", "addr1d"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["kind"], "vote_stake");

    let audit = daemon(&data, &["audit"]);
    assert_eq!(audit["balanced"], Value::Bool(true));
    assert_eq!(audit["expected_total"], audit["actual_total"]);
    assert_eq!(audit["minted"], 0);

    let err = daemon_fails(&data, &["resolve", &claim]);
    assert!(err.contains("already been resolved"), "{err}");
}

#[test]
fn config_file_overrides_tokenomics() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("truth.toml");
    std::fs::write(&config, "[tokenomics]\nsubmission_cost = 40\n").unwrap();
    let data = dir.path().join("data");

    // Amounts are printed in micro-TRUTH.
    let tokenomics = daemon(&data, &["--config", config.to_str().unwrap(), "tokenomics"]);
    assert_eq!(tokenomics["submission_cost"], 40_000_000u64);
    assert_eq!(tokenomics["minimum_vote_stake"], 10_000_000u64);

    let defaults = daemon(&data, &["tokenomics"]);
    assert_eq!(defaults["submission_cost"], 100_000_000u64);
}

#[test]
fn reopening_with_a_different_pool_stays_balanced() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    daemon(&data, &["submit", "--author", "addr1author", "--title", "Ferry cancelled"]);

    let config = dir.path().join("small-pool.toml");
    std::fs::write(&config, "[tokenomics]\ntreasury_pool = 50\n").unwrap();
    let audit = daemon(&data, &["--config", config.to_str().unwrap(), "audit"]);
    assert_eq!(audit["balanced"], Value::Bool(true));
    assert_eq!(audit["genesis_treasury"], 2_500_000_000_000u64);
}

#[test]
fn rejected_vote_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let err = daemon_fails(
        &data,
        &["vote", "--voter", "addr1a", "--claim", "claim_0000000000000000", "--decision", "verify", "--stake", "10"],
    );
    assert!(err.contains("claim not found"), "{err}");
}
