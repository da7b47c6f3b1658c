//! Reputation classification from voting accuracy.

use truth_store::AccountBalance;
use truth_types::ReputationTier;

/// Minimum votes and accuracy (bps) per tier, highest first.
const THRESHOLDS: [(ReputationTier, u64, u32); 3] = [
    (ReputationTier::Authority, 100, 9_500),
    (ReputationTier::Expert, 50, 9_000),
    (ReputationTier::Trusted, 20, 8_000),
];

/// The tier earned by `accuracy_bps` over `total_votes`. First match wins.
pub fn classify(accuracy_bps: u32, total_votes: u64) -> ReputationTier {
    THRESHOLDS
        .iter()
        .find(|(_, votes, accuracy)| total_votes >= *votes && accuracy_bps >= *accuracy)
        .map(|(tier, _, _)| *tier)
        .unwrap_or(ReputationTier::Novice)
}

/// `successful / total` in basis points, floored. Zero when there are no votes.
pub fn accuracy_bps(successful_votes: u64, total_votes: u64) -> u32 {
    if total_votes == 0 {
        return 0;
    }
    let bps = u128::from(successful_votes.min(total_votes)) * 10_000 / u128::from(total_votes);
    bps as u32
}

/// Recompute the account's accuracy and tier from its counters.
///
/// Returns `true` when the tier changed.
pub fn reclassify(account: &mut AccountBalance) -> bool {
    account.accuracy_bps = accuracy_bps(account.successful_votes, account.total_votes);
    let tier = classify(account.accuracy_bps, account.total_votes);
    if tier == account.reputation {
        return false;
    }
    tracing::debug!(
        address = %account.address,
        from = %account.reputation,
        to = %tier,
        "reputation tier changed"
    );
    account.reputation = tier;
    true
}
