//! News verification for the TRUTH platform.
//!
//! Three stages settle a claim:
//! 1. **Submission**: an author pays a reputation-discounted fee into the
//!    treasury and opens a claim.
//! 2. **Voting**: participants lock stake behind a `verify` or `dispute` vote.
//! 3. **Resolution**: the claim is settled once by stake weight. Winners share
//!    a reward pool with compounding bonuses, losers forfeit part of their
//!    stake, and the author is rewarded or penalised.
//!
//! [`NewsVerification`] ties the stages to a ledger and a clock. Every
//! operation commits atomically or not at all.

pub mod engine;
pub mod error;
pub mod resolution;
pub mod stats;
pub mod submission;
pub mod voting;

pub use engine::NewsVerification;
pub use error::VerificationError;
pub use resolution::{
    compute_resolution, ResolutionOutcome, SubmitterOutcome, VoterOutcome, VoterSnapshot,
};
pub use stats::{EngineStats, StatsSnapshot};
pub use submission::{submission_fee, SubmissionService};
pub use voting::{minimum_stake, Ballot, VotingService};
