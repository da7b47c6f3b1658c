//! Fundamental types for the TRUTH news-verification engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, fixed-point amounts, timestamps, hashes, claim and vote records,
//! transaction records, tier enums and the tokenomics policy.

pub mod address;
pub mod amount;
pub mod claim;
pub mod error;
pub mod hash;
pub mod params;
pub mod tier;
pub mod time;
pub mod transaction;

pub use address::{Counterparty, WalletAddress};
pub use amount::{TruthAmount, BPS_DENOMINATOR, TRUTH_UNIT};
pub use claim::{
    Claim, ClaimContent, ClaimId, Decision, Location, Verdict, Vote, VotingResult,
};
pub use error::TruthError;
pub use hash::TxHash;
pub use params::Tokenomics;
pub use tier::{ReputationTier, ValidatorTier};
pub use time::{Clock, SystemClock, Timestamp};
pub use transaction::{TransactionKind, TransactionRecord};
