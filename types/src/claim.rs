//! Claims (submitted news articles), votes cast on them, and voting results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::WalletAddress;
use crate::amount::TruthAmount;
use crate::error::TruthError;
use crate::hash::TxHash;
use crate::tier::ValidatorTier;
use crate::time::Timestamp;

/// Identifier of a submitted claim, `claim_` followed by 16 hex digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimId(String);

impl ClaimId {
    pub const PREFIX: &'static str = "claim_";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Derive a claim id from the submission's identifying fields.
    ///
    /// `sequence` is the number of claims that existed before this one, which
    /// keeps ids unique even for identical submissions in the same second.
    pub fn derive(author: &WalletAddress, title: &str, created_at: Timestamp, sequence: u64) -> Self {
        let hash = TxHash::digest(&[
            author.as_str().as_bytes(),
            title.as_bytes(),
            &created_at.as_secs().to_be_bytes(),
            &sequence.to_be_bytes(),
        ]);
        Self(format!("{}{}", Self::PREFIX, hex::encode(&hash.as_bytes()[..8])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The author-supplied content of a claim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimContent {
    pub title: String,
    pub body: String,
    pub category: String,
    pub sources: Vec<String>,
}

/// Declared location of a claim, as reported by the location collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub region: String,
    pub country: String,
}

/// A submitted claim. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub author: WalletAddress,
    pub content: ClaimContent,
    pub location: Option<Location>,
    pub created_at: Timestamp,
    /// The submission fee actually charged (after the reputation discount).
    pub submission_stake: TruthAmount,
}

/// A voter's decision on a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// The claim is accurate.
    Verify,
    /// The claim is false or misleading.
    Dispute,
}

impl FromStr for Decision {
    type Err = TruthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verify" => Ok(Self::Verify),
            "dispute" => Ok(Self::Dispute),
            _ => Err(TruthError::InvalidDecision(s.to_string())),
        }
    }
}

/// A stake-backed vote on a claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: WalletAddress,
    pub claim_id: ClaimId,
    pub decision: Decision,
    pub justification: String,
    pub stake: TruthAmount,
    pub timestamp: Timestamp,
    /// Validator tier held when the vote was cast.
    pub validator_tier: Option<ValidatorTier>,
    /// Whether the voter was a regional validator for this claim when casting.
    pub regional_validator: bool,
}

/// The settled (or projected) outcome of a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Verified,
    Disputed,
}

impl Verdict {
    /// Stake-weighted verdict. `Verified` requires strictly more verify stake;
    /// a tie is `Disputed`.
    pub fn from_stakes(verify_stake: TruthAmount, dispute_stake: TruthAmount) -> Self {
        if verify_stake > dispute_stake {
            Self::Verified
        } else {
            Self::Disputed
        }
    }

    /// The decision that wins under this verdict.
    pub fn winning_decision(&self) -> Decision {
        match self {
            Self::Verified => Decision::Verify,
            Self::Disputed => Decision::Dispute,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("verified"),
            Self::Disputed => f.write_str("disputed"),
        }
    }
}

/// Summary of a claim's vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingResult {
    pub claim_id: ClaimId,
    pub verify_votes: u32,
    pub dispute_votes: u32,
    pub total_stake: TruthAmount,
    /// `false` for a preview of an unresolved claim.
    pub is_resolved: bool,
    pub final_verdict: Verdict,
    pub reward_pool: TruthAmount,
}
