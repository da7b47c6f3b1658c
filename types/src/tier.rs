//! Reputation tiers (earned by voting accuracy) and validator tiers (held via NFT).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TruthError;

/// Reputation tier derived from a participant's accuracy and vote count.
///
/// Ordered from lowest to highest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReputationTier {
    #[default]
    Novice,
    Trusted,
    Expert,
    Authority,
}

impl ReputationTier {
    /// Discount on the submission fee, in basis points.
    pub fn submission_discount_bps(&self) -> u32 {
        match self {
            Self::Authority => 5_000,
            Self::Expert => 3_000,
            Self::Trusted => 1_500,
            Self::Novice => 0,
        }
    }

    /// Multiplier applied to a winning voter's reward, in basis points.
    pub fn reward_multiplier_bps(&self) -> u32 {
        match self {
            Self::Authority => 13_000,
            Self::Expert => 12_000,
            Self::Trusted => 11_000,
            Self::Novice => 10_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "Novice",
            Self::Trusted => "Trusted",
            Self::Expert => "Expert",
            Self::Authority => "Authority",
        }
    }
}

impl fmt::Display for ReputationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator tier attached to a validator NFT.
///
/// Ordered from lowest to highest; each tier's privileges are a superset of
/// the tier below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidatorTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl ValidatorTier {
    /// All tiers, lowest first.
    pub const ALL: [ValidatorTier; 5] = [
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for ValidatorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorTier {
    type Err = TruthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TruthError::InvalidTier(s.to_string()))
    }
}
