//! Validator tiers, their accumulated privileges, and the validator registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use truth_types::{TxHash, ValidatorTier, WalletAddress};

use crate::error::RegistryError;

/// A capability granted by a validator tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeKind {
    PriorityVoting,
    ReducedStake,
    BonusRewards,
    RegionalAuthority,
    DisputeResolution,
}

impl PrivilegeKind {
    /// The tier that first grants this privilege.
    pub fn granted_at(&self) -> ValidatorTier {
        match self {
            Self::PriorityVoting => ValidatorTier::Silver,
            Self::ReducedStake => ValidatorTier::Gold,
            Self::BonusRewards => ValidatorTier::Platinum,
            Self::RegionalAuthority | Self::DisputeResolution => ValidatorTier::Diamond,
        }
    }

    /// Multiplier attached to the privilege, in basis points.
    pub fn multiplier_bps(&self) -> u32 {
        match self {
            Self::PriorityVoting => 12_000,
            Self::ReducedStake => 5_000,
            Self::BonusRewards => 15_000,
            Self::RegionalAuthority => 25_000,
            Self::DisputeResolution => 30_000,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PriorityVoting => "Priority in voting queues",
            Self::ReducedStake => "50% reduced minimum stake",
            Self::BonusRewards => "50% bonus on all rewards",
            Self::RegionalAuthority => "Regional validation authority",
            Self::DisputeResolution => "Can resolve high-stakes disputes",
        }
    }
}

/// Lowest tier first, in the order privileges accumulate.
const PRIVILEGES: [PrivilegeKind; 5] = [
    PrivilegeKind::PriorityVoting,
    PrivilegeKind::ReducedStake,
    PrivilegeKind::BonusRewards,
    PrivilegeKind::RegionalAuthority,
    PrivilegeKind::DisputeResolution,
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPrivilege {
    pub kind: PrivilegeKind,
    pub description: String,
    pub multiplier_bps: u32,
}

impl From<PrivilegeKind> for ValidatorPrivilege {
    fn from(kind: PrivilegeKind) -> Self {
        Self {
            kind,
            description: kind.description().to_string(),
            multiplier_bps: kind.multiplier_bps(),
        }
    }
}

/// Every privilege held at `tier`: its own plus those of all lower tiers.
pub fn privileges_for(tier: ValidatorTier) -> Vec<ValidatorPrivilege> {
    PRIVILEGES
        .iter()
        .filter(|kind| kind.granted_at() <= tier)
        .map(|kind| ValidatorPrivilege::from(*kind))
        .collect()
}

/// Whether `tier` holds `kind`.
pub fn holds_privilege(tier: ValidatorTier, kind: PrivilegeKind) -> bool {
    kind.granted_at() <= tier
}

/// Reputation a validator starts with at `tier`.
pub fn initial_reputation(tier: ValidatorTier) -> u64 {
    match tier {
        ValidatorTier::Bronze => 100,
        ValidatorTier::Silver => 250,
        ValidatorTier::Gold => 500,
        ValidatorTier::Platinum => 1_000,
        ValidatorTier::Diamond => 2_000,
    }
}

/// A registered validator and its track record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRanking {
    pub address: WalletAddress,
    pub tier: ValidatorTier,
    pub nft_id: String,
    /// Running average of correct validations, in basis points.
    pub accuracy_bps: u32,
    pub total_validations: u64,
    pub specializations: Vec<String>,
    pub region: String,
    pub reputation: u64,
    pub privileges: Vec<ValidatorPrivilege>,
}

impl ValidatorRanking {
    pub fn holds(&self, kind: PrivilegeKind) -> bool {
        self.privileges.iter().any(|p| p.kind == kind)
    }
}

/// Read access to validator tiers and regions, as consumed by voting.
pub trait ValidatorDirectory {
    fn tier_of(&self, address: &WalletAddress) -> Option<ValidatorTier>;
    fn region_of(&self, address: &WalletAddress) -> Option<&str>;
}

/// In-process registry of validators.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<WalletAddress, ValidatorRanking>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `address` at `tier`. One registration per address.
    pub fn register(
        &mut self,
        address: WalletAddress,
        tier: ValidatorTier,
        region: impl Into<String>,
        specializations: Vec<String>,
    ) -> Result<&ValidatorRanking, RegistryError> {
        if self.validators.contains_key(&address) {
            return Err(RegistryError::AlreadyRegistered(address.to_string()));
        }
        let region = region.into();
        let digest = TxHash::digest(&[
            b"validator-nft".as_slice(),
            address.as_str().as_bytes(),
            tier.as_str().as_bytes(),
            region.as_bytes(),
        ]);
        let nft_id = format!("nft_{}", &digest.to_string()[2..18]);
        tracing::info!(%address, %tier, %region, %nft_id, "validator registered");

        let ranking = ValidatorRanking {
            address: address.clone(),
            tier,
            nft_id,
            accuracy_bps: 0,
            total_validations: 0,
            specializations,
            region,
            reputation: initial_reputation(tier),
            privileges: privileges_for(tier),
        };
        Ok(self.validators.entry(address).or_insert(ranking))
    }

    pub fn ranking(&self, address: &WalletAddress) -> Option<&ValidatorRanking> {
        self.validators.get(address)
    }

    pub fn all(&self) -> Vec<&ValidatorRanking> {
        self.validators.values().collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validators in `region`, optionally restricted to a specialization.
    pub fn for_region(&self, region: &str, specialization: Option<&str>) -> Vec<&ValidatorRanking> {
        self.validators
            .values()
            .filter(|v| v.region == region)
            .filter(|v| specialization.map_or(true, |s| v.specializations.iter().any(|x| x == s)))
            .collect()
    }

    /// Fold one validation outcome into the validator's record.
    ///
    /// Correct: reputation +10, plus 5 when the claim's region is the
    /// validator's own. Wrong: reputation -5, floored at zero.
    pub fn record_validation(
        &mut self,
        address: &WalletAddress,
        was_correct: bool,
        claim_region: Option<&str>,
    ) -> Result<&ValidatorRanking, RegistryError> {
        let validator = self
            .validators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownValidator(address.to_string()))?;

        validator.total_validations += 1;
        let n = u128::from(validator.total_validations);
        let sample: u128 = if was_correct { 10_000 } else { 0 };
        validator.accuracy_bps =
            ((u128::from(validator.accuracy_bps) * (n - 1) + sample) / n) as u32;

        if was_correct {
            validator.reputation += 10;
            if claim_region == Some(validator.region.as_str()) {
                validator.reputation += 5;
            }
        } else {
            validator.reputation = validator.reputation.saturating_sub(5);
        }
        Ok(validator)
    }
}

impl ValidatorDirectory for ValidatorRegistry {
    fn tier_of(&self, address: &WalletAddress) -> Option<ValidatorTier> {
        self.validators.get(address).map(|v| v.tier)
    }

    fn region_of(&self, address: &WalletAddress) -> Option<&str> {
        self.validators.get(address).map(|v| v.region.as_str())
    }
}
