//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use truth_types::{Tokenomics, TruthAmount};
use truth_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the TRUTH daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; every field
/// has a default so an empty file is valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Overrides applied over the TRUTH default tokenomics.
    #[serde(default)]
    pub tokenomics: TokenomicsOverrides,
}

/// Optional tokenomics overrides. Amounts are whole TRUTH, rates are basis points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenomicsOverrides {
    pub total_supply: Option<u64>,
    pub circulating_supply: Option<u64>,
    pub treasury_pool: Option<u64>,
    pub starting_balance: Option<u64>,
    pub submission_cost: Option<u64>,
    pub truthful_submission_bonus: Option<u64>,
    pub minimum_vote_stake: Option<u64>,

    pub false_submission_penalty_bps: Option<u32>,
    pub reward_multiplier_bps: Option<u32>,
    pub early_voter_bonus_bps: Option<u32>,
    pub early_voter_slots: Option<u32>,
    pub consecutive_accuracy_bonus_bps: Option<u32>,
    pub consecutive_bonus_cap_bps: Option<u32>,
    pub premium_validator_multiplier_bps: Option<u32>,
    pub regional_validator_multiplier_bps: Option<u32>,
    pub reputation_threshold_bps: Option<u32>,
    pub penalty_rate_bps: Option<u32>,
    pub max_penalty_rate_bps: Option<u32>,
    pub penalty_escalation_after: Option<u32>,
    pub penalty_escalation_step_bps: Option<u32>,
    pub burn_rate_bps: Option<u32>,
}

impl TokenomicsOverrides {
    /// Apply every set override to `base`.
    pub fn apply(&self, mut base: Tokenomics) -> Tokenomics {
        let amounts = [
            (self.total_supply, &mut base.total_supply),
            (self.circulating_supply, &mut base.circulating_supply),
            (self.treasury_pool, &mut base.treasury_pool),
            (self.starting_balance, &mut base.starting_balance),
            (self.submission_cost, &mut base.submission_cost),
            (self.truthful_submission_bonus, &mut base.truthful_submission_bonus),
            (self.minimum_vote_stake, &mut base.minimum_vote_stake),
        ];
        for (value, slot) in amounts {
            if let Some(tokens) = value {
                *slot = TruthAmount::from_truth(u128::from(tokens));
            }
        }

        let scalars = [
            (self.false_submission_penalty_bps, &mut base.false_submission_penalty_bps),
            (self.reward_multiplier_bps, &mut base.reward_multiplier_bps),
            (self.early_voter_bonus_bps, &mut base.early_voter_bonus_bps),
            (self.early_voter_slots, &mut base.early_voter_slots),
            (self.consecutive_accuracy_bonus_bps, &mut base.consecutive_accuracy_bonus_bps),
            (self.consecutive_bonus_cap_bps, &mut base.consecutive_bonus_cap_bps),
            (self.premium_validator_multiplier_bps, &mut base.premium_validator_multiplier_bps),
            (self.regional_validator_multiplier_bps, &mut base.regional_validator_multiplier_bps),
            (self.reputation_threshold_bps, &mut base.reputation_threshold_bps),
            (self.penalty_rate_bps, &mut base.penalty_rate_bps),
            (self.max_penalty_rate_bps, &mut base.max_penalty_rate_bps),
            (self.penalty_escalation_after, &mut base.penalty_escalation_after),
            (self.penalty_escalation_step_bps, &mut base.penalty_escalation_step_bps),
            (self.burn_rate_bps, &mut base.burn_rate_bps),
        ];
        for (value, slot) in scalars {
            if let Some(v) = value {
                *slot = v;
            }
        }
        base
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./truth_data")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// The effective tokenomics: TRUTH defaults with overrides applied, validated.
    pub fn tokenomics(&self) -> Result<Tokenomics, ConfigError> {
        let tokenomics = self.tokenomics.apply(Tokenomics::truth_defaults());
        tokenomics
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(tokenomics)
    }

    /// LMDB map size in bytes.
    pub fn map_size_bytes(&self) -> Result<usize, ConfigError> {
        if self.map_size_mb == 0 {
            return Err(ConfigError::Invalid("map_size_mb must be positive".into()));
        }
        self.map_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::Invalid(format!("map_size_mb {} is too large", self.map_size_mb)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map_size_bytes()?;
        self.tokenomics()?;
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            tokenomics: TokenomicsOverrides::default(),
        }
    }
}
