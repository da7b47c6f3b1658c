//! Reputation for TRUTH participants.
//!
//! Two independent notions live here:
//! - the **reputation tier** every account earns through voting accuracy
//!   ([`classifier`]), which discounts submission fees and scales rewards;
//! - the **validator tier** a participant holds through a validator NFT
//!   ([`validators`]), which grants accumulated privileges.

pub mod classifier;
pub mod error;
pub mod validators;

pub use classifier::{accuracy_bps, classify, reclassify};
pub use error::RegistryError;
pub use validators::{
    holds_privilege, initial_reputation, privileges_for, PrivilegeKind, ValidatorDirectory,
    ValidatorPrivilege, ValidatorRanking, ValidatorRegistry,
};
