//! Participant addresses and ledger counterparties.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TruthError;

/// A participant address as supplied by the wallet/signer collaborator.
///
/// The engine treats the address as opaque; it only requires that it is
/// non-empty, free of whitespace, and does not collide with a ledger sentinel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create an address from a raw string without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an address.
    pub fn parse(raw: &str) -> Result<Self, TruthError> {
        let address = Self::new(raw.trim());
        if address.is_valid() {
            Ok(address)
        } else {
            Err(TruthError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && !self.0.chars().any(char::is_whitespace)
            && Counterparty::sentinel(&self.0).is_none()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The source or destination of a ledger movement.
///
/// Besides real accounts the ledger knows three sentinels: the platform
/// `treasury` pool, the `burn` sink, and `staked` (funds locked behind a vote).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counterparty {
    Account(WalletAddress),
    Treasury,
    Burn,
    Staked,
}

impl Counterparty {
    /// Resolve a sentinel name, if `name` is one.
    pub fn sentinel(name: &str) -> Option<Self> {
        match name {
            "treasury" => Some(Self::Treasury),
            "burn" => Some(Self::Burn),
            "staked" => Some(Self::Staked),
            _ => None,
        }
    }

    /// The account address, if this counterparty is a real account.
    pub fn account(&self) -> Option<&WalletAddress> {
        match self {
            Self::Account(address) => Some(address),
            _ => None,
        }
    }

    /// Whether this counterparty is the given account.
    pub fn is(&self, address: &WalletAddress) -> bool {
        self.account() == Some(address)
    }
}

impl From<WalletAddress> for Counterparty {
    fn from(address: WalletAddress) -> Self {
        Self::Account(address)
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(address) => write!(f, "{address}"),
            Self::Treasury => write!(f, "treasury"),
            Self::Burn => write!(f, "burn"),
            Self::Staked => write!(f, "staked"),
        }
    }
}
