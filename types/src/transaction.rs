//! Append-only ledger transaction records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{Counterparty, WalletAddress};
use crate::amount::TruthAmount;
use crate::claim::ClaimId;
use crate::hash::TxHash;
use crate::time::Timestamp;

/// What a ledger movement was for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Submission,
    VoteStake,
    Reward,
    Penalty,
    Burn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::VoteStake => "vote_stake",
            Self::Reward => "reward",
            Self::Penalty => "penalty",
            Self::Burn => "burn",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit-log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Position in the log, starting at 1.
    pub sequence: u64,
    pub id: String,
    pub kind: TransactionKind,
    pub amount: TruthAmount,
    pub from: Counterparty,
    pub to: Counterparty,
    pub claim_id: Option<ClaimId>,
    pub timestamp: Timestamp,
    /// Blake2b-256 over every other field.
    pub hash: TxHash,
}

impl TransactionRecord {
    pub fn new(
        sequence: u64,
        kind: TransactionKind,
        amount: TruthAmount,
        from: Counterparty,
        to: Counterparty,
        claim_id: Option<ClaimId>,
        timestamp: Timestamp,
    ) -> Self {
        let id = format!("tx_{:08}", sequence);
        let from_str = from.to_string();
        let to_str = to.to_string();
        let claim_str = claim_id.as_ref().map(ClaimId::as_str).unwrap_or("");
        let hash = TxHash::digest(&[
            id.as_bytes(),
            kind.as_str().as_bytes(),
            &amount.raw().to_be_bytes(),
            from_str.as_bytes(),
            to_str.as_bytes(),
            claim_str.as_bytes(),
            &timestamp.as_secs().to_be_bytes(),
        ]);
        Self {
            sequence,
            id,
            kind,
            amount,
            from,
            to,
            claim_id,
            timestamp,
            hash,
        }
    }

    /// Whether `address` is the source or destination of this record.
    pub fn involves(&self, address: &WalletAddress) -> bool {
        self.from.is(address) || self.to.is(address)
    }
}
