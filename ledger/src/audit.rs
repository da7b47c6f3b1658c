//! Supply conservation audit.

use serde::{Deserialize, Serialize};
use truth_types::TruthAmount;

/// Where every token currently sits, and where it should sum to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyAudit {
    pub accounts: u64,
    /// Σ spendable + staked over all accounts.
    pub account_holdings: TruthAmount,
    pub treasury: TruthAmount,
    pub burned: TruthAmount,
    /// Σ starting balances handed out.
    pub issued: TruthAmount,
    /// Treasury funding recorded at genesis.
    pub genesis_treasury: TruthAmount,
    /// Rewards paid beyond what the treasury held.
    pub minted: TruthAmount,
}

impl SupplyAudit {
    /// What the ledger must add up to.
    pub fn expected_total(&self) -> TruthAmount {
        self.issued + self.genesis_treasury + self.minted
    }

    /// What the ledger actually adds up to.
    pub fn actual_total(&self) -> TruthAmount {
        self.account_holdings + self.treasury + self.burned
    }

    pub fn is_balanced(&self) -> bool {
        self.expected_total() == self.actual_total()
    }
}
