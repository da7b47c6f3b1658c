//! Transaction log trait.

use crate::StoreError;
use truth_types::{TransactionRecord, WalletAddress};

/// Append-only transaction log. Records are keyed by their sequence number.
pub trait TransactionLog {
    /// Append a record. Fails with [`StoreError::Duplicate`] if its sequence is taken.
    fn append_transaction(&self, record: &TransactionRecord) -> Result<(), StoreError>;

    /// Number of records in the log (also the highest sequence number).
    fn transaction_count(&self) -> Result<u64, StoreError>;

    /// All records in sequence order.
    fn iter_transactions(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Records where `address` is source or destination, in sequence order.
    fn account_transactions(
        &self,
        address: &WalletAddress,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self
            .iter_transactions()?
            .into_iter()
            .filter(|tx| tx.involves(address))
            .collect())
    }
}
