//! LMDB implementation of TransactionLog.

use heed::RwTxn;

use truth_store::{StoreError, TransactionLog};
use truth_types::TransactionRecord;

use crate::codec::{decode, encode, parse_sequence_key, sequence_key};
use crate::environment::LmdbStore;
use crate::LmdbError;

impl LmdbStore {
    /// Highest sequence in the log, or 0 when empty.
    pub(crate) fn last_sequence(&self, rtxn: &heed::RoTxn<'_>) -> Result<u64, LmdbError> {
        match self.transactions_db.last(rtxn)? {
            Some((key, _)) => parse_sequence_key(key),
            None => Ok(0),
        }
    }

    /// Append `record`, which must carry the next contiguous sequence.
    pub(crate) fn append_in(
        &self,
        wtxn: &mut RwTxn<'_>,
        record: &TransactionRecord,
    ) -> Result<(), StoreError> {
        let expected = self.last_sequence(wtxn)? + 1;
        if record.sequence != expected {
            return Err(StoreError::Duplicate(format!(
                "transaction sequence {} (next free is {expected})",
                record.sequence
            )));
        }
        let bytes = encode(record)?;
        self.transactions_db
            .put(wtxn, sequence_key(record.sequence).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

impl TransactionLog for LmdbStore {
    fn append_transaction(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.append_in(&mut wtxn, record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.last_sequence(&rtxn)?)
    }

    fn iter_transactions(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in self.transactions_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            records.push(decode(bytes)?);
        }
        Ok(records)
    }
}
