//! LMDB implementation of ClaimStore.
//!
//! Records live in `claims` keyed by claim id. `claim_index` maps a
//! big-endian insertion number to the id so iteration follows submission
//! order rather than id order.

use heed::RwTxn;

use truth_store::{ClaimRecord, ClaimStore, StoreError};
use truth_types::ClaimId;

use crate::codec::{decode, encode, sequence_key};
use crate::environment::LmdbStore;
use crate::LmdbError;

impl LmdbStore {
    pub(crate) fn write_claim(
        &self,
        wtxn: &mut RwTxn<'_>,
        record: &ClaimRecord,
    ) -> Result<(), LmdbError> {
        let key = record.id().as_str().as_bytes();
        let is_new = self.claims_db.get(wtxn, key)?.is_none();
        let bytes = encode(record)?;
        self.claims_db.put(wtxn, key, &bytes)?;
        if is_new {
            let position = self.claim_index_db.len(wtxn)?;
            self.claim_index_db
                .put(wtxn, sequence_key(position).as_slice(), key)?;
        }
        Ok(())
    }

    pub(crate) fn claim_is_resolved(
        &self,
        wtxn: &RwTxn<'_>,
        id: &ClaimId,
    ) -> Result<bool, LmdbError> {
        match self.claims_db.get(wtxn, id.as_str().as_bytes())? {
            Some(bytes) => Ok(decode::<ClaimRecord>(bytes)?.is_resolved()),
            None => Ok(false),
        }
    }
}

impl ClaimStore for LmdbStore {
    fn get_claim(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .claims_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_claim(&self, record: &ClaimRecord) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.write_claim(&mut wtxn, record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn claim_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.claims_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_claims(&self) -> Result<Vec<ClaimRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in self.claim_index_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, id) = entry.map_err(LmdbError::from)?;
            let bytes = self
                .claims_db
                .get(&rtxn, id)
                .map_err(LmdbError::from)?
                .ok_or_else(|| {
                    LmdbError::Corruption(format!(
                        "claim index points at missing claim {}",
                        String::from_utf8_lossy(id)
                    ))
                })?;
            records.push(decode(bytes)?);
        }
        Ok(records)
    }
}
