//! LMDB implementation of SupplyStore. The record is a single `meta` entry.

use heed::RwTxn;

use truth_store::{StoreError, SupplyState, SupplyStore};

use crate::codec::{decode, encode};
use crate::environment::LmdbStore;
use crate::LmdbError;

pub(crate) const SUPPLY_KEY: &[u8] = b"supply";

impl LmdbStore {
    pub(crate) fn read_supply(&self, rtxn: &heed::RoTxn<'_>) -> Result<Option<SupplyState>, LmdbError> {
        match self.meta_db.get(rtxn, SUPPLY_KEY)? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn write_supply(
        &self,
        wtxn: &mut RwTxn<'_>,
        supply: &SupplyState,
    ) -> Result<(), LmdbError> {
        let bytes = encode(supply)?;
        self.meta_db.put(wtxn, SUPPLY_KEY, &bytes)?;
        Ok(())
    }
}

impl SupplyStore for LmdbStore {
    fn get_supply(&self) -> Result<Option<SupplyState>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_supply(&rtxn)?)
    }

    fn put_supply(&self, supply: &SupplyState) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.write_supply(&mut wtxn, supply)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
