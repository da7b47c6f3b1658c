//! LMDB implementation of AccountStore.

use heed::RwTxn;

use truth_store::{AccountBalance, AccountStore, StoreError};
use truth_types::WalletAddress;

use crate::codec::{decode, encode};
use crate::environment::LmdbStore;
use crate::LmdbError;

impl LmdbStore {
    pub(crate) fn write_account(
        &self,
        wtxn: &mut RwTxn<'_>,
        account: &AccountBalance,
    ) -> Result<(), LmdbError> {
        let bytes = encode(account)?;
        self.accounts_db
            .put(wtxn, account.address.as_str().as_bytes(), &bytes)?;
        Ok(())
    }
}

impl AccountStore for LmdbStore {
    fn get_account(&self, address: &WalletAddress) -> Result<Option<AccountBalance>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .accounts_db
            .get(&rtxn, address.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_account(&self, account: &AccountBalance) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.write_account(&mut wtxn, account)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountBalance>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut accounts = Vec::new();
        for entry in self.accounts_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            accounts.push(decode(bytes)?);
        }
        Ok(accounts)
    }
}
