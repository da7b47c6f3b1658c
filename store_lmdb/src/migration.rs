//! Schema version tracking.
//!
//! The version lives in the `meta` database. A fresh environment is stamped
//! with the current version; one written by a newer build is refused.

use crate::environment::LmdbStore;
use crate::LmdbError;

/// The schema version this build reads and writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub(crate) const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

pub struct Migrator;

impl Migrator {
    /// Check the stored schema version, stamping fresh environments.
    pub fn run(store: &LmdbStore) -> Result<(), LmdbError> {
        let current = Self::stored_version(store)?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::debug!(version = current, "database schema is up to date");
            return Ok(());
        }
        if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::UnsupportedSchema {
                found: current,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        let mut wtxn = store.env.write_txn()?;
        store
            .meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION.to_be_bytes())?;
        wtxn.commit()?;
        tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "schema version stamped");
        Ok(())
    }

    /// Stored version, or 0 for a fresh environment.
    pub fn stored_version(store: &LmdbStore) -> Result<u32, LmdbError> {
        let rtxn = store.env.read_txn()?;
        match store.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            None => Ok(0),
            Some(bytes) => {
                let arr: [u8; 4] = bytes
                    .try_into()
                    .map_err(|_| LmdbError::Corruption("invalid schema version length".into()))?;
                Ok(u32::from_be_bytes(arr))
            }
        }
    }
}
