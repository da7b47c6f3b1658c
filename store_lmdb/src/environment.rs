//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::migration::Migrator;
use crate::LmdbError;

/// Databases every TRUTH environment holds.
pub(crate) const DATABASES: &[&str] = &["accounts", "claims", "claim_index", "transactions", "meta"];

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// An open LMDB environment implementing every TRUTH store trait.
///
/// - `accounts`: address → `AccountBalance`
/// - `claims`: claim id → `ClaimRecord` with its ordered votes
/// - `claim_index`: big-endian insertion number → claim id
/// - `transactions`: big-endian sequence → `TransactionRecord`
/// - `meta`: supply state and schema version
pub struct LmdbStore {
    pub(crate) env: Arc<Env>,
    pub(crate) path: PathBuf,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
    pub(crate) claims_db: Database<Bytes, Bytes>,
    pub(crate) claim_index_db: Database<Bytes, Bytes>,
    pub(crate) transactions_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create an environment at `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    /// Open or create an environment at `path`.
    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never accessed outside heed's transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(DATABASES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let accounts_db = env.create_database(&mut wtxn, Some("accounts"))?;
        let claims_db = env.create_database(&mut wtxn, Some("claims"))?;
        let claim_index_db = env.create_database(&mut wtxn, Some("claim_index"))?;
        let transactions_db = env.create_database(&mut wtxn, Some("transactions"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let store = Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
            accounts_db,
            claims_db,
            claim_index_db,
            transactions_db,
            meta_db,
        };
        Migrator::run(&store)?;
        tracing::info!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }
}
