//! The TRUTH ledger: the single source of truth for balances and the
//! transaction log.
//!
//! Every mutation is staged in a [`LedgerBatch`] and becomes visible only when
//! the batch is committed, in one atomic store write. Dropping a batch discards
//! it without a trace.

pub mod audit;
pub mod batch;
pub mod error;
pub mod ledger;

pub use audit::SupplyAudit;
pub use batch::LedgerBatch;
pub use error::LedgerError;
pub use ledger::Ledger;
