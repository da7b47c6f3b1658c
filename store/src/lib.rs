//! Abstract storage traits for the TRUTH engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod account;
pub mod batch;
pub mod claim;
pub mod error;
pub mod supply;
pub mod transaction;

pub use account::{AccountBalance, AccountStore};
pub use batch::{StoreBatch, TruthStore};
pub use claim::{ClaimRecord, ClaimStore};
pub use error::StoreError;
pub use supply::{SupplyState, SupplyStore};
pub use transaction::TransactionLog;
