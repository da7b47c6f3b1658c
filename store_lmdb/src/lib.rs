//! LMDB storage backend for the TRUTH engine.
//!
//! Implements all storage traits from `truth-store` using the `heed` LMDB bindings.
//! Each logical store maps to one or more LMDB databases within a single environment.

mod codec;

pub mod account;
pub mod claim;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod migration;
pub mod supply;
pub mod transaction;
pub mod write_batch;

pub use environment::{LmdbStore, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
