//! Schema migration engine for medsched.
//!
//! Applies registered migrations in ascending id order, each inside its own
//! transaction together with its ledger row, and reverts the most recently
//! applied one on request. The engine is generic over [`ms_store::Store`], so
//! any transactional backend can be substituted.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod registry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use engine::{
    ApplyReport, CancellationToken, Engine, MigrationStatus, Progress, RollbackOutcome,
};
pub use error::{MigrateError, MigrateResult, SchemaChangeError};
pub use ledger::LedgerEntry;
pub use migration::{Migration, SqlMigration};
pub use registry::{Registry, RegistryBuilder};
