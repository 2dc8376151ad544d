//! Error types for the migration engine.

use ms_store::StoreError;
use thiserror::Error;

/// Failure raised by a migration's forward or reverse action.
#[derive(Error, Debug)]
pub enum SchemaChangeError {
    /// A statement was rejected by the store.
    #[error("schema statement failed")]
    Statement(#[from] StoreError),

    /// The migration refused to run for a reason of its own.
    #[error("{0}")]
    Rejected(String),
}

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The persisted store could not be reached (MG001).
    #[error("[MG001] Cannot connect to the persisted store")]
    Connection(#[source] StoreError),

    /// The ledger table could not be created (MG002).
    #[error("[MG002] Failed to initialise the migration ledger")]
    LedgerInit(#[source] StoreError),

    /// Reading or writing the ledger failed (MG003).
    #[error("[MG003] Migration ledger access failed")]
    Ledger(#[source] StoreError),

    /// An id was recorded twice (MG004).
    #[error("[MG004] Migration {id} is already recorded in the ledger")]
    DuplicateLedgerEntry { id: String },

    /// Removing an id the ledger does not hold (MG005).
    #[error("[MG005] Migration {id} is not recorded in the ledger")]
    LedgerEntryMissing { id: String },

    /// A forward or reverse action failed (MG006).
    #[error("[MG006] Schema change failed")]
    SchemaChange(#[from] SchemaChangeError),

    /// A pending migration or its ledger write failed; nothing was kept (MG007).
    #[error("[MG007] Migration {id} failed")]
    MigrationApply {
        id: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// Reverting the latest migration failed; ledger and schema untouched (MG008).
    #[error("[MG008] Rollback of migration {id} failed")]
    MigrationRollback {
        id: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// The ledger holds an id no registered migration carries (MG009).
    #[error(
        "[MG009] Migration {id} is recorded in the ledger but not registered; \
         the binary is older than the schema history"
    )]
    MigrationMissing { id: String },

    /// Two registered migrations share an id (MG010).
    #[error("[MG010] Duplicate migration id: {id}")]
    DuplicateIdentifier { id: String },

    /// A registered id does not follow the sortable id scheme (MG011).
    #[error("[MG011] Invalid migration id '{id}': {reason}")]
    InvalidIdentifier { id: String, reason: String },

    /// Cancellation was requested between two migrations (MG012).
    #[error("[MG012] Cancelled before {remaining} pending migration(s) could run")]
    Cancelled { remaining: usize },

    /// Opening or committing a transaction failed (MG013).
    #[error("[MG013] Store transaction failed")]
    Store(#[from] StoreError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Id of the migration this error is about, if any.
    pub fn migration_id(&self) -> Option<&str> {
        match self {
            MigrateError::DuplicateLedgerEntry { id }
            | MigrateError::LedgerEntryMissing { id }
            | MigrateError::MigrationApply { id, .. }
            | MigrateError::MigrationRollback { id, .. }
            | MigrateError::MigrationMissing { id }
            | MigrateError::DuplicateIdentifier { id }
            | MigrateError::InvalidIdentifier { id, .. } => Some(id),
            _ => None,
        }
    }
}
