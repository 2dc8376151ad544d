//! Migration descriptor contract.

use crate::error::SchemaChangeError;
use ms_store::Executor;

/// A named unit of forward schema change and its exact inverse.
///
/// Ids sort lexicographically in authoring order (zero-padded sequence
/// numbers or timestamps, optionally followed by `_name`). The engine invokes
/// [`Migration::apply`] at most once per id and [`Migration::revert`] only for
/// the most recently applied id, always inside a transaction.
pub trait Migration: Send + Sync {
    /// Stable, globally unique id.
    fn id(&self) -> &str;

    /// Human label, the part of the id after the numeric prefix by default.
    fn description(&self) -> &str {
        self.id().split_once('_').map_or("", |(_, rest)| rest)
    }

    /// Forward schema change.
    fn apply(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError>;

    /// Undo exactly what [`Migration::apply`] did.
    fn revert(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError>;
}

/// Migration backed by two static SQL scripts, usually embedded with
/// `include_str!`.
#[derive(Debug, Clone, Copy)]
pub struct SqlMigration {
    id: &'static str,
    up: &'static str,
    down: &'static str,
}

impl SqlMigration {
    pub const fn new(id: &'static str, up: &'static str, down: &'static str) -> Self {
        Self { id, up, down }
    }

    pub fn up_sql(&self) -> &'static str {
        self.up
    }

    pub fn down_sql(&self) -> &'static str {
        self.down
    }
}

impl Migration for SqlMigration {
    fn id(&self) -> &str {
        self.id
    }

    fn apply(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError> {
        log::debug!("Executing up script of {}", self.id);
        tx.execute_batch(self.up)?;
        Ok(())
    }

    fn revert(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError> {
        log::debug!("Executing down script of {}", self.id);
        tx.execute_batch(self.down)?;
        Ok(())
    }
}
