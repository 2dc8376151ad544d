//! Rollback mode: revert the most recently applied migration

use anyhow::{Context, Result};
use ms_migrate::{Engine, RollbackOutcome};
use ms_store::Store;

/// Revert the latest migration and print the outcome.
pub(crate) fn execute<S: Store>(engine: &Engine<S>) -> Result<()> {
    println!("Rolling back the last migration...");

    match engine.rollback_last().context("Rollback failed")? {
        RollbackOutcome::NothingToRollback => println!("No migrations to rollback"),
        RollbackOutcome::RolledBack(id) => {
            println!("  Reverted {id}");
            println!("Rollback completed successfully");
        }
    }
    Ok(())
}
