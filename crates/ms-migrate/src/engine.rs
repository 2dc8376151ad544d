//! Migration engine: ledger diffing and transactional apply / rollback.
//!
//! Every pending migration runs in its own transaction together with the
//! ledger insert that records it, so a failure leaves neither schema changes
//! nor a ledger row behind. Processing stops at the first failure.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{self, LedgerEntry};
use crate::migration::Migration;
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use ms_store::{Executor, Store};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked between migrations.
///
/// A migration whose transaction is already open always runs to commit or
/// rollback; cancellation only prevents the next one from starting.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-migration progress reported by [`Engine::apply_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<'a> {
    /// Already in the ledger, not executed.
    Skipped(&'a str),
    /// Transaction opened, forward action about to run.
    Started(&'a str),
    /// Forward action and ledger row committed.
    Completed(&'a str),
}

/// Outcome of a successful apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Ids applied by this call, in execution order.
    pub applied: Vec<String>,
    /// Number of registered migrations that were already applied.
    pub skipped: usize,
}

impl ApplyReport {
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Outcome of a successful rollback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The ledger was empty.
    NothingToRollback,
    /// The migration with this id was reverted and its ledger row removed.
    RolledBack(String),
}

/// Registered migration joined with its ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub id: String,
    pub description: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Drives a [`Registry`] against a [`Store`].
pub struct Engine<S: Store> {
    store: S,
    registry: Registry,
    cancel: CancellationToken,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S, registry: Registry) -> Self {
        Self {
            store,
            registry,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` to stop between migrations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply every pending migration in ascending id order.
    pub fn apply(&self) -> MigrateResult<ApplyReport> {
        self.apply_with_progress(|_| {})
    }

    /// [`Engine::apply`], reporting each migration to `on_progress`.
    pub fn apply_with_progress<P>(&self, mut on_progress: P) -> MigrateResult<ApplyReport>
    where
        P: FnMut(Progress<'_>),
    {
        ledger::ensure_schema(self.executor())?;
        let applied: HashSet<String> = self
            .checked_entries()?
            .into_iter()
            .map(|entry| entry.id)
            .collect();

        let pending = self
            .registry
            .iter()
            .filter(|m| !applied.contains(m.id()))
            .count();
        log::debug!(
            "{} registered, {} applied, {} pending",
            self.registry.len(),
            applied.len(),
            pending
        );

        let mut report = ApplyReport::default();
        for migration in self.registry.iter() {
            let id = migration.id();
            if applied.contains(id) {
                report.skipped += 1;
                on_progress(Progress::Skipped(id));
                continue;
            }
            if self.cancel.is_cancelled() {
                let remaining = pending - report.applied.len();
                log::warn!("Cancellation requested, {remaining} pending migration(s) not started");
                return Err(MigrateError::Cancelled { remaining });
            }

            log::info!("Running migration: {id}");
            on_progress(Progress::Started(id));
            self.apply_one(migration)
                .map_err(|e| MigrateError::MigrationApply {
                    id: id.to_string(),
                    source: Box::new(e),
                })?;
            log::info!("Migration {id} completed successfully");
            on_progress(Progress::Completed(id));
            report.applied.push(id.to_string());
        }
        Ok(report)
    }

    /// Revert the migration with the greatest applied id.
    ///
    /// An empty (or absent) ledger is not an error. A ledger id with no
    /// registered migration fails with [`MigrateError::MigrationMissing`].
    pub fn rollback_last(&self) -> MigrateResult<RollbackOutcome> {
        if !ledger::exists(self.executor())? {
            log::info!("No migrations to rollback");
            return Ok(RollbackOutcome::NothingToRollback);
        }
        let Some(entry) = ledger::find_most_recent(self.executor())? else {
            log::info!("No migrations to rollback");
            return Ok(RollbackOutcome::NothingToRollback);
        };

        let migration = self
            .registry
            .get(&entry.id)
            .ok_or_else(|| MigrateError::MigrationMissing {
                id: entry.id.clone(),
            })?;

        log::info!("Rolling back migration: {}", entry.id);
        self.revert_one(migration)
            .map_err(|e| MigrateError::MigrationRollback {
                id: entry.id.clone(),
                source: Box::new(e),
            })?;
        log::info!("Rollback of migration {} completed successfully", entry.id);
        Ok(RollbackOutcome::RolledBack(entry.id))
    }

    /// Every registered migration with its applied timestamp, in id order.
    ///
    /// Read-only: an absent ledger reports everything as pending.
    pub fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let applied: HashMap<String, DateTime<Utc>> = if ledger::exists(self.executor())? {
            self.checked_entries()?
                .into_iter()
                .map(|entry| (entry.id, entry.applied_at))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(self
            .registry
            .iter()
            .map(|m| MigrationStatus {
                id: m.id().to_string(),
                description: m.description().to_string(),
                applied_at: applied.get(m.id()).copied(),
            })
            .collect())
    }

    fn apply_one(&self, migration: &dyn Migration) -> MigrateResult<()> {
        self.store.transaction(|tx| {
            migration.apply(tx)?;
            ledger::record_applied(tx, migration.id(), ledger::now())
        })
    }

    fn revert_one(&self, migration: &dyn Migration) -> MigrateResult<()> {
        self.store.transaction(|tx| {
            migration.revert(tx)?;
            ledger::remove(tx, migration.id())
        })
    }

    /// Ledger entries, failing on any id the registry does not know.
    fn checked_entries(&self) -> MigrateResult<Vec<LedgerEntry>> {
        let entries = ledger::list_applied(self.executor())?;
        if let Some(unknown) = entries.iter().find(|e| !self.registry.contains(&e.id)) {
            return Err(MigrateError::MigrationMissing {
                id: unknown.id.clone(),
            });
        }
        Ok(entries)
    }

    fn executor(&self) -> &dyn Executor {
        &self.store
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
