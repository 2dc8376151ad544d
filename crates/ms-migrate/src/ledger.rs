//! Persisted record of applied migrations.
//!
//! One row per applied id in `migration_records`. Rows are only written or
//! deleted inside the same transaction as the schema change they describe.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, SubsecRound, Utc};
use ms_store::{Executor, Row, StoreError, Value};

/// Ledger table name.
pub const LEDGER_TABLE: &str = "migration_records";

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: String,
    pub applied_at: DateTime<Utc>,
}

/// Current wall-clock time at the store's microsecond resolution, so the
/// value read back equals the value written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Create the ledger table if it does not exist. Safe on every startup.
pub fn ensure_schema(exec: &dyn Executor) -> MigrateResult<()> {
    exec.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
             id         TEXT PRIMARY KEY,
             applied_at TIMESTAMP NOT NULL
         );"
    ))
    .map_err(MigrateError::LedgerInit)
}

/// Whether the ledger table exists, without creating it.
pub fn exists(exec: &dyn Executor) -> MigrateResult<bool> {
    let rows = exec
        .query(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = ?",
            &[Value::from(LEDGER_TABLE)],
        )
        .map_err(MigrateError::Ledger)?;
    let count = rows
        .first()
        .and_then(|row| row.first())
        .and_then(Value::as_i64)
        .unwrap_or(0);
    Ok(count > 0)
}

/// All entries, ordered by id.
pub fn list_applied(exec: &dyn Executor) -> MigrateResult<Vec<LedgerEntry>> {
    exec.query(
        &format!("SELECT id, applied_at FROM {LEDGER_TABLE} ORDER BY id"),
        &[],
    )
    .map_err(MigrateError::Ledger)?
    .into_iter()
    .map(entry_from_row)
    .collect()
}

/// Insert one entry; an id already present fails with
/// [`MigrateError::DuplicateLedgerEntry`].
pub fn record_applied(exec: &dyn Executor, id: &str, at: DateTime<Utc>) -> MigrateResult<()> {
    exec.execute(
        &format!("INSERT INTO {LEDGER_TABLE} (id, applied_at) VALUES (?, CAST(? AS TIMESTAMP))"),
        &[Value::from(id), Value::Timestamp(at)],
    )
    .map_err(|e| match e {
        StoreError::ConstraintViolation(_) => MigrateError::DuplicateLedgerEntry {
            id: id.to_string(),
        },
        other => MigrateError::Ledger(other),
    })?;
    Ok(())
}

/// Entry with the lexicographically greatest id, `None` when empty.
pub fn find_most_recent(exec: &dyn Executor) -> MigrateResult<Option<LedgerEntry>> {
    exec.query(
        &format!("SELECT id, applied_at FROM {LEDGER_TABLE} ORDER BY id DESC LIMIT 1"),
        &[],
    )
    .map_err(MigrateError::Ledger)?
    .into_iter()
    .next()
    .map(entry_from_row)
    .transpose()
}

/// Delete the entry for `id`; an absent id fails with
/// [`MigrateError::LedgerEntryMissing`].
pub fn remove(exec: &dyn Executor, id: &str) -> MigrateResult<()> {
    let deleted = exec
        .execute(
            &format!("DELETE FROM {LEDGER_TABLE} WHERE id = ?"),
            &[Value::from(id)],
        )
        .map_err(MigrateError::Ledger)?;
    if deleted == 0 {
        return Err(MigrateError::LedgerEntryMissing { id: id.to_string() });
    }
    Ok(())
}

fn entry_from_row(row: Row) -> MigrateResult<LedgerEntry> {
    match row.as_slice() {
        [Value::Text(id), Value::Timestamp(applied_at)] => Ok(LedgerEntry {
            id: id.clone(),
            applied_at: *applied_at,
        }),
        other => Err(MigrateError::Ledger(StoreError::UnsupportedValue(format!(
            "unexpected {LEDGER_TABLE} row: {other:?}"
        )))),
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
