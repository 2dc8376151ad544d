//! Shared test utilities for ms-migrate

use crate::engine::Engine;
use crate::error::SchemaChangeError;
use crate::ledger;
use crate::migration::Migration;
use crate::registry::Registry;
use ms_store::{DuckDbStore, Executor, Value};
use std::sync::{Arc, Mutex};

/// Ordered record of `apply:<id>` / `revert:<id>` calls across migrations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Migration that creates table `t_<id>` and records every call.
pub struct RecordingMigration {
    id: String,
    up: String,
    down: String,
    fail_after_up: bool,
    rejection: Option<String>,
    log: CallLog,
}

impl RecordingMigration {
    pub fn new(id: &str, log: &CallLog) -> Self {
        let table = table_for(id);
        Self {
            id: id.to_string(),
            up: format!("CREATE TABLE IF NOT EXISTS {table} (id INTEGER)"),
            down: format!("DROP TABLE IF EXISTS {table}"),
            fail_after_up: false,
            rejection: None,
            log: log.clone(),
        }
    }

    /// Replace the generated scripts.
    pub fn with_sql(mut self, up: &str, down: &str) -> Self {
        self.up = up.to_string();
        self.down = down.to_string();
        self
    }

    /// Run the up script, then fail with a bad statement.
    pub fn failing(mut self) -> Self {
        self.fail_after_up = true;
        self
    }

    /// Run the up script, then refuse with `reason`.
    pub fn rejecting(mut self, reason: &str) -> Self {
        self.rejection = Some(reason.to_string());
        self
    }

    pub fn boxed(self) -> Box<dyn Migration> {
        Box::new(self)
    }
}

impl Migration for RecordingMigration {
    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError> {
        self.log.push(format!("apply:{}", self.id));
        tx.execute_batch(&self.up)?;
        if self.fail_after_up {
            tx.execute_batch("SELECT * FROM table_that_does_not_exist")?;
        }
        if let Some(reason) = &self.rejection {
            return Err(SchemaChangeError::Rejected(reason.clone()));
        }
        Ok(())
    }

    fn revert(&self, tx: &dyn Executor) -> Result<(), SchemaChangeError> {
        self.log.push(format!("revert:{}", self.id));
        tx.execute_batch(&self.down)?;
        Ok(())
    }
}

/// Table created by a default [`RecordingMigration`].
pub fn table_for(id: &str) -> String {
    format!("t_{id}")
}

/// Engine over a fresh in-memory DuckDB store.
pub fn memory_engine(migrations: Vec<Box<dyn Migration>>) -> Engine<DuckDbStore> {
    let store = DuckDbStore::in_memory().unwrap();
    Engine::new(store, Registry::new(migrations).unwrap())
}

/// Recording migrations for each id, sharing one log.
pub fn recording(ids: &[&str], log: &CallLog) -> Vec<Box<dyn Migration>> {
    ids.iter()
        .map(|id| RecordingMigration::new(id, log).boxed())
        .collect()
}

pub fn table_exists(exec: &dyn Executor, name: &str) -> bool {
    let rows = exec
        .query(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = ?",
            &[Value::from(name)],
        )
        .unwrap();
    rows[0][0].as_i64().unwrap() > 0
}

/// Ledger ids in ascending order.
pub fn ledger_ids(exec: &dyn Executor) -> Vec<String> {
    ledger::list_applied(exec)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}
