//! DuckDB store implementation

use crate::error::{StoreError, StoreResult};
use crate::traits::{Executor, Store};
use crate::value::{Row, Value};
use chrono::DateTime;
use duckdb::types::{TimeUnit, ToSqlOutput, Value as DuckValue};
use duckdb::{params_from_iter, Connection, ToSql};
use std::path::Path;

/// Optional scheme accepted in front of a DuckDB path.
const DSN_SCHEME: &str = "duckdb://";

/// In-memory database marker, same as the DuckDB CLI.
const MEMORY_DSN: &str = ":memory:";

/// DuckDB store
///
/// Single-threaded: migrations run sequentially on one connection, so no
/// `Mutex` is needed.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Open a store from a connection string.
    ///
    /// Accepts `:memory:`, a file path, or either of those prefixed with
    /// `duckdb://`.
    pub fn open(dsn: &str) -> StoreResult<Self> {
        let target = dsn.strip_prefix(DSN_SCHEME).unwrap_or(dsn).trim();
        if target.is_empty() {
            return Err(StoreError::ConnectionError(format!(
                "empty database path in connection string '{dsn}'"
            )));
        }
        log::debug!("Opening DuckDB store at {target}");
        if target == MEMORY_DSN {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(target))
        }
    }

    fn executor(&self) -> ConnExecutor<'_> {
        ConnExecutor { conn: &self.conn }
    }
}

impl Executor for DuckDbStore {
    fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.executor().execute_batch(sql)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StoreResult<usize> {
        self.executor().execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>> {
        self.executor().query(sql, params)
    }

    fn backend_name(&self) -> &'static str {
        "duckdb"
    }
}

impl Store for DuckDbStore {
    fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Executor) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| StoreError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.executor());

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    rollback(&self.conn);
                    return Err(StoreError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => rollback(&self.conn),
        }
        result
    }
}

fn rollback(conn: &Connection) {
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        log::warn!("ROLLBACK failed: {e}");
    }
}

/// Borrowed connection handed to callers, both for plain statements and
/// inside a transaction scope.
struct ConnExecutor<'a> {
    conn: &'a Connection,
}

impl Executor for ConnExecutor<'_> {
    fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| with_statement(e, sql))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StoreResult<usize> {
        self.conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(|e| with_statement(e, sql))
    }

    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql).map_err(|e| with_statement(e, sql))?;

        // DuckDB panics on `stmt.column_count()` before execution, so read the
        // width from each row instead.
        let raw_rows: Vec<Vec<DuckValue>> = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count).map(|i| row.get::<_, DuckValue>(i)).collect()
            })
            .map_err(|e| with_statement(e, sql))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| with_statement(e, sql))?;

        raw_rows
            .into_iter()
            .map(|row| row.into_iter().map(from_duckdb).collect())
            .collect()
    }

    fn backend_name(&self) -> &'static str {
        "duckdb"
    }
}

/// Classify a DuckDB error and append the failing statement for diagnosis.
fn with_statement(err: duckdb::Error, sql: &str) -> StoreError {
    match StoreError::from(err) {
        StoreError::ExecutionError(msg) => StoreError::ExecutionError(format!("{msg}: {sql}")),
        other => other,
    }
}

fn from_duckdb(value: DuckValue) -> StoreResult<Value> {
    let converted = match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(n) => Value::Integer(n.into()),
        DuckValue::SmallInt(n) => Value::Integer(n.into()),
        DuckValue::Int(n) => Value::Integer(n.into()),
        DuckValue::BigInt(n) => Value::Integer(n),
        DuckValue::UTinyInt(n) => Value::Integer(n.into()),
        DuckValue::USmallInt(n) => Value::Integer(n.into()),
        DuckValue::UInt(n) => Value::Integer(n.into()),
        DuckValue::UBigInt(n) => Value::Integer(
            i64::try_from(n).map_err(|_| StoreError::UnsupportedValue(format!("UBIGINT {n}")))?,
        ),
        DuckValue::HugeInt(n) => Value::Integer(
            i64::try_from(n).map_err(|_| StoreError::UnsupportedValue(format!("HUGEINT {n}")))?,
        ),
        DuckValue::Float(f) => Value::Double(f.into()),
        DuckValue::Double(f) => Value::Double(f),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            let ts = DateTime::from_timestamp_micros(micros).ok_or_else(|| {
                StoreError::UnsupportedValue(format!("timestamp out of range: {micros}us"))
            })?;
            Value::Timestamp(ts)
        }
        other => return Err(StoreError::UnsupportedValue(format!("{other:?}"))),
    };
    Ok(converted)
}

impl ToSql for Value {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(DuckValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(DuckValue::Boolean(*b)),
            Value::Integer(n) => ToSqlOutput::Owned(DuckValue::BigInt(*n)),
            Value::Double(f) => ToSqlOutput::Owned(DuckValue::Double(*f)),
            Value::Text(s) => ToSqlOutput::Owned(DuckValue::Text(s.clone())),
            // Bound as an ISO literal; callers cast with `CAST(? AS TIMESTAMP)`.
            Value::Timestamp(ts) => ToSqlOutput::Owned(DuckValue::Text(
                ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            )),
        })
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
