//! Store capability traits
//!
//! The migration engine only needs two things from a persisted store: a way
//! to run statements (inside or outside a transaction) and a way to scope a
//! group of statements in one atomic transaction. Any backend implementing
//! [`Store`] can be driven by the engine without touching its logic.

use crate::error::{StoreError, StoreResult};
use crate::value::{Row, Value};

/// Statement execution capability.
pub trait Executor {
    /// Execute one or more `;`-separated statements without parameters
    fn execute_batch(&self, sql: &str) -> StoreResult<()>;

    /// Execute a single parameterised statement, returns affected rows
    fn execute(&self, sql: &str, params: &[Value]) -> StoreResult<usize>;

    /// Run a parameterised query and collect every row
    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>>;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;
}

/// A store that can open transactional scopes.
pub trait Store: Executor {
    /// Run `body` inside a `BEGIN` / `COMMIT` scope.
    ///
    /// Commits when `body` returns `Ok`, rolls back when it returns `Err`.
    /// A failed commit is rolled back and surfaced as
    /// [`StoreError::TransactionError`] converted into `E`.
    fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Executor) -> Result<T, E>,
        E: From<StoreError>;
}
