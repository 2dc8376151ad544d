//! ms-store - Persisted-store layer for medsched
//!
//! This crate provides the `Executor` and `Store` traits consumed by the
//! migration engine, plus a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbStore;
pub use error::{StoreError, StoreResult};
pub use traits::{Executor, Store};
pub use value::{Row, Value};
