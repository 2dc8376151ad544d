//! Mode implementations

pub(crate) mod common;
pub(crate) mod migrate;
pub(crate) mod rollback;
pub(crate) mod status;

use anyhow::Result;
use ms_migrate::CancellationToken;

use crate::cli::{Cli, Mode};

/// Open the store and run the mode selected on the command line.
///
/// Blocking: call from a blocking thread.
pub(crate) fn execute(cli: &Cli, dsn: &str, cancel: CancellationToken) -> Result<()> {
    let engine = common::open_engine(dsn, cancel)?;
    match cli.mode() {
        Mode::Apply => migrate::execute(&engine),
        Mode::Rollback => rollback::execute(&engine),
        Mode::Status => status::execute(&engine, cli.status_output()),
    }
}
