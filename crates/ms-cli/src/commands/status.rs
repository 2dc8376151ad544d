//! Status mode: list registered migrations and whether they are applied

use anyhow::{Context, Result};
use ms_migrate::{Engine, MigrationStatus};
use ms_store::Store;

use crate::cli::StatusOutput;
use crate::commands::common::print_table;

/// Print the status of every registered migration.
pub(crate) fn execute<S: Store>(engine: &Engine<S>, output: StatusOutput) -> Result<()> {
    let statuses = engine.status().context("Failed to read migration status")?;

    match output {
        StatusOutput::Table => {
            print_table(&["ID", "STATUS", "APPLIED AT"], &status_rows(&statuses));
            let pending = statuses.iter().filter(|s| !s.is_applied()).count();
            println!();
            println!("{} applied, {} pending", statuses.len() - pending, pending);
        }
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&statuses)
                .context("Failed to serialize migration status")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn status_rows(statuses: &[MigrationStatus]) -> Vec<Vec<String>> {
    statuses
        .iter()
        .map(|s| {
            let (state, applied_at) = match s.applied_at {
                Some(ts) => (
                    "applied".to_string(),
                    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ),
                None => ("pending".to_string(), "-".to_string()),
            };
            vec![s.id.clone(), state, applied_at]
        })
        .collect()
}
