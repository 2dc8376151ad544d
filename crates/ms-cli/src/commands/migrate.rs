//! Apply mode: run every pending migration

use anyhow::{Context, Result};
use ms_migrate::{Engine, Progress};
use ms_store::Store;

/// Apply pending migrations, printing progress per migration id.
pub(crate) fn execute<S: Store>(engine: &Engine<S>) -> Result<()> {
    println!("Running migrations...");

    let report = engine
        .apply_with_progress(|progress| match progress {
            Progress::Skipped(id) => log::debug!("Already applied: {id}"),
            Progress::Started(id) => println!("  Applying {id}"),
            Progress::Completed(id) => println!("  Applied  {id}"),
        })
        .context("Migration failed")?;

    if report.is_up_to_date() {
        println!(
            "Database is up to date ({} migration{} already applied)",
            report.skipped,
            if report.skipped == 1 { "" } else { "s" }
        );
    } else {
        println!(
            "Migrations completed successfully: {} applied, {} already up to date",
            report.applied.len(),
            report.skipped
        );
    }
    Ok(())
}
