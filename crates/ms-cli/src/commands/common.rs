//! Helpers shared by the apply, rollback and status modes

use anyhow::{Context, Result};
use ms_migrate::{catalog, CancellationToken, Engine, MigrateError, Registry};
use ms_store::DuckDbStore;

/// Connect to `dsn` and build an engine over the built-in catalog.
pub(crate) fn open_engine(dsn: &str, cancel: CancellationToken) -> Result<Engine<DuckDbStore>> {
    let store = DuckDbStore::open(dsn)
        .map_err(MigrateError::Connection)
        .with_context(|| format!("Failed to connect to database '{dsn}'"))?;
    let registry = Registry::new(catalog::migrations()).context("Invalid migration registry")?;
    log::debug!(
        "Loaded {} migrations, store backend: {}",
        registry.len(),
        ms_store::Executor::backend_name(&store)
    );
    Ok(Engine::new(store, registry).with_cancellation(cancel))
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header row, dashed separator, data rows.
/// Columns are separated by two spaces and trailing padding is trimmed.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(render(widths.iter().map(|&w| "-".repeat(w)).collect()));
    lines.extend(rows.iter().map(|row| render(row.clone())));
    lines
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_cover_headers_and_cells() {
        let widths = calculate_column_widths(
            &["ID", "STATUS"],
            &[vec!["000001_create_departments".into(), "applied".into()]],
        );
        assert_eq!(widths, vec![25, 7]);
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let lines = format_table(
            &["ID", "STATUS"],
            &[
                vec!["0001".into(), "applied".into()],
                vec!["0002".into(), "pending".into()],
            ],
        );
        assert_eq!(
            lines,
            vec![
                "ID    STATUS",
                "----  -------",
                "0001  applied",
                "0002  pending",
            ]
        );
    }

    #[test]
    fn test_open_engine_in_memory() {
        let engine = open_engine(":memory:", CancellationToken::new()).unwrap();
        assert_eq!(engine.registry().len(), 5);
    }

    #[test]
    fn test_open_engine_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let dsn = dir.path().join("missing").join("db.duckdb");
        let err = open_engine(dsn.to_str().unwrap(), CancellationToken::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to connect"), "{err}");
        assert!(err
            .chain()
            .any(|cause| cause.to_string().contains("[MG001]")));
    }
}
