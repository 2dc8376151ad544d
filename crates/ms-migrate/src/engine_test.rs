//! Unit tests for engine bookkeeping: progress, cancellation, status, drift.

use super::*;
use crate::error::SchemaChangeError;
use crate::test_utils::{
    ledger_ids, memory_engine, recording, table_exists, CallLog, RecordingMigration,
};

#[test]
fn apply_on_empty_registry_creates_only_the_ledger() {
    let engine = memory_engine(Vec::new());
    let report = engine.apply().unwrap();
    assert!(report.is_up_to_date());
    assert_eq!(report.skipped, 0);
    assert!(ledger::exists(engine.store()).unwrap());
}

#[test]
fn progress_reports_every_migration() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001", "0002"], &log));
    engine.apply().unwrap();

    let mut events = Vec::new();
    let engine = Engine::new(
        engine.into_store(),
        Registry::new(recording(&["0001", "0002", "0003"], &log)).unwrap(),
    );
    let report = engine
        .apply_with_progress(|p| events.push(format!("{p:?}")))
        .unwrap();

    assert_eq!(
        events,
        vec![
            "Skipped(\"0001\")",
            "Skipped(\"0002\")",
            "Started(\"0003\")",
            "Completed(\"0003\")",
        ]
    );
    assert_eq!(report.applied, vec!["0003"]);
    assert_eq!(report.skipped, 2);
}

#[test]
fn cancelled_token_stops_before_first_pending() {
    let log = CallLog::new();
    let token = CancellationToken::new();
    token.cancel();
    let engine = memory_engine(recording(&["0001", "0002"], &log)).with_cancellation(token);

    let err = engine.apply().unwrap_err();
    assert!(matches!(err, MigrateError::Cancelled { remaining: 2 }), "{err}");
    assert!(log.entries().is_empty());
    assert!(ledger_ids(engine.store()).is_empty());
}

#[test]
fn cancellation_mid_run_keeps_committed_migrations() {
    let log = CallLog::new();
    let token = CancellationToken::new();
    let engine = memory_engine(recording(&["0001", "0002", "0003"], &log))
        .with_cancellation(token.clone());

    let err = engine
        .apply_with_progress(|p| {
            if p == Progress::Completed("0001") {
                token.cancel();
            }
        })
        .unwrap_err();

    assert!(matches!(err, MigrateError::Cancelled { remaining: 2 }), "{err}");
    assert_eq!(log.entries(), vec!["apply:0001"]);
    assert_eq!(ledger_ids(engine.store()), vec!["0001"]);
    assert!(table_exists(engine.store(), "t_0001"));
    assert!(!table_exists(engine.store(), "t_0002"));
}

#[test]
fn cancellation_does_not_block_skips() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001"], &log));
    engine.apply().unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let engine = engine.with_cancellation(token);
    let report = engine.apply().unwrap();
    assert_eq!(report.skipped, 1);
    assert!(report.applied.is_empty());
}

#[test]
fn apply_refuses_unknown_ledger_ids() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001", "0002"], &log));
    engine.apply().unwrap();
    log.clear();

    let older = Engine::new(
        engine.into_store(),
        Registry::new(recording(&["0001", "0003"], &log)).unwrap(),
    );
    let err = older.apply().unwrap_err();
    match err {
        MigrateError::MigrationMissing { id } => assert_eq!(id, "0002"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.entries().is_empty(), "nothing may run on drift");
}

#[test]
fn status_without_ledger_reports_all_pending() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0002_second", "0001_first"], &log));
    let status = engine.status().unwrap();

    assert_eq!(status.len(), 2);
    assert_eq!(status[0].id, "0001_first");
    assert_eq!(status[0].description, "first");
    assert!(status.iter().all(|s| !s.is_applied()));
    assert!(!ledger::exists(engine.store()).unwrap(), "status is read-only");
}

#[test]
fn status_joins_ledger_timestamps() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001", "0002"], &log));
    let before = ledger::now();
    engine.apply().unwrap();

    let status = engine.status().unwrap();
    assert!(status.iter().all(MigrationStatus::is_applied));
    assert!(status[0].applied_at.unwrap() >= before);
    assert!(status[0].applied_at <= status[1].applied_at);

    engine.rollback_last().unwrap();
    let status = engine.status().unwrap();
    assert!(status[0].is_applied());
    assert!(!status[1].is_applied());
}

#[test]
fn rollback_without_ledger_table_has_no_side_effects() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001"], &log));
    assert_eq!(
        engine.rollback_last().unwrap(),
        RollbackOutcome::NothingToRollback
    );
    assert!(!ledger::exists(engine.store()).unwrap());
    assert!(log.entries().is_empty());
}

#[test]
fn apply_error_carries_migration_id() {
    let log = CallLog::new();
    let engine = memory_engine(vec![
        RecordingMigration::new("0001", &log)
            .failing()
            .boxed(),
    ]);
    let err = engine.apply().unwrap_err();
    assert_eq!(err.migration_id(), Some("0001"));
    assert!(err.to_string().contains("0001"));
}

#[test]
fn rollback_ignores_ledger_in_another_schema() {
    let log = CallLog::new();
    let engine = memory_engine(recording(&["0001"], &log));
    engine
        .store()
        .execute_batch(
            "CREATE SCHEMA archive;
             CREATE TABLE archive.migration_records (id TEXT, applied_at TIMESTAMP);
             INSERT INTO archive.migration_records VALUES ('0001', TIMESTAMP '2024-01-01 00:00:00');",
        )
        .unwrap();

    assert_eq!(
        engine.rollback_last().unwrap(),
        RollbackOutcome::NothingToRollback
    );
    assert!(log.entries().is_empty());
}

#[test]
fn rejected_migration_leaves_nothing_behind() {
    let log = CallLog::new();
    let engine = memory_engine(vec![
        RecordingMigration::new("0001", &log).boxed(),
        RecordingMigration::new("0002", &log)
            .rejecting("requires an empty doctors table")
            .boxed(),
    ]);

    let err = engine.apply().unwrap_err();
    match &err {
        MigrateError::MigrationApply { id, source } => {
            assert_eq!(id, "0002");
            assert!(matches!(
                source.as_ref(),
                MigrateError::SchemaChange(SchemaChangeError::Rejected(reason))
                    if reason == "requires an empty doctors table"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ledger_ids(engine.store()), vec!["0001"]);
    assert!(!table_exists(engine.store(), "t_0002"));
}
