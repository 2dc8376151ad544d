use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the whole definition: short flag conflicts, duplicate args,
    // and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn default_mode_is_apply() {
    let cli = Cli::try_parse_from(["medsched-migrate"]).unwrap();
    assert_eq!(cli.mode(), Mode::Apply);
    assert!(!cli.global.verbose);
    assert_eq!(cli.status_output(), StatusOutput::Table);
}

#[test]
fn rollback_flag_selects_rollback() {
    let cli =
        Cli::try_parse_from(["medsched-migrate", "--rollback", "--dsn", ":memory:"]).unwrap();
    assert_eq!(cli.mode(), Mode::Rollback);
    assert_eq!(cli.global.dsn.as_deref(), Some(":memory:"));
}

#[test]
fn status_with_json_output() {
    let cli = Cli::try_parse_from(["medsched-migrate", "--status", "-o", "json"]).unwrap();
    assert_eq!(cli.mode(), Mode::Status);
    assert_eq!(cli.status_output(), StatusOutput::Json);
}

#[test]
fn rollback_and_status_conflict() {
    let err = Cli::try_parse_from(["medsched-migrate", "--rollback", "--status"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn output_format_requires_status() {
    let err = Cli::try_parse_from(["medsched-migrate", "-o", "json"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

    let err =
        Cli::try_parse_from(["medsched-migrate", "--rollback", "--output", "table"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}
