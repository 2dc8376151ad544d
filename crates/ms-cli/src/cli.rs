//! CLI argument definitions using clap derive API

use clap::{Args, Parser, ValueEnum};

/// medsched-migrate - apply pending schema migrations or roll back the latest
#[derive(Parser, Debug)]
#[command(name = "medsched-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Roll back the most recently applied migration
    #[arg(long, conflicts_with = "status")]
    pub rollback: bool,

    /// Show applied and pending migrations without changing anything
    #[arg(long)]
    pub status: bool,

    /// Output format for --status (default: table)
    #[arg(short, long, value_enum, requires = "status")]
    pub output: Option<StatusOutput>,
}

/// Options shared by every mode
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Database connection string (`:memory:`, a path, or `duckdb://<path>`)
    #[arg(long, env = "MEDSCHED_DSN")]
    pub dsn: Option<String>,

    /// Config file path (default: ./medsched.yml when present)
    #[arg(short, long)]
    pub config: Option<String>,
}

/// What the invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    Rollback,
    Status,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.rollback {
            Mode::Rollback
        } else if self.status {
            Mode::Status
        } else {
            Mode::Apply
        }
    }

    pub fn status_output(&self) -> StatusOutput {
        self.output.unwrap_or(StatusOutput::Table)
    }
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
