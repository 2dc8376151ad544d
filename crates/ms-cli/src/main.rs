//! medsched-migrate - apply or roll back the medical scheduling schema

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use ms_migrate::CancellationToken;

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));

    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = Config::discover(cli.global.config.as_deref(), &cwd)?;
    let dsn = config.resolve_dsn(cli.global.dsn.as_deref());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current migration");
            on_interrupt.cancel();
        }
    });

    tokio::task::spawn_blocking(move || commands::execute(&cli, &dsn, cancel))
        .await
        .context("Migration task panicked")?
}
