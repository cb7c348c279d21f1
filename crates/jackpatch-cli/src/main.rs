//! jackpatch - bulk JACK port (dis)connection by regular expression.
//!
//! Reads the JACK graph over D-Bus (or from a dumped snapshot), selects
//! source outputs and destination inputs by pattern, pairs them by position
//! and connects or disconnects each pair.
//!
//! Exit codes: 0 success, 1 fatal error, 2 usage error, 3 some pairs failed.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use jackpatch_bus::{DbusPatchbay, SnapshotFile};
use jackpatch_core::{Action, MatchMode, Patchbay};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod report;

use cli::{Cli, Command};
use commands::{Completion, Session};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(completion) => ExitCode::from(completion.exit_code()),
        Err(e) => {
            error!(error = %e, "jackpatch failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Completion> {
    let config = config::load_config(cli.config.as_deref())?;
    init_logging(cli, &config)?;
    debug!(?config, "Configuration loaded");

    let patchbay = open_patchbay(cli, &config)?;
    let mode = if cli.full_match { MatchMode::Full } else { config.matching.mode };
    let session = Session { patchbay: patchbay.as_ref(), config: &config, mode, json: cli.json };

    match &cli.command {
        Command::Connect(args) => commands::patch(&session, Action::Connect, args),
        Command::Disconnect(args) => commands::patch(&session, Action::Disconnect, args),
        Command::Clients(args) => commands::clients(&session, args),
        Command::Ports(args) => commands::ports(&session, args),
        Command::Connections => commands::connections(&session),
        Command::Dump => commands::dump(&session),
    }
}

/// Initialize logging to stderr. `RUST_LOG` takes precedence over flags and config.
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => config.log.level.as_str(),
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {level:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn open_patchbay(cli: &Cli, config: &Config) -> Result<Box<dyn Patchbay>> {
    if let Some(path) = &cli.snapshot {
        let snapshot = SnapshotFile::load(path)
            .with_context(|| format!("Failed to load snapshot: {path:?}"))?;
        return Ok(Box::new(snapshot));
    }

    let patchbay = DbusPatchbay::connect_session(&config.bus)
        .context("Failed to connect to the JACK patchbay on the session bus")?;
    Ok(Box::new(patchbay))
}
