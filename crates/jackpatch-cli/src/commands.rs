//! Subcommand implementations.

use anyhow::{Context, Result};
use jackpatch_bus::SnapshotDocument;
use jackpatch_core::{
    Action, Dispatcher, FailurePolicy, GraphQuery, MatchMode, NamePattern, PairWindow, Patchbay,
    PortPair, Selector, pair_ports,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{ClientsArgs, PatchArgs, PortsArgs};
use crate::config::Config;
use crate::report;

/// How a command finished, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success,
    /// At least one pair action failed or was skipped
    PartialFailure,
}

impl Completion {
    /// Process exit status for this completion.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::PartialFailure => 3,
        }
    }
}

/// Options shared by every command.
pub struct Session<'a> {
    pub patchbay: &'a dyn Patchbay,
    pub config: &'a Config,
    pub mode: MatchMode,
    pub json: bool,
}

impl Session<'_> {
    fn pattern(&self, pattern: &str) -> Result<NamePattern> {
        Ok(NamePattern::with_mode(pattern, self.mode)?)
    }

    fn query(&self) -> GraphQuery<'_, dyn Patchbay + '_> {
        GraphQuery::new(self.patchbay)
    }
}

/// Select, pair and connect or disconnect ports.
pub fn patch(ctx: &Session<'_>, action: Action, args: &PatchArgs) -> Result<Completion> {
    let pairs = plan(ctx, args)?;

    if args.dry_run {
        if ctx.json {
            print_json(&pairs)?;
        } else {
            for pair in &pairs {
                println!("{}", report::dry_run_line(action, pair));
            }
        }
        return Ok(Completion::Success);
    }

    let policy = if args.fail_fast { FailurePolicy::FailFast } else { ctx.config.dispatch.policy };
    let dispatcher = Dispatcher::new(ctx.patchbay, policy);
    let batch = dispatcher.run_with(action, pairs, |outcome| {
        if !ctx.json {
            println!("{}", report::outcome_line(action, outcome));
        }
    });

    if ctx.json {
        print_json(&report::BatchRecord::from(&batch))?;
    } else {
        eprintln!("{}", report::summary(&batch));
    }

    Ok(if batch.is_success() { Completion::Success } else { Completion::PartialFailure })
}

/// Pairs selected from a fresh port list; flags override configured patterns.
fn plan(ctx: &Session<'_>, args: &PatchArgs) -> Result<Vec<PortPair>> {
    let defaults = &ctx.config.defaults;
    let selector = Selector::compile(
        args.sclient.as_deref().unwrap_or(&defaults.source_client),
        args.sport.as_deref().unwrap_or(&defaults.source_port),
        args.dclient.as_deref().unwrap_or(&defaults.dest_client),
        args.dport.as_deref().unwrap_or(&defaults.dest_port),
        ctx.mode,
    )?;

    let ports = ctx.query().ports().context("Failed to read the JACK graph")?;
    let candidates = selector.select(&ports);
    let window = PairWindow::from_signed_limit(args.number_of_ports, args.sstart, args.dstart);
    let pairs = pair_ports(&candidates.sources, &candidates.dests, window);
    info!(
        sources = candidates.sources.len(),
        dests = candidates.dests.len(),
        pairs = pairs.len(),
        "Ports paired"
    );
    Ok(pairs)
}

/// List clients, optionally filtered.
pub fn clients(ctx: &Session<'_>, args: &ClientsArgs) -> Result<Completion> {
    let query = ctx.query();
    let clients = if let Some(pid) = args.pid {
        query.clients_by_pid(pid)
    } else if let Some(name) = &args.name {
        query.clients_matching(&ctx.pattern(name)?)
    } else if args.system {
        query.system_clients()
    } else {
        query.clients()
    }
    .context("Failed to read the JACK graph")?;

    if ctx.json {
        print_json(&clients)?;
    } else {
        print!("{}", report::clients_text(&clients));
    }
    Ok(Completion::Success)
}

/// List ports, optionally filtered.
pub fn ports(ctx: &Session<'_>, args: &PortsArgs) -> Result<Completion> {
    let client = args.client.as_deref().map(|p| ctx.pattern(p)).transpose()?;
    let port = args.port.as_deref().map(|p| ctx.pattern(p)).transpose()?;
    let media_type = args.media_type.map(jackpatch_core::MediaType::from);

    let ports = ctx.query().ports().context("Failed to read the JACK graph")?;
    let selected: Vec<_> = ports
        .iter()
        .filter(|p| client.as_ref().is_none_or(|re| re.matches(p.client())))
        .filter(|p| port.as_ref().is_none_or(|re| re.matches(p.name())))
        .filter(|p| !args.inputs || p.is_input())
        .filter(|p| !args.outputs || p.is_output())
        .filter(|p| !args.physical || p.is_physical())
        .filter(|p| media_type.is_none_or(|m| p.media_type() == m))
        .collect();

    if ctx.json {
        print_json(&selected)?;
    } else {
        print!("{}", report::ports_text(selected));
    }
    Ok(Completion::Success)
}

/// List connections.
pub fn connections(ctx: &Session<'_>) -> Result<Completion> {
    let connections = ctx.query().connections().context("Failed to read the JACK graph")?;

    if ctx.json {
        print_json(&connections)?;
    } else {
        print!("{}", report::connections_text(&connections));
    }
    Ok(Completion::Success)
}

/// Print the raw snapshot and client PIDs as JSON.
pub fn dump(ctx: &Session<'_>) -> Result<Completion> {
    let document =
        SnapshotDocument::capture(ctx.patchbay).context("Failed to read the JACK graph")?;
    print_json(&document)?;
    Ok(Completion::Success)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
