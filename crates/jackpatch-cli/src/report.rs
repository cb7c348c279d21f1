//! Human and JSON rendering of query results and batch outcomes.

use std::fmt::Write as _;

use jackpatch_core::{
    Action, ActionOutcome, ActionStatus, BatchReport, Client, Connection, Port, PortPair,
};
use serde::Serialize;

/// One line describing a pair action, e.g. `connecting [system:capture_1] -> [ardour:in_1]`.
pub fn outcome_line(action: Action, outcome: &ActionOutcome) -> String {
    let pair = pair_text(action, &outcome.pair);
    match &outcome.status {
        ActionStatus::Applied => format!("{} {pair}", action.verb()),
        ActionStatus::Failed(e) => format!("{} {pair} FAILED: {e}", action.verb()),
        ActionStatus::Skipped => format!("skipped {pair}"),
    }
}

/// One line describing a pair that would be acted on.
pub fn dry_run_line(action: Action, pair: &PortPair) -> String {
    format!("would {action} {}", pair_text(action, pair))
}

/// Totals line printed after a batch.
pub fn summary(report: &BatchReport) -> String {
    let mut line = format!(
        "{} {}: {} applied, {} failed",
        report.outcomes.len(),
        if report.outcomes.len() == 1 { "pair" } else { "pairs" },
        report.applied(),
        report.failed()
    );
    if report.skipped() > 0 {
        let _ = write!(line, ", {} skipped", report.skipped());
    }
    line
}

fn pair_text(action: Action, pair: &PortPair) -> String {
    format!(
        "[{}:{}] {} [{}:{}]",
        pair.source.client(),
        pair.source.name(),
        action.arrow(),
        pair.dest.client(),
        pair.dest.name()
    )
}

/// JSON record of one pair outcome.
#[derive(Debug, Serialize)]
pub struct OutcomeRecord {
    pub source: String,
    pub dest: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ActionOutcome> for OutcomeRecord {
    fn from(outcome: &ActionOutcome) -> Self {
        let (status, error) = match &outcome.status {
            ActionStatus::Applied => ("applied", None),
            ActionStatus::Failed(e) => ("failed", Some(e.to_string())),
            ActionStatus::Skipped => ("skipped", None),
        };
        Self {
            source: outcome.pair.source.to_string(),
            dest: outcome.pair.dest.to_string(),
            status,
            error,
        }
    }
}

/// JSON document for a whole batch.
#[derive(Debug, Serialize)]
pub struct BatchRecord {
    pub action: Action,
    pub outcomes: Vec<OutcomeRecord>,
}

impl From<&BatchReport> for BatchRecord {
    fn from(report: &BatchReport) -> Self {
        Self {
            action: report.action,
            outcomes: report.outcomes.iter().map(OutcomeRecord::from).collect(),
        }
    }
}

/// Text listing of clients and their ports.
pub fn clients_text(clients: &[Client]) -> String {
    let mut out = String::new();
    for client in clients {
        let _ = writeln!(out, "{client} (id {})", client.id());
        for port in client.ports() {
            let _ = writeln!(out, "\t{}", port_text(port));
        }
    }
    out
}

/// Text listing of ports.
pub fn ports_text<'a>(ports: impl IntoIterator<Item = &'a Port>) -> String {
    let mut out = String::new();
    for port in ports {
        let _ = writeln!(out, "{}", port_text(port));
    }
    out
}

/// Text listing of connections.
pub fn connections_text(connections: &[Connection]) -> String {
    let mut out = String::new();
    for connection in connections {
        let _ = writeln!(out, "{connection}");
    }
    out
}

fn port_text(port: &Port) -> String {
    let direction = match (port.is_input(), port.is_output()) {
        (true, true) => "in/out",
        (true, false) => "in",
        (false, true) => "out",
        (false, false) => "-",
    };
    let physical = if port.is_physical() { " physical" } else { "" };
    format!("{port}  {} {direction}{physical}", port.media_type())
}
