//! Command-line interface definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use jackpatch_core::MediaType;

/// Connect/disconnect JACK ports consecutively by matching them with regular expressions.
///
/// Patterns match from the start of a client or port name. The i-th matching
/// source output is paired with the i-th matching destination input.
#[derive(Debug, Parser)]
#[command(name = "jackpatch", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read the graph from a file written by `jackpatch dump` instead of D-Bus
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Require patterns to match whole names instead of a prefix
    #[arg(long, global = true)]
    pub full_match: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect matching source ports to matching destination ports
    Connect(PatchArgs),
    /// Disconnect matching source ports from matching destination ports
    Disconnect(PatchArgs),
    /// List clients
    Clients(ClientsArgs),
    /// List ports
    Ports(PortsArgs),
    /// List connections
    Connections,
    /// Print the raw graph snapshot as JSON (loadable with --snapshot)
    Dump,
}

/// Port selection and pairing options shared by connect and disconnect.
#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Regex for the source jack client [default: system|firewire_pcm]
    #[arg(long)]
    pub sclient: Option<String>,

    /// Regex for the source jack port [default: .*]
    #[arg(long)]
    pub sport: Option<String>,

    /// Regex for the destination jack client [default: system|firewire_pcm]
    #[arg(long)]
    pub dclient: Option<String>,

    /// Regex for the destination jack port [default: .*]
    #[arg(long)]
    pub dport: Option<String>,

    /// Limit the number of consecutive connections; negative means no limit
    #[arg(
        long = "number-of-ports",
        short = 'n',
        default_value_t = -1,
        allow_negative_numbers = true,
        value_name = "NUMBER_OF_PORTS"
    )]
    pub number_of_ports: i64,

    /// The index of the first source match to be connected
    #[arg(long, default_value_t = 0)]
    pub sstart: usize,

    /// The index of the first destination match to be connected
    #[arg(long, default_value_t = 0)]
    pub dstart: usize,

    /// Print the pairs without connecting or disconnecting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failed pair
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Debug, Args)]
pub struct ClientsArgs {
    /// Only clients with this process ID
    #[arg(long, conflicts_with_all = ["name", "system"])]
    pub pid: Option<i64>,

    /// Only clients whose name matches this regex
    #[arg(long, conflicts_with = "system")]
    pub name: Option<String>,

    /// Only the hardware I/O clients (system|firewire_pcm)
    #[arg(long)]
    pub system: bool,
}

#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Regex for the client name
    #[arg(long)]
    pub client: Option<String>,

    /// Regex for the port name
    #[arg(long)]
    pub port: Option<String>,

    /// Only input ports
    #[arg(long, conflicts_with = "outputs")]
    pub inputs: bool,

    /// Only output ports
    #[arg(long)]
    pub outputs: bool,

    /// Only physical ports
    #[arg(long)]
    pub physical: bool,

    /// Only ports of this media type
    #[arg(long = "type", value_enum)]
    pub media_type: Option<MediaArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaArg {
    Audio,
    Midi,
    Unknown,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Audio => Self::Audio,
            MediaArg::Midi => Self::Midi,
            MediaArg::Unknown => Self::Unknown,
        }
    }
}
