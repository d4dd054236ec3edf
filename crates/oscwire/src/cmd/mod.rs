use std::net::SocketAddr;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::CliResult;

pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one OSC message and send it.
    Send(SendArgs),
    /// Decode and print received OSC messages.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args),
        Command::Listen(args) => listen::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// OSC address pattern (must start with '/').
    pub address: String,

    /// Arguments as TAG:VALUE literals: i:42, f:440.0, d:2.5, h:900,
    /// s:text, b:HEX, m:HEX4, or bare T, F, N, I.
    pub args: Vec<String>,

    /// Destination UDP address.
    #[arg(long, value_name = "HOST:PORT", conflicts_with = "slip")]
    pub to: Option<SocketAddr>,

    /// Local UDP address to send from.
    #[arg(long, value_name = "HOST:PORT", default_value = "0.0.0.0:0")]
    pub bind: SocketAddr,

    /// Write a SLIP-framed packet to stdout instead of sending UDP.
    #[arg(long)]
    pub slip: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// UDP address to listen on.
    #[arg(long, value_name = "HOST:PORT", default_value = "0.0.0.0:9000")]
    pub bind: SocketAddr,

    /// Read SLIP-framed packets from stdin instead of UDP.
    #[arg(long)]
    pub slip: bool,

    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,

    /// Output format for decoded messages.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
