//! CLI structure and argument definitions.

use std::net::SocketAddr;

use bridgectl::config::DEFAULT_LISTEN_PORT;
use bridgectl::{BindOccupancyChecker, CommandOccupancyChecker, PortOccupancyChecker};
use clap::Parser;

/// Hand out free TCP ports over HTTP.
#[derive(Parser, Debug)]
#[command(name = "bridgectl")]
#[command(version, about = "Hand out free TCP ports over HTTP", long_about = None)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(
        long,
        value_name = "ADDR",
        env = "BRIDGECTL_LISTEN",
        default_value_t = default_listen()
    )]
    pub listen: SocketAddr,

    /// Program that decides whether a port is occupied
    ///
    /// Run as `PROGRAM [ARG...] PORT`; printing 0 means the port is free.
    /// Without it, ports are checked by binding them directly.
    #[arg(long, value_name = "PROGRAM")]
    pub check_command: Option<String>,

    /// Argument passed to the check program before the port
    #[arg(
        long = "check-arg",
        value_name = "ARG",
        requires = "check_command",
        allow_hyphen_values = true
    )]
    pub check_args: Vec<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_LISTEN_PORT))
}

impl Cli {
    /// Builds the occupancy checker selected on the command line.
    #[must_use]
    pub fn checker(&self) -> Box<dyn PortOccupancyChecker> {
        match &self.check_command {
            Some(program) => Box::new(
                CommandOccupancyChecker::new(program).args(self.check_args.iter().cloned()),
            ),
            None => Box::new(BindOccupancyChecker),
        }
    }
}
