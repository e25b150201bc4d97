//! Main entry point for bridgectl.
//!
//! Serves `GET /api/request` on port 5480 and answers with the first free
//! TCP port at or above 10000.

use bridgectl_server::error::CliError;
use bridgectl_server::{run, shutdown_signal, Cli};
use clap::Parser;

#[tokio::main]
async fn main() {
    // Help and version go to stdout with exit code 0; anything else is a usage error.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(CliError::InvalidArguments(e.kind().to_string()).exit_code());
        }
    };

    let logger = bridgectl::init_logger(cli.verbose, cli.quiet);
    if let Err(e) = logger.install() {
        eprintln!("Warning: logging disabled: {e}");
    }

    match run(cli, shutdown_signal()).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
