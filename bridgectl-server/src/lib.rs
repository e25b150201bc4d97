//! Library exports for bridgectl-server.
//!
//! The binary is a thin wrapper around [`run`]; the pieces are exported so
//! tests can drive them without spawning a process.

pub mod cli;
pub mod error;

use std::future::Future;
use std::sync::Arc;

use bridgectl::http::{self, AppState};
use bridgectl::ControllerConfig;
use tokio::net::TcpListener;

pub use cli::Cli;
use error::CliError;

/// Builds the configuration from parsed arguments and validates it.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the configuration is rejected.
pub fn load_configuration(cli: &Cli) -> Result<ControllerConfig, CliError> {
    let config = ControllerConfig::default().with_listen(cli.listen);
    config.validate()?;
    Ok(config)
}

/// Binds the listening socket and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the listening socket
/// cannot be bound, or the server stops with an I/O error.
pub async fn run<F>(cli: Cli, shutdown: F) -> Result<(), CliError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let config = load_configuration(&cli)?;
    let state = AppState::new(&config, cli.checker())?;

    let listener = TcpListener::bind(config.listen).await.map_err(|e| {
        log::error!("cannot listen on {}: {e}", config.listen);
        CliError::Io(e)
    })?;

    http::serve(listener, Arc::new(state), shutdown).await?;
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}
