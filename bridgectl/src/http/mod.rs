//! HTTP front end.
//!
//! One meaningful route, `GET /api/request`, answered with the decimal
//! number of a free port. Every other path or method gets a 404.

pub mod handlers;
pub mod middleware;

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::ControllerConfig;
use crate::port::occupancy::PortOccupancyChecker;
use crate::port::prober::PortProber;
use crate::Result;

pub use handlers::{not_found_handler, request_port_handler};
pub use middleware::log_request;

/// Path of the port request endpoint.
pub const REQUEST_PATH: &str = "/api/request";

/// Prober type shared by all requests.
pub type SharedProber = PortProber<Box<dyn PortOccupancyChecker>>;

/// State shared by the request handlers.
///
/// Holds nothing mutable: every request runs its own search.
pub struct AppState {
    prober: SharedProber,
}

impl AppState {
    /// Builds the state from the startup configuration and a checker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured search window is empty.
    pub fn new(config: &ControllerConfig, checker: Box<dyn PortOccupancyChecker>) -> Result<Self> {
        let prober = PortProber::new(checker, config.base_port, config.search_limit)?;
        Ok(Self { prober })
    }

    /// The prober used by `GET /api/request`.
    #[must_use]
    pub fn prober(&self) -> &SharedProber {
        &self.prober
    }
}

/// Builds the route table.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use bridgectl::config::ControllerConfig;
/// use bridgectl::http::{router, AppState};
/// use bridgectl::port::occupancy::MockOccupancyChecker;
///
/// let state = AppState::new(
///     &ControllerConfig::default(),
///     Box::new(MockOccupancyChecker::empty()),
/// ).unwrap();
/// let app = router(Arc::new(state));
/// ```
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            REQUEST_PATH,
            get(request_port_handler).fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        .layer(axum::middleware::from_fn(log_request))
        .with_state(state)
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the server stops with an I/O
/// error.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!(
            "listening on {addr}, handing out ports from {}",
            state.prober().search_range()
        );
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("server stopped");
    Ok(())
}
