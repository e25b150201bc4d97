//! Request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use super::AppState;
use crate::Error;

/// Handles `GET /api/request`.
///
/// The search performs blocking socket calls, so it runs on tokio's blocking
/// pool. Responds `200 text/plain` with the port number, or with the status
/// of the error that ended the search.
///
/// # Errors
///
/// - `PortExhausted`: every port in the search window was occupied
/// - `OccupancyCheckFailed`: a check could not be carried out
/// - `Worker`: the blocking task panicked or was cancelled
pub async fn request_port_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Error> {
    let port = tokio::task::spawn_blocking(move || state.prober().find_available()).await??;

    log::info!("handing out port {port}");
    Ok(([(header::CONTENT_TYPE, "text/plain")], port.to_string()))
}

/// Answers every unknown path or method with a 404.
pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
