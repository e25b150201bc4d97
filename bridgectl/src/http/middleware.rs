//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, URI, status and duration of every request.
///
/// Successful requests are logged at info level, everything else at error
/// level.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_success() {
        log::info!("{method} {uri} -> {} ({duration_ms} ms)", status.as_u16());
    } else {
        log::error!("{method} {uri} -> {} ({duration_ms} ms)", status.as_u16());
    }

    response
}
