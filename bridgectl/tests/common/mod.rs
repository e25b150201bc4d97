//! Common test utilities for integration tests.
//!
//! Builds routers around mock checkers and reads responses back into
//! plain values.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bridgectl::config::ControllerConfig;
use bridgectl::http::{router, AppState};
use bridgectl::port::occupancy::{MockOccupancyChecker, PortOccupancyChecker};

/// Status, `Content-Type` and body of a response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// Builds the app with the default configuration and the given checker.
#[allow(dead_code)]
pub fn app_with_checker(checker: impl PortOccupancyChecker + 'static) -> Router {
    app_with_config(&ControllerConfig::default(), checker)
}

/// Builds the app with an explicit configuration.
#[allow(dead_code)]
pub fn app_with_config(
    config: &ControllerConfig,
    checker: impl PortOccupancyChecker + 'static,
) -> Router {
    let state = AppState::new(config, Box::new(checker)).expect("valid test configuration");
    router(Arc::new(state))
}

/// Builds the app with the given ports occupied.
#[allow(dead_code)]
pub fn app_with_occupied(ports: impl IntoIterator<Item = u16>) -> Router {
    app_with_checker(MockOccupancyChecker::from_ports(ports))
}

/// Sends one request through the router and collects the response.
#[allow(dead_code)]
pub async fn send(app: Router, method: Method, uri: &str) -> TestResponse {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let content_type = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).expect("UTF-8 body"),
    }
}

/// Shorthand for a GET request.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri).await
}
