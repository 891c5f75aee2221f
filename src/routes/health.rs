// src/routes/health.rs
//! Health check endpoint for the monitoring service.
//!
//! Defines the `/health` route used by container orchestrators and CI
//! pipelines to verify that the service is up and able to respond. The
//! gateway (`mod.rs`) merges this subrouter into the top-level router so
//! that the binary does not need to know about individual endpoints.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
///
/// Deliberately lightweight: does not touch the upstream API, the alert
/// sink, or any shared state.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it merges cleanly with the
/// gateway router regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
