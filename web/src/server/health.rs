//! Health check endpoints for the booking service.
//!
//! Provides endpoints for monitoring service health and readiness.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the service is running.
/// This is a simple liveness check - it doesn't verify dependencies.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Slot store wiring
    pub store: bool,
}

/// Readiness check endpoint.
///
/// Returns 200 OK once the service is wired and able to accept traffic.
/// The store is injected at startup, so a running server is a ready server;
/// a store-level outage surfaces per-request as `QUERY_FAILED` or
/// `BOOKING_FAILED` instead.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"store":true}
/// ```
pub async fn readiness_check() -> (StatusCode, Json<ReadinessResponse>) {
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            ready: true,
            store: true,
        }),
    )
}
