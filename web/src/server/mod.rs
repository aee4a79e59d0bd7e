//! HTTP server module for the booking service.
//!
//! This module provides the Axum-based HTTP server with:
//! - Health check endpoints
//! - Router configuration

pub mod health;
pub mod routes;

pub use health::health_check;
pub use routes::build_router;
