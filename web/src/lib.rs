//! # Slotwell Web
//!
//! Axum HTTP layer for the slot booking service.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (query parameters, JSON body)
//! 3. **Call the booking service** held in [`AppState`]
//! 4. **Map the result** to a JSON response, or the error taxonomy to an
//!    HTTP status via [`AppError`]
//!
//! # Endpoints
//!
//! | Method | Path            | Purpose                          |
//! |--------|-----------------|----------------------------------|
//! | GET    | `/health`       | Liveness probe                   |
//! | GET    | `/ready`        | Readiness probe                  |
//! | GET    | `/api/slots`    | Slot availability query          |
//! | POST   | `/api/bookings` | Atomic slot booking transition   |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod sender;
pub mod server;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use error::AppError;
pub use sender::LogOnlyNotificationSender;
pub use server::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
