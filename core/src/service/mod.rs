//! The booking service: slot query, atomic booking transition, and
//! post-commit notification dispatch.
//!
//! Each operation is handled as an independent, stateless invocation; the
//! only state shared between invocations lives in the injected slot store.
//! The three paths are split across submodules:
//!
//! - [`query`]: read-only availability listing (validate → filter → order);
//! - [`booking`]: the atomic slot-claim + booking-create transition;
//! - [`notify`]: best-effort notification dispatch, detached from the
//!   booking's consistency boundary.

mod booking;
mod notify;
mod query;

use crate::environment::{BookingEnvironment, StoreError};
use crate::error::Error;
use std::future::Future;

/// Stateless facade over the injected environment implementing the service
/// operations.
///
/// Cheap to clone; handlers typically hold it behind an `Arc` in shared
/// application state.
#[derive(Clone)]
pub struct BookingService {
    env: BookingEnvironment,
}

impl BookingService {
    /// Creates a service over the given environment.
    #[must_use]
    pub const fn new(env: BookingEnvironment) -> Self {
        Self { env }
    }

    /// Accessor used by the notification path and tests.
    #[must_use]
    pub const fn environment(&self) -> &BookingEnvironment {
        &self.env
    }

    /// Applies the configured store deadline to one store round-trip.
    async fn with_timeout<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.env.store_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

/// Unwraps a required string parameter, treating blank input as absent.
fn required(value: Option<String>, name: &'static str) -> Result<String, Error> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::missing(name)),
    }
}

/// Drops blank optional parameters so they behave exactly like absent ones.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
