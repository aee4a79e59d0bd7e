//! Error taxonomy for the booking service operations.
//!
//! Validation errors are detected and returned before any store access.
//! Store-transaction errors abort the entire atomic unit; no partial writes
//! are ever visible. Notification errors never reach this taxonomy; they
//! are logged and swallowed at the dispatch boundary.

use crate::environment::StoreError;
use crate::types::SlotId;
use thiserror::Error;

/// Errors surfaced by `BookingService` operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was absent or blank. Checked before any store
    /// access; always recoverable by resubmitting with correct input.
    #[error("missing required parameter: {name}")]
    MissingParameter {
        /// Name of the absent parameter.
        name: &'static str,
    },

    /// The store read behind the slot query failed. Not retried by this
    /// service; the caller may retry.
    #[error("slot query failed: {0}")]
    QueryFailed(#[source] StoreError),

    /// The slot was already claimed when the booking transaction ran its
    /// availability condition, meaning a concurrent winner got there first. The
    /// caller may retry against a refreshed slot listing.
    #[error("slot {slot_id} is no longer available")]
    SlotUnavailable {
        /// The contested slot.
        slot_id: SlotId,
    },

    /// The booking transaction failed for a reason other than losing the
    /// availability race: store unavailable, timeout, or backend error.
    /// No partial state is visible.
    #[error("booking transaction failed: {0}")]
    BookingFailed(#[source] StoreError),
}

impl Error {
    /// Builds a `MissingParameter` error for the named input.
    #[must_use]
    pub const fn missing(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_the_field() {
        let err = Error::missing("guide_id");
        assert_eq!(err.to_string(), "missing required parameter: guide_id");
    }

    #[test]
    fn slot_unavailable_names_the_slot() {
        let err = Error::SlotUnavailable {
            slot_id: SlotId::new("s1"),
        };
        assert_eq!(err.to_string(), "slot s1 is no longer available");
    }
}
