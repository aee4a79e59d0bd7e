//! Slot availability query: validate, filter, order.
//!
//! Read-only and idempotent: repeating an identical query with no
//! intervening writes yields the same result set in the same order.

use super::{optional, required, BookingService};
use crate::error::Error;
use crate::types::{GuideId, PlanId, Slot, SlotQuery, SlotView};
use std::cmp::Ordering;

impl BookingService {
    /// Lists the slots matching the query, ordered chronologically.
    ///
    /// Validation runs before any store access. The guide-equality filter is
    /// delegated to the store; mode and plan filtering and the ordering are
    /// applied here:
    ///
    /// 1. retain slots whose mode equals the case-normalized input;
    /// 2. when a plan is supplied, retain slots that are unrestricted or
    ///    list that plan (excluded slots are filtered, not errors);
    /// 3. sort ascending by (date, time), missing values last.
    ///
    /// An empty result is success, not an error.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] when the guide identifier or mode is
    ///   absent or blank;
    /// - [`Error::QueryFailed`] when the store read fails or times out.
    pub async fn list_slots(&self, query: SlotQuery) -> Result<Vec<SlotView>, Error> {
        let guide_id = GuideId::new(required(query.guide_id, "guide_id")?);
        let mode = required(query.mode, "mode")?.to_lowercase();
        let plan = optional(query.plan).map(PlanId::new);

        let mut slots = self
            .with_timeout(self.env.store.query_slots(&guide_id))
            .await
            .map_err(Error::QueryFailed)?;

        slots.retain(|slot| slot.mode.as_str() == mode);
        if let Some(plan) = &plan {
            slots.retain(|slot| slot.allows_plan(plan));
        }
        slots.sort_by(schedule_order);

        tracing::debug!(
            guide_id = %guide_id,
            mode = %mode,
            matches = slots.len(),
            "slot query served"
        );

        Ok(slots.into_iter().map(SlotView::from).collect())
    }
}

/// Total chronological order over slots: ascending by (date, time) with
/// missing or unparseable values sorting last on each component.
fn schedule_order(a: &Slot, b: &Slot) -> Ordering {
    missing_last(a.date.as_ref(), b.date.as_ref())
        .then_with(|| missing_last(a.time.as_ref(), b.time.as_ref()))
}

/// Compares two optional values, treating `None` as greater than any value.
fn missing_last<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
