//! Reservation cutoff gate.
//!
//! Requests against an event are mutable only while the event is active and
//! the clock has not reached its cutoff time. The gate applies to request
//! creation, item changes, selection updates, and withdrawal. It does not
//! apply to event edits, admin status transitions, or comments.
use crate::error::{EngineError, EngineResult};
use crate::model::MealEvent;
use chrono::{DateTime, Utc};

/// Whether requests against this event may still change at `now`.
///
/// The boundary instant is frozen: at exactly the cutoff time the event is
/// no longer mutable.
pub fn is_mutable(event: &MealEvent, now: DateTime<Utc>) -> bool {
    event.is_active && now < event.cutoff_time
}

/// Gate a request mutation, reporting which condition failed.
///
/// Inactivity is reported before cutoff expiry so a withdrawn event reads as
/// "not active" rather than "past cutoff".
pub fn require_mutable(event: &MealEvent, now: DateTime<Utc>) -> EngineResult<()> {
    if !event.is_active {
        return Err(EngineError::Validation(format!(
            "meal event {} is not active",
            event.id
        )));
    }
    if now >= event.cutoff_time {
        return Err(EngineError::Validation(format!(
            "cutoff time for meal event {} has passed",
            event.id
        )));
    }
    Ok(())
}
