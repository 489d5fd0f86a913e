//! Conflict detection for moving an event to a new instant.
//!
//! A recurring event blocks its whole occurrence day, whatever its own time
//! of day. A one-time event blocks only its exact local minute.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::clock::LocalClock;
use crate::event::Event;
use crate::recurrence::occurs_on;

/// The first event, other than `moving`, that already occupies `proposed`.
///
/// Events are compared by id, so `moving` never conflicts with itself.
pub fn find_conflict<'a>(
    events: &'a [Event],
    moving: &Event,
    proposed: DateTime<Utc>,
    clock: &LocalClock,
) -> Option<&'a Event> {
    let proposed_day = clock.civil_date(proposed);
    let proposed_minute = truncate_to_minute(clock.local_datetime(proposed));

    let found = events.iter().filter(|e| e.id != moving.id).find(|e| {
        if e.is_recurring() {
            occurs_on(e, proposed_day, clock)
        } else {
            truncate_to_minute(clock.local_datetime(e.date_time)) == proposed_minute
        }
    });

    if let Some(blocking) = found {
        tracing::debug!(
            moving = %moving.id,
            blocking = %blocking.id,
            recurring = blocking.is_recurring(),
            proposed = %proposed,
            "schedule_conflict_found"
        );
    }
    found
}

/// Whether any event other than `moving` already occupies `proposed`.
pub fn has_conflict(
    events: &[Event],
    moving: &Event,
    proposed: DateTime<Utc>,
    clock: &LocalClock,
) -> bool {
    find_conflict(events, moving, proposed, clock).is_some()
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}
