//! Drag-and-drop rescheduling decisions.
//!
//! A move keeps the event's local time of day and swaps in the target date.
//! Both the "can it drop here" gate and the drop itself go through
//! [`propose_reschedule`] against whatever collection the caller holds at
//! that moment. Nothing here mutates the collection; an accepted proposal is
//! written back by the caller.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::clock::LocalClock;
use crate::conflict::find_conflict;
use crate::error::ScheduleError;
use crate::event::{Event, EventId};

/// Why a move was refused: another event already holds the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictWarning {
    /// The event that was being moved.
    pub moving: EventId,
    /// The event already occupying the slot.
    pub blocking: Event,
    /// The instant the move would have produced.
    pub attempted: DateTime<Utc>,
    /// `attempted` on the local wall clock, for display.
    pub attempted_local: NaiveDateTime,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "there is already an event at {} ('{}'); please choose a different time or day",
            self.attempted_local.format("%Y-%m-%d %H:%M"),
            self.blocking.title
        )
    }
}

/// Outcome of proposing a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reschedule {
    /// The slot is free; the caller should set `date_time` to `at`.
    Accepted { event_id: EventId, at: DateTime<Utc> },
    /// The slot is taken. The collection must stay unchanged.
    Rejected(ConflictWarning),
    /// Recurring events are never moved individually.
    NotMovable { event_id: EventId },
}

impl Reschedule {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Reschedule::Accepted { .. })
    }

    /// The accepted instant, or the refusal as an error.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Conflict`] for a rejected move and
    /// [`ScheduleError::NotMovable`] for a recurring event.
    pub fn into_result(self) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            Reschedule::Accepted { at, .. } => Ok(at),
            Reschedule::Rejected(warning) => Err(ScheduleError::Conflict(Box::new(warning))),
            Reschedule::NotMovable { event_id } => Err(ScheduleError::NotMovable(format!(
                "'{}' is recurring and cannot be moved",
                event_id
            ))),
        }
    }
}

/// The instant `event` would land on if dropped on `target`: the target
/// date at the event's local `hour:minute:00.000`.
pub fn proposed_instant(event: &Event, target: NaiveDate, clock: &LocalClock) -> DateTime<Utc> {
    let time = clock.local_time(event.date_time);
    clock.at(target, time.hour(), time.minute())
}

/// Decide whether event `id` may move to the calendar day `target`.
///
/// # Errors
///
/// Returns [`ScheduleError::NotFound`] if no event has that id.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use schedule_engine::{propose_reschedule, Event, EventId, LocalClock, Reschedule};
///
/// let clock = LocalClock::default();
/// let events = vec![
///     Event::new("a", "A", Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
///     Event::new("b", "B", Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap()),
/// ];
/// let target = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let outcome = propose_reschedule(&events, &EventId::from("b"), target, &clock).unwrap();
/// assert!(matches!(outcome, Reschedule::Rejected(_)));
/// ```
pub fn propose_reschedule(
    events: &[Event],
    id: &EventId,
    target: NaiveDate,
    clock: &LocalClock,
) -> Result<Reschedule, ScheduleError> {
    let moving = events
        .iter()
        .find(|e| &e.id == id)
        .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

    if !moving.can_drag() {
        return Ok(Reschedule::NotMovable {
            event_id: moving.id.clone(),
        });
    }

    let proposed = proposed_instant(moving, target, clock);

    match find_conflict(events, moving, proposed, clock) {
        Some(blocking) => Ok(Reschedule::Rejected(ConflictWarning {
            moving: moving.id.clone(),
            blocking: blocking.clone(),
            attempted: proposed,
            attempted_local: clock.local_datetime(proposed),
        })),
        None => Ok(Reschedule::Accepted {
            event_id: moving.id.clone(),
            at: proposed,
        }),
    }
}

/// The pre-drop gate: true only when a drop on `target` would be accepted.
pub fn can_drop(events: &[Event], id: &EventId, target: NaiveDate, clock: &LocalClock) -> bool {
    matches!(
        propose_reschedule(events, id, target, clock),
        Ok(Reschedule::Accepted { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Recurrence;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc() -> LocalClock {
        LocalClock::default()
    }

    #[test]
    fn test_move_keeps_time_of_day() {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 9, 15, 33).unwrap();
        let events = vec![Event::new("a", "A", start)];
        let outcome = propose_reschedule(&events, &"a".into(), date(2024, 6, 20), &utc()).unwrap();
        assert_eq!(
            outcome,
            Reschedule::Accepted {
                event_id: "a".into(),
                at: at(2024, 6, 20, 9, 15),
            }
        );
    }

    #[test]
    fn test_move_onto_occupied_minute_is_rejected() {
        let events = vec![
            Event::new("a", "A", at(2024, 6, 10, 9, 0)),
            Event::new("b", "B", at(2024, 6, 3, 9, 0)),
        ];
        let outcome = propose_reschedule(&events, &"b".into(), date(2024, 6, 10), &utc()).unwrap();
        let Reschedule::Rejected(warning) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(warning.blocking.id.as_str(), "a");
        assert_eq!(warning.moving.as_str(), "b");
        assert_eq!(warning.attempted, at(2024, 6, 10, 9, 0));
        assert!(warning.to_string().contains("2024-06-10 09:00"));
    }

    #[test]
    fn test_one_minute_later_is_accepted() {
        let events = vec![
            Event::new("a", "A", at(2024, 6, 10, 9, 0)),
            Event::new("b", "B", at(2024, 6, 3, 9, 1)),
        ];
        let outcome = propose_reschedule(&events, &"b".into(), date(2024, 6, 10), &utc()).unwrap();
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_recurring_day_rejects_any_time() {
        let events = vec![
            Event::new("w", "Weekly", at(2024, 1, 1, 9, 0)).with_recurrence(Recurrence::Weekly),
            Event::new("b", "B", at(2024, 1, 3, 15, 0)),
        ];
        let outcome = propose_reschedule(&events, &"b".into(), date(2024, 1, 8), &utc()).unwrap();
        assert!(matches!(outcome, Reschedule::Rejected(ref w) if w.blocking.id.as_str() == "w"));
        assert!(!can_drop(&events, &"b".into(), date(2024, 1, 8), &utc()));
        assert!(can_drop(&events, &"b".into(), date(2024, 1, 9), &utc()));
    }

    #[test]
    fn test_recurring_event_is_not_movable() {
        let events = vec![
            Event::new("d", "Daily", at(2024, 1, 1, 9, 0)).with_recurrence(Recurrence::Daily),
        ];
        let outcome = propose_reschedule(&events, &"d".into(), date(2024, 2, 1), &utc()).unwrap();
        assert_eq!(outcome, Reschedule::NotMovable { event_id: "d".into() });
        assert!(!can_drop(&events, &"d".into(), date(2024, 2, 1), &utc()));

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, ScheduleError::NotMovable(_)));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let err = propose_reschedule(&[], &"ghost".into(), date(2024, 1, 1), &utc()).unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound(_)));
        assert!(!can_drop(&[], &"ghost".into(), date(2024, 1, 1), &utc()));
    }

    #[test]
    fn test_rejected_into_result_is_conflict_error() {
        let events = vec![
            Event::new("a", "A", at(2024, 6, 10, 9, 0)),
            Event::new("b", "B", at(2024, 6, 3, 9, 0)),
        ];
        let err = propose_reschedule(&events, &"b".into(), date(2024, 6, 10), &utc())
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(err.to_string().starts_with("Conflict: there is already an event"));
    }

    #[test]
    fn test_time_of_day_read_in_local_zone() {
        let ny = LocalClock::from_name("America/New_York").unwrap();
        // 13:00 UTC in June is 09:00 EDT; in January 09:00 is EST, 14:00 UTC.
        let events = vec![Event::new("a", "A", at(2024, 6, 10, 13, 0))];
        let outcome = propose_reschedule(&events, &"a".into(), date(2024, 1, 10), &ny).unwrap();
        assert_eq!(outcome.into_result().unwrap(), at(2024, 1, 10, 14, 0));
    }
}
