//! Recurrence matching: does an event occupy a given calendar day?
//!
//! Every rule except [`Recurrence::Custom`] compares local calendar fields
//! of the anchor (`event.date_time` read through a [`LocalClock`]) with the
//! candidate date. `Custom` instead counts elapsed time between the two
//! local midnights and floors it to whole days, so across a DST change the
//! count can land one day short. That difference is intentional and must
//! not be "fixed" by switching `Custom` to field arithmetic.
//!
//! Months that lack the anchor's day-of-month (e.g. day 31 in April) never
//! match a monthly or yearly event. No clamping to month end is performed.

use chrono::{Datelike, NaiveDate};

use crate::clock::LocalClock;
use crate::event::{Event, Recurrence};

/// Cadence of [`Recurrence::Custom`], in days.
pub const CUSTOM_INTERVAL_DAYS: i64 = 14;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whether `event` occurs on the calendar day `date`.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use schedule_engine::{occurs_on, Event, LocalClock, Recurrence};
///
/// let anchor = Utc.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap();
/// let event = Event::new("rent", "Pay rent", anchor).with_recurrence(Recurrence::Monthly);
/// let clock = LocalClock::default();
///
/// assert!(!occurs_on(&event, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), &clock));
/// assert!(occurs_on(&event, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), &clock));
/// ```
pub fn occurs_on(event: &Event, date: NaiveDate, clock: &LocalClock) -> bool {
    let anchor = clock.civil_date(event.date_time);

    match event.recurrence {
        Recurrence::None => date == anchor,
        Recurrence::Daily => date >= anchor,
        Recurrence::Weekly => date >= anchor && date.weekday() == anchor.weekday(),
        Recurrence::Monthly => date >= anchor && date.day() == anchor.day(),
        Recurrence::Yearly => {
            date >= anchor && date.day() == anchor.day() && date.month() == anchor.month()
        }
        Recurrence::Custom => {
            let days = elapsed_days(anchor, date, clock);
            days >= 0 && days % CUSTOM_INTERVAL_DAYS == 0
        }
    }
}

/// Whole days between the local midnights of `from` and `to`, floored.
fn elapsed_days(from: NaiveDate, to: NaiveDate, clock: &LocalClock) -> i64 {
    let elapsed = clock.start_of_day(to) - clock.start_of_day(from);
    elapsed.num_seconds().div_euclid(SECONDS_PER_DAY)
}
