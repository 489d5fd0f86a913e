//! Local wall-clock view of stored instants.
//!
//! Events store absolute instants (`DateTime<Utc>`), but every scheduling
//! rule is phrased in local calendar fields: year, month, day, weekday,
//! hour and minute. A [`LocalClock`] pins the time zone those fields are read
//! in, so the same collection evaluates identically on every machine.
//!
//! All functions take explicit inputs. Nothing here reads the system clock;
//! callers pass "now" when they need it.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::ScheduleError;

/// Formats accepted for wall-clock input, tried in order.
const LOCAL_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// The time zone in which calendar fields are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    tz: Tz,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl LocalClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a clock from an IANA zone name such as `"America/New_York"`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] for unknown zone names.
    pub fn from_name(name: &str) -> Result<Self, ScheduleError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ScheduleError::InvalidTimezone(format!("'{}'", name)))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The local wall-clock reading of `instant`.
    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// The civil date (local year/month/day) of `instant`.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    /// The local time of day of `instant`.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        self.local_datetime(instant).time()
    }

    /// The local date of "now".
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.civil_date(now)
    }

    /// Local midnight of `date`, or the first instant after it when midnight
    /// falls inside a DST gap.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve_local(date.and_time(NaiveTime::MIN))
    }

    /// `hour:minute:00.000` local time on `date`.
    ///
    /// A wall-clock time skipped by a DST transition is read with the offset
    /// in effect before the transition, which moves it forward by the gap.
    /// Repeated wall-clock times resolve to their earlier instant.
    /// Out-of-range fields are clamped to `23:59`.
    pub fn at(&self, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
        let time =
            NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN);
        self.resolve_local(date.and_time(time))
    }

    /// Parse user input into an instant.
    ///
    /// RFC 3339 strings are absolute. Anything else is read as local
    /// wall-clock time: `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS`, or the
    /// same with a space instead of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDatetime`] when no format matches.
    pub fn parse_local(&self, input: &str) -> Result<DateTime<Utc>, ScheduleError> {
        let s = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        LOCAL_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| self.resolve_local(naive))
            .ok_or_else(|| ScheduleError::InvalidDatetime(format!("'{}'", input)))
    }

    /// Format `instant` as local `YYYY-MM-DDTHH:MM`, the shape
    /// [`parse_local`](Self::parse_local) reads back.
    pub fn format_input(&self, instant: DateTime<Utc>) -> String {
        self.local_datetime(instant)
            .format("%Y-%m-%dT%H:%M")
            .to_string()
    }

    /// Human-readable local rendering, e.g. `"Mon, Jun 10 2024 09:00"`.
    pub fn format_display(&self, instant: DateTime<Utc>) -> String {
        self.local_datetime(instant)
            .format("%a, %b %-d %Y %H:%M")
            .to_string()
    }

    fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let before = self
                    .tz
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                Utc.from_utc_datetime(&utc)
            }
        }
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidDatetime`] if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ScheduleError::InvalidDatetime(format!("'{}': {}", input, e)))
}
