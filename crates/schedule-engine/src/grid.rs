//! Sunday-first month grids and the per-cell event lists shown in them.

use chrono::{Datelike, Duration, NaiveDate};

use crate::clock::LocalClock;
use crate::event::Event;
use crate::filter::EventFilter;
use crate::recurrence::occurs_on;

/// One week row, Sunday through Saturday.
pub type Week = [NaiveDate; 7];

/// The dates shown for one month, padded to whole weeks with days from the
/// neighbouring months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: NaiveDate,
    weeks: Vec<Week>,
}

impl MonthGrid {
    /// First day of the month this grid was built for.
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn rows(&self) -> &[Week] {
        &self.weeks
    }

    /// Every cell date, in display order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flat_map(|week| week.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.weeks.len() * 7
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Whether `date` belongs to the grid's month (as opposed to overflow
    /// days from the previous or next month).
    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.month.year() && date.month() == self.month.month()
    }

    /// The row containing `date`, if the grid shows it.
    pub fn week_containing(&self, date: NaiveDate) -> Option<&Week> {
        self.weeks.iter().find(|week| week.contains(&date))
    }
}

/// Build the grid for the month containing `reference`.
///
/// Starts on the Sunday on or before the 1st and ends on the Saturday on or
/// after the last day, so the length is always a multiple of 7.
///
/// # Examples
///
/// ```
/// use chrono::{Datelike, NaiveDate, Weekday};
/// use schedule_engine::month_grid;
///
/// let grid = month_grid(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// let dates: Vec<_> = grid.dates().collect();
/// assert_eq!(dates.len() % 7, 0);
/// assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 5, 26).unwrap());
/// assert_eq!(dates.last().unwrap().weekday(), Weekday::Sat);
/// ```
pub fn month_grid(reference: NaiveDate) -> MonthGrid {
    let first = first_of_month(reference);
    let last = last_of_month(reference);

    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(6 - i64::from(last.weekday().num_days_from_sunday()));

    let mut weeks = Vec::with_capacity(6);
    let mut day = start;
    while day <= end {
        let mut week = [day; 7];
        for (offset, cell) in week.iter_mut().enumerate() {
            *cell = day + Duration::days(offset as i64);
        }
        weeks.push(week);
        day += Duration::days(7);
    }

    MonthGrid {
        month: first,
        weeks,
    }
}

/// First day of the month after the one containing `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    last_of_month(date) + Duration::days(1)
}

/// First day of the month before the one containing `date`.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(first_of_month(date) - Duration::days(1))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

// ── Cells ───────────────────────────────────────────────────────────────────

/// One rendered grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for overflow days from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    /// Filtered events occurring on `date`, in collection order.
    pub events: Vec<&'a Event>,
}

/// Pair every grid date with the (filtered) events that occur on it.
pub fn day_cells<'a>(
    grid: &MonthGrid,
    events: &'a [Event],
    filter: &EventFilter,
    clock: &LocalClock,
    today: NaiveDate,
) -> Vec<DayCell<'a>> {
    grid.dates()
        .map(|date| DayCell {
            date,
            in_month: grid.is_in_month(date),
            is_today: date == today,
            events: events
                .iter()
                .filter(|e| filter.matches(e) && occurs_on(e, date, clock))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Recurrence;
    use chrono::{TimeZone, Utc, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_june_2024_has_six_rows() {
        // June 1 2024 is a Saturday; June 30 is a Sunday.
        let grid = month_grid(date(2024, 6, 15));
        assert_eq!(grid.month(), date(2024, 6, 1));
        assert_eq!(grid.rows().len(), 6);
        assert_eq!(grid.rows()[0][0], date(2024, 5, 26));
        assert_eq!(grid.rows()[5][6], date(2024, 7, 6));
    }

    #[test]
    fn test_february_2015_fits_in_four_rows() {
        // Starts on a Sunday and ends on a Saturday: no overflow at all.
        let grid = month_grid(date(2015, 2, 10));
        assert_eq!(grid.len(), 28);
        assert!(grid.dates().all(|d| grid.is_in_month(d)));
    }

    #[test]
    fn test_overflow_days_are_not_in_month() {
        let grid = month_grid(date(2024, 6, 1));
        assert!(!grid.is_in_month(date(2024, 5, 31)));
        assert!(grid.is_in_month(date(2024, 6, 30)));
        assert!(!grid.is_in_month(date(2024, 7, 1)));
    }

    #[test]
    fn test_rows_start_sunday_end_saturday() {
        let grid = month_grid(date(2024, 12, 25));
        for week in grid.rows() {
            assert_eq!(week[0].weekday(), Weekday::Sun);
            assert_eq!(week[6].weekday(), Weekday::Sat);
        }
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        assert_eq!(next_month(date(2024, 12, 31)), date(2025, 1, 1));
        assert_eq!(previous_month(date(2024, 1, 15)), date(2023, 12, 1));
        assert_eq!(next_month(date(2024, 1, 31)), date(2024, 2, 1));
        assert_eq!(previous_month(date(2024, 3, 31)), date(2024, 2, 1));
    }

    #[test]
    fn test_week_containing() {
        let grid = month_grid(date(2024, 6, 1));
        let week = grid.week_containing(date(2024, 6, 12)).unwrap();
        assert_eq!(week[0], date(2024, 6, 9));
        assert!(grid.week_containing(date(2024, 8, 1)).is_none());
    }

    #[test]
    fn test_day_cells_place_recurring_and_one_time_events() {
        let clock = LocalClock::default();
        let events = vec![
            Event::new("once", "Dentist", Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap()),
            Event::new("weekly", "Standup", Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap())
                .with_recurrence(Recurrence::Weekly)
                .with_category("work"),
        ];
        let grid = month_grid(date(2024, 6, 1));
        let cells = day_cells(&grid, &events, &EventFilter::default(), &clock, date(2024, 6, 12));
        assert_eq!(cells.len(), grid.len());

        let june_12 = cells.iter().find(|c| c.date == date(2024, 6, 12)).unwrap();
        assert!(june_12.is_today);
        assert_eq!(june_12.events.len(), 1);
        assert_eq!(june_12.events[0].id.as_str(), "once");

        let mondays: Vec<_> = cells
            .iter()
            .filter(|c| c.events.iter().any(|e| e.id.as_str() == "weekly"))
            .map(|c| c.date)
            .collect();
        assert_eq!(
            mondays,
            vec![
                date(2024, 6, 3),
                date(2024, 6, 10),
                date(2024, 6, 17),
                date(2024, 6, 24),
                date(2024, 7, 1),
            ]
        );

        let work_only = EventFilter::new(Some("work".to_string()), None);
        let cells = day_cells(&grid, &events, &work_only, &clock, date(2024, 6, 12));
        assert!(cells.iter().all(|c| c.events.iter().all(|e| e.id.as_str() == "weekly")));
    }

    #[test]
    fn test_day_cells_outlive_the_filter() {
        let clock = LocalClock::default();
        let events = vec![Event::new(
            "a",
            "Dentist",
            Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap(),
        )];
        let grid = month_grid(date(2024, 6, 1));
        let cells = {
            let filter = EventFilter::new(None, Some("dent".to_string()));
            day_cells(&grid, &events, &filter, &clock, date(2024, 6, 12))
        };
        let june_12 = cells.iter().find(|c| c.date == date(2024, 6, 12)).unwrap();
        assert_eq!(june_12.events[0].title, "Dentist");
    }
}
