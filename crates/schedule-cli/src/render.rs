//! Plain-text rendering of events and month grids.

use std::fmt::Write;

use chrono::NaiveDate;
use schedule_engine::{DayCell, Event, LocalClock};

const WEEKDAY_HEADER: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// `2024-06-10 09:00  Standup  [weekly] {work}  (id)`
pub fn event_line(event: &Event, clock: &LocalClock) -> String {
    let mut line = format!(
        "{}  {}",
        clock.local_datetime(event.date_time).format("%Y-%m-%d %H:%M"),
        event.title
    );
    if event.is_recurring() {
        let _ = write!(line, "  [{}]", event.recurrence);
    }
    if let Some(category) = &event.category {
        let _ = write!(line, "  {{{}}}", category);
    }
    let _ = write!(line, "  ({})", event.id);
    line
}

/// A month grid followed by the events of each day that has any.
///
/// Days outside the month are dimmed with a leading `·`, today is marked
/// with `*`, and days with events with `+`.
pub fn month_text(month: NaiveDate, cells: &[DayCell<'_>], clock: &LocalClock) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", month.format("%B %Y"));
    for name in WEEKDAY_HEADER {
        let _ = write!(out, "{name:>6}");
    }
    out.push('\n');

    for row in cells.chunks(7) {
        for cell in row {
            let _ = write!(out, "{:>6}", cell_label(cell));
        }
        out.push('\n');
    }

    let days: Vec<&DayCell<'_>> = cells.iter().filter(|c| !c.events.is_empty()).collect();
    if !days.is_empty() {
        out.push('\n');
    }
    for cell in days {
        let _ = writeln!(out, "{}", cell.date.format("%a %Y-%m-%d"));
        for event in &cell.events {
            let time = clock.local_time(event.date_time).format("%H:%M");
            let _ = write!(out, "  {time}  {}", event.title);
            if event.is_recurring() {
                let _ = write!(out, "  [{}]", event.recurrence);
            }
            let _ = writeln!(out, "  ({})", event.id);
        }
    }
    out.trim_end().to_string()
}

fn cell_label(cell: &DayCell<'_>) -> String {
    let day = cell.date.format("%-d").to_string();
    let mut label = if cell.in_month { day } else { format!("·{day}") };
    if cell.is_today {
        label.push('*');
    }
    if !cell.events.is_empty() {
        label.push('+');
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use schedule_engine::{day_cells, month_grid, EventFilter, Recurrence};

    #[test]
    fn test_event_line() {
        let clock = LocalClock::default();
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let event = Event::new("abc", "Standup", start)
            .with_recurrence(Recurrence::Weekly)
            .with_category("work");
        assert_eq!(
            event_line(&event, &clock),
            "2024-06-10 09:00  Standup  [weekly]  {work}  (abc)"
        );
    }

    #[test]
    fn test_month_text_marks_days() {
        let clock = LocalClock::default();
        let start = Utc.with_ymd_and_hms(2024, 6, 12, 14, 0, 0).unwrap();
        let events = vec![Event::new("a", "Dentist", start)];
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let grid = month_grid(today);
        let cells = day_cells(&grid, &events, &EventFilter::default(), &clock, today);

        let text = month_text(grid.month(), &cells, &clock);
        assert!(text.starts_with("June 2024\n"));
        assert!(text.contains("12*+"));
        assert!(text.contains("·26"));
        assert!(text.contains("Wed 2024-06-12\n  14:00  Dentist  (a)"));
    }
}
