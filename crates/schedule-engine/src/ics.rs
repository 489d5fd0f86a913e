//! iCalendar (RFC 5545) export.
//!
//! Each event becomes one `VEVENT` lasting one hour from its anchor
//! occurrence. Recurrence is not written out: a weekly event exports as its
//! first occurrence only.

use chrono::{DateTime, Datelike, Utc};

use crate::error::ScheduleError;
use crate::event::Event;

/// Page that imports an uploaded `.ics` file into Google Calendar.
pub const GOOGLE_CALENDAR_IMPORT_URL: &str = "https://calendar.google.com/calendar/u/0/r/import";

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "events.ics";

const PRODID: &str = "-//schedule-engine//month calendar//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Render `events` as a `VCALENDAR` document with CRLF line endings.
///
/// `stamp` is written as every event's `DTSTAMP`.
///
/// # Errors
///
/// Returns [`ScheduleError::Export`] if an event has a blank title or a
/// start outside the years iCalendar can represent.
pub fn export_ics(events: &[Event], stamp: DateTime<Utc>) -> Result<String, ScheduleError> {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "METHOD:PUBLISH");

    let dtstamp = format_utc(stamp)?;
    for event in events {
        write_event(&mut out, event, &dtstamp)?;
    }

    push_line(&mut out, "END:VCALENDAR");
    tracing::debug!(count = events.len(), bytes = out.len(), "ics_exported");
    Ok(out)
}

fn write_event(out: &mut String, event: &Event, dtstamp: &str) -> Result<(), ScheduleError> {
    if event.title.trim().is_empty() {
        return Err(ScheduleError::Export(format!(
            "event '{}' has no title",
            event.id
        )));
    }
    let start = format_utc(event.date_time)?;

    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}", escape_text(event.id.as_str())));
    push_line(out, &format!("SUMMARY:{}", escape_text(&event.title)));
    push_line(out, &format!("DTSTAMP:{dtstamp}"));
    push_line(out, &format!("DTSTART:{start}"));
    push_line(out, "DURATION:PT1H");
    push_line(
        out,
        &format!(
            "DESCRIPTION:{}",
            escape_text(event.description.as_deref().unwrap_or(""))
        ),
    );
    push_line(out, "STATUS:CONFIRMED");
    if let Some(category) = &event.category {
        push_line(out, &format!("CATEGORIES:{}", escape_text(category)));
    }
    push_line(out, "END:VEVENT");
    Ok(())
}

/// UTC date-time truncated to the minute, e.g. `20240610T090000Z`.
fn format_utc(dt: DateTime<Utc>) -> Result<String, ScheduleError> {
    if !(0..=9999).contains(&dt.year()) {
        return Err(ScheduleError::Export(format!(
            "year {} cannot be written to a calendar file",
            dt.year()
        )));
    }
    Ok(dt.format("%Y%m%dT%H%M00Z").to_string())
}

fn escape_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Append `line` folded to at most 75 octets per physical line.
fn push_line(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            // The leading space counts against the continuation line.
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}
