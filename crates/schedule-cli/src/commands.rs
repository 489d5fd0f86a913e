//! Subcommand handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use schedule_engine::{
    Calendar, EventFilter, EventForm, EventId, JsonFileStore, Recurrence, ScheduleError,
    GOOGLE_CALENDAR_IMPORT_URL,
};
use serde_json::json;

use crate::render;

type FileCalendar = Calendar<JsonFileStore>;

pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit(&self, value: serde_json::Value, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Form fields given on the command line; `None` leaves a field as it is.
pub struct Fields {
    pub title: Option<String>,
    pub at: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub recurrence: Option<Recurrence>,
}

impl Fields {
    fn apply(self, form: &mut EventForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(at) = self.at {
            form.date_time = at;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(color) = self.color {
            form.color = color;
        }
        if let Some(recurrence) = self.recurrence {
            form.recurrence = recurrence;
        }
    }
}

pub fn add(cal: &mut FileCalendar, out: &Output, fields: Fields) -> Result<()> {
    let mut form = EventForm {
        color: schedule_engine::DEFAULT_COLOR.to_string(),
        ..EventForm::default()
    };
    fields.apply(&mut form);
    let id = cal.on_event_submit(form)?;
    out.emit(json!({ "id": id }), || format!("Created event {id}"))
}

pub fn edit(cal: &mut FileCalendar, out: &Output, id: &str, fields: Fields) -> Result<()> {
    let mut form = cal.on_event_activate(&EventId::from(id))?;
    fields.apply(&mut form);
    let id = cal.on_event_submit(form)?;
    out.emit(json!({ "id": id }), || format!("Updated event {id}"))
}

pub fn delete(cal: &mut FileCalendar, out: &Output, id: &str) -> Result<()> {
    let removed = cal.on_event_delete(&EventId::from(id))?;
    out.emit(json!({ "id": removed.id }), || {
        format!("Deleted event {} ({})", removed.id, removed.title)
    })
}

pub fn list(
    cal: &FileCalendar,
    out: &Output,
    search: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let filter = EventFilter::new(category, search);
    let events: Vec<_> = filter.apply(cal.events()).collect();
    out.emit(serde_json::to_value(&events)?, || {
        if events.is_empty() {
            return "No events.".to_string();
        }
        events
            .iter()
            .map(|e| render::event_line(e, cal.clock()))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

pub fn categories(cal: &FileCalendar, out: &Output) -> Result<()> {
    let categories = cal.categories();
    out.emit(json!(categories), || categories.join("\n"))
}

pub fn month(
    cal: &FileCalendar,
    out: &Output,
    today: NaiveDate,
    week_only: bool,
    search: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let filter = EventFilter::new(category, search);
    let mut cells = cal.cells(&filter, today);
    if week_only {
        let week = cal
            .visible_week(today)
            .context("today is not in the displayed month")?;
        cells.retain(|c| week.contains(&c.date));
    }

    let value = json!({
        "month": cal.visible_month().format("%Y-%m").to_string(),
        "cells": cells.iter().map(|c| json!({
            "date": c.date,
            "inMonth": c.in_month,
            "isToday": c.is_today,
            "events": c.events.iter().map(|e| &e.id).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    });
    out.emit(value, || render::month_text(cal.visible_month(), &cells, cal.clock()))
}

pub fn occurs(cal: &FileCalendar, out: &Output, id: &str, date: NaiveDate) -> Result<()> {
    let occurs = cal.occurs_on(&EventId::from(id), date)?;
    out.emit(json!({ "occurs": occurs }), || yes_no(occurs))
}

pub fn can_move(cal: &FileCalendar, out: &Output, id: &str, date: NaiveDate) -> Result<()> {
    let allowed = cal.can_drop(&EventId::from(id), date);
    out.emit(json!({ "canMove": allowed }), || yes_no(allowed))
}

pub fn move_event(cal: &mut FileCalendar, out: &Output, id: &str, date: NaiveDate) -> Result<()> {
    let id = EventId::from(id);
    if !cal.on_drag_start(&id) {
        let err = match cal.get(&id) {
            None => ScheduleError::NotFound(id.to_string()),
            Some(_) => {
                ScheduleError::NotMovable(format!("'{id}' is recurring and cannot be moved"))
            }
        };
        return Err(err.into());
    }
    let at = cal.on_drop_attempt(&id, date)?.into_result()?;
    out.emit(json!({ "id": id, "dateTime": at }), || {
        format!("Moved {id} to {}", cal.clock().format_display(at))
    })
}

pub fn export(cal: &FileCalendar, out: &Output, path: &Path, open_import: bool) -> Result<()> {
    let ics = cal.export_ics(Utc::now())?;
    fs::write(path, ics).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), count = cal.events().len(), "calendar_exported");

    if open_import {
        // Best effort: the export already succeeded.
        if let Err(e) = webbrowser::open(GOOGLE_CALENDAR_IMPORT_URL) {
            tracing::warn!(error = %e, "import_page_open_failed");
            eprintln!("Could not open {GOOGLE_CALENDAR_IMPORT_URL}: {e}");
        }
    }

    out.emit(
        json!({ "path": path.display().to_string(), "count": cal.events().len() }),
        || format!("Exported {} events to {}", cal.events().len(), path.display()),
    )
}

fn yes_no(b: bool) -> String {
    let answer = if b { "yes" } else { "no" };
    answer.to_string()
}
