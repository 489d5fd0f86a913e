//! Calendar events and the form that creates or edits them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::LocalClock;
use crate::error::ScheduleError;

/// Color given to events created without one.
pub const DEFAULT_COLOR: &str = "#1976d2";

// ── Identity ────────────────────────────────────────────────────────────────

/// Opaque event identifier, assigned once at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Recurrence ──────────────────────────────────────────────────────────────

/// How an event repeats after its anchor occurrence.
///
/// There is no end date: a recurring event repeats indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// Happens once, on the anchor day.
    #[default]
    #[serde(alias = "")]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Every 14 days from the anchor. The interval is fixed.
    Custom,
}

impl Recurrence {
    pub const ALL: [Recurrence; 6] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
        Recurrence::Custom,
    ];

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
            Recurrence::Custom => "custom",
        }
    }

    /// Label shown next to the recurrence choice in a form.
    pub fn label(self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
            Recurrence::Custom => "Custom (every 2 weeks)",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(Recurrence::None);
        }
        Recurrence::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ScheduleError::Validation(format!("unknown recurrence '{}'", s)))
    }
}

// ── Event ───────────────────────────────────────────────────────────────────

/// A calendar entry.
///
/// `date_time` is the anchor occurrence. For recurring events it defines
/// every occurrence; there are no per-occurrence overrides.
///
/// The JSON shape is the one browsers stored: camelCase keys, an optional
/// `recurrence` (absent means one-time), and a legacy `date` key accepted in
/// place of `dateTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(alias = "date")]
    pub date_time: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "null_as_none_recurrence")]
    pub recurrence: Recurrence,
}

impl Event {
    /// A one-time event with no display metadata.
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date_time,
            description: None,
            category: None,
            color: None,
            recurrence: Recurrence::None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// Only one-time events may be moved by drag-and-drop.
    pub fn can_drag(&self) -> bool {
        !self.is_recurring()
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_none_recurrence<'de, D>(deserializer: D) -> Result<Recurrence, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Recurrence>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Form ────────────────────────────────────────────────────────────────────

/// What a user submits to create or edit an event.
///
/// `date_time` is raw text in any shape [`LocalClock::parse_local`] accepts.
/// Blank optional fields mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventForm {
    /// `Some` when editing an existing event.
    pub id: Option<EventId>,
    pub title: String,
    pub date_time: String,
    pub description: String,
    pub category: String,
    pub color: String,
    pub recurrence: Recurrence,
}

impl EventForm {
    /// A blank creation form anchored at local midnight of `date`.
    pub fn for_day(date: NaiveDate, clock: &LocalClock) -> Self {
        Self {
            date_time: clock.format_input(clock.start_of_day(date)),
            color: DEFAULT_COLOR.to_string(),
            ..Self::default()
        }
    }

    /// An edit form pre-filled from `event`.
    pub fn from_event(event: &Event, clock: &LocalClock) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            date_time: clock.format_input(event.date_time),
            description: event.description.clone().unwrap_or_default(),
            category: event.category.clone().unwrap_or_default(),
            color: event.color_or_default().to_string(),
            recurrence: event.recurrence,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Validate the form and build the event it describes.
    ///
    /// A creation form gets a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Validation`] when the title is blank or the
    /// date-time cannot be parsed.
    pub fn into_event(self, clock: &LocalClock) -> Result<Event, ScheduleError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ScheduleError::Validation("title is required".to_string()));
        }
        let date_time = clock.parse_local(&self.date_time).map_err(|_| {
            ScheduleError::Validation(format!(
                "please provide a valid date and time (got '{}')",
                self.date_time
            ))
        })?;

        Ok(Event {
            id: self.id.unwrap_or_else(EventId::generate),
            title: title.to_string(),
            date_time,
            description: non_blank(self.description),
            category: non_blank(self.category),
            color: non_blank(self.color),
            recurrence: self.recurrence,
        })
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
