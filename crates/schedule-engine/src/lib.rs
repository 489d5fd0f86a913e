//! # schedule-engine
//!
//! Deterministic scheduling for a month-view calendar.
//!
//! The engine decides which days a one-time or recurring event occupies,
//! lays out Sunday-first month grids, and decides whether a drag-and-drop
//! move is legal. Decisions are pure functions over a snapshot of the event
//! collection; [`Calendar`] owns the collection and applies accepted changes.
//!
//! ## Modules
//!
//! - [`recurrence`]: does an event occur on a given day
//! - [`grid`]: month grids, navigation, and per-cell event lists
//! - [`conflict`]: is a proposed instant already taken
//! - [`reschedule`]: drag-and-drop move proposals
//! - [`calendar`]: the owned collection and its UI handlers
//! - [`clock`]: local calendar fields for a fixed time zone
//! - [`event`]: events, recurrence kinds, and the edit form
//! - [`filter`]: search and category filtering
//! - [`store`]: durable storage
//! - [`ics`]: iCalendar export
//! - [`error`]: Error types

pub mod calendar;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod event;
pub mod filter;
pub mod grid;
pub mod ics;
pub mod recurrence;
pub mod reschedule;
pub mod store;

pub use calendar::{Calendar, CalendarOptions, DragState};
pub use clock::{parse_date, LocalClock};
pub use conflict::{find_conflict, has_conflict};
pub use error::ScheduleError;
pub use event::{Event, EventForm, EventId, Recurrence, DEFAULT_COLOR};
pub use filter::{categories, EventFilter};
pub use grid::{day_cells, month_grid, next_month, previous_month, DayCell, MonthGrid, Week};
pub use ics::{export_ics, EXPORT_FILE_NAME, GOOGLE_CALENDAR_IMPORT_URL};
pub use recurrence::{occurs_on, CUSTOM_INTERVAL_DAYS};
pub use reschedule::{can_drop, propose_reschedule, proposed_instant, ConflictWarning, Reschedule};
pub use store::{check_collection, EventStore, JsonFileStore, MemoryStore};
