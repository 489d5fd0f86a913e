//! A calendar session: the owned event collection plus the handlers a UI
//! calls into.
//!
//! Handlers run one at a time and to completion. Each one reads the
//! collection as it is at call time, so a drop is always re-checked against
//! the current state even if [`Calendar::can_drop`] said yes a moment ago.
//! After every mutation the collection is saved; a failed save is logged and
//! the in-memory state is kept.

use chrono::{DateTime, NaiveDate, Utc};

use crate::clock::LocalClock;
use crate::error::{Result, ScheduleError};
use crate::event::{Event, EventForm, EventId, DEFAULT_COLOR};
use crate::filter::{categories, EventFilter};
use crate::grid::{day_cells, month_grid, next_month, previous_month, DayCell, MonthGrid, Week};
use crate::ics::export_ics;
use crate::recurrence::occurs_on;
use crate::reschedule::{self, Reschedule};
use crate::store::{check_collection, EventStore};

/// Session settings.
#[derive(Debug, Clone)]
pub struct CalendarOptions {
    /// Zone in which dates, weekdays and times of day are read.
    pub clock: LocalClock,
    /// Color pre-filled into creation forms.
    pub default_color: String,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            clock: LocalClock::default(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Placement state of a drag interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(EventId),
}

pub struct Calendar<S: EventStore> {
    store: S,
    events: Vec<Event>,
    options: CalendarOptions,
    month: NaiveDate,
    drag: DragState,
}

impl<S: EventStore> Calendar<S> {
    /// Load the collection from `store` and show the month containing `today`.
    ///
    /// # Errors
    ///
    /// Propagates the store's load error, and returns
    /// [`ScheduleError::Store`] when the stored collection repeats an id or
    /// holds an event without a title.
    pub fn open(store: S, options: CalendarOptions, today: NaiveDate) -> Result<Self> {
        let events = store.load()?;
        check_collection(&events)?;
        tracing::info!(count = events.len(), tz = %options.clock.timezone(), "calendar_opened");
        Ok(Self {
            store,
            events,
            options,
            month: month_grid(today).month(),
            drag: DragState::Idle,
        })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn clock(&self) -> &LocalClock {
        &self.options.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.events)
    }

    // ── Month view ──────────────────────────────────────────────────────

    /// First day of the month on display.
    pub fn visible_month(&self) -> NaiveDate {
        self.month
    }

    pub fn show_month(&mut self, date: NaiveDate) {
        self.month = month_grid(date).month();
    }

    pub fn next_month(&mut self) {
        self.month = next_month(self.month);
    }

    pub fn previous_month(&mut self) {
        self.month = previous_month(self.month);
    }

    pub fn grid(&self) -> MonthGrid {
        month_grid(self.month)
    }

    pub fn cells(&self, filter: &EventFilter, today: NaiveDate) -> Vec<DayCell<'_>> {
        day_cells(&self.grid(), &self.events, filter, &self.options.clock, today)
    }

    /// The displayed row holding `today`, for a single-week view.
    pub fn visible_week(&self, today: NaiveDate) -> Option<Week> {
        self.grid().week_containing(today).copied()
    }

    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id.
    pub fn occurs_on(&self, id: &EventId, date: NaiveDate) -> Result<bool> {
        let event = self.find(id)?;
        Ok(occurs_on(event, date, &self.options.clock))
    }

    // ── Forms ───────────────────────────────────────────────────────────

    /// A day was activated: open a creation form for it.
    pub fn on_day_activate(&self, date: NaiveDate) -> EventForm {
        let mut form = EventForm::for_day(date, &self.options.clock);
        form.color = self.options.default_color.clone();
        form
    }

    /// An event was activated: open an edit form for it.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id.
    pub fn on_event_activate(&self, id: &EventId) -> Result<EventForm> {
        let event = self.find(id)?;
        Ok(EventForm::from_event(event, &self.options.clock))
    }

    /// Create or update an event from a submitted form.
    ///
    /// Editing replaces every field except the id.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Validation`] for a blank title or bad date-time, and
    /// [`ScheduleError::NotFound`] when editing an id that no longer exists.
    /// The collection is untouched on error.
    pub fn on_event_submit(&mut self, form: EventForm) -> Result<EventId> {
        let editing = form.is_edit();
        let event = form.into_event(&self.options.clock)?;
        let id = event.id.clone();

        if editing {
            let slot = self
                .events
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;
            *slot = event;
            tracing::info!(event = %id, "event_updated");
        } else {
            tracing::info!(event = %id, recurrence = %event.recurrence, "event_created");
            self.events.push(event);
        }

        self.persist();
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id.
    pub fn on_event_delete(&mut self, id: &EventId) -> Result<Event> {
        let pos = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;
        let removed = self.events.remove(pos);
        if self.drag == DragState::Dragging(id.clone()) {
            self.drag = DragState::Idle;
        }
        tracing::info!(event = %id, "event_deleted");
        self.persist();
        Ok(removed)
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Begin dragging. Refused (returns `false`) for recurring or unknown
    /// events.
    pub fn on_drag_start(&mut self, id: &EventId) -> bool {
        match self.get(id) {
            Some(event) if event.can_drag() => {
                self.drag = DragState::Dragging(id.clone());
                true
            }
            _ => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Whether dropping `id` on `date` would be accepted right now.
    pub fn can_drop(&self, id: &EventId, date: NaiveDate) -> bool {
        reschedule::can_drop(&self.events, id, date, &self.options.clock)
    }

    /// Drop `id` on `date`, re-validating against the current collection.
    ///
    /// Only the event started with [`on_drag_start`](Self::on_drag_start)
    /// can land. An accepted move is written and saved. A rejected one
    /// leaves the collection untouched. The drag state returns to idle
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NotFound`] for an unknown id, and
    /// [`ScheduleError::NotMovable`] when `id` is a one-time event that is
    /// not the one being dragged.
    pub fn on_drop_attempt(&mut self, id: &EventId, date: NaiveDate) -> Result<Reschedule> {
        let dragged = std::mem::take(&mut self.drag);
        let outcome = reschedule::propose_reschedule(&self.events, id, date, &self.options.clock)?;

        let dragging_this = matches!(&dragged, DragState::Dragging(d) if d == id);
        if !dragging_this && !matches!(outcome, Reschedule::NotMovable { .. }) {
            tracing::warn!(event = %id, state = ?dragged, "drop_without_drag");
            return Err(ScheduleError::NotMovable(format!("no drag in progress for '{id}'")));
        }

        match &outcome {
            Reschedule::Accepted { event_id, at } => {
                if let Some(event) = self.events.iter_mut().find(|e| &e.id == event_id) {
                    event.date_time = *at;
                }
                tracing::info!(event = %event_id, to = %at, "event_rescheduled");
                self.persist();
            }
            Reschedule::Rejected(warning) => {
                tracing::warn!(
                    event = %warning.moving,
                    blocking = %warning.blocking.id,
                    attempted = %warning.attempted,
                    "reschedule_rejected"
                );
            }
            Reschedule::NotMovable { event_id } => {
                tracing::debug!(event = %event_id, "reschedule_refused_recurring");
            }
        }
        Ok(outcome)
    }

    // ── Export ──────────────────────────────────────────────────────────

    /// The whole collection as an iCalendar document.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Export`]; the collection is unaffected.
    pub fn export_ics(&self, stamp: DateTime<Utc>) -> Result<String> {
        export_ics(&self.events, stamp)
    }

    fn find(&self, id: &EventId) -> Result<&Event> {
        self.get(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.events) {
            tracing::warn!(error = %e, "event_store_save_failed");
        }
    }
}
