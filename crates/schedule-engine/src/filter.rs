//! Search and category filtering for display.
//!
//! Filtering only decides what is shown. Conflict checks always run against
//! the full collection.

use crate::event::Event;

/// Display filter: an optional category and an optional search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

impl EventFilter {
    /// Empty strings mean "no filter". The search term is used as typed,
    /// surrounding whitespace included.
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            search: search.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category().is_none() && self.search().is_none()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = self.category() {
            if event.category.as_deref() != Some(category) {
                return false;
            }
        }
        match self.search() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                event.title.to_lowercase().contains(&term)
                    || event
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
        }
    }

    pub fn apply<'a>(&'a self, events: &'a [Event]) -> impl Iterator<Item = &'a Event> + 'a {
        events.iter().filter(move |e| self.matches(e))
    }
}

/// Distinct non-empty categories, in first-seen order.
pub fn categories(events: &[Event]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in events.iter().filter_map(|e| e.category.as_deref()) {
        if !category.is_empty() && !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}
