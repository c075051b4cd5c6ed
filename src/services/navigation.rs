//! Selection and month navigation state machine
//!
//! `CalendarState::apply` is a pure transition: every user action maps to a
//! `NavEvent` and produces the next state in one step.

use chrono::NaiveDate;
use tracing::debug;

use crate::types::Month;

/// Navigation input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    PrevMonth,
    NextMonth,
    /// Show `month`, optionally selecting a day in the same step
    ChangeMonth {
        month: Month,
        select: Option<NaiveDate>,
    },
    /// Select a day; a lead/trail day also switches the displayed month
    SelectDay(NaiveDate),
    Deselect,
    /// Jump to and select the given day (today)
    Today(NaiveDate),
}

/// Displayed month plus optional selected day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub current_month: Month,
    pub selected_day: Option<NaiveDate>,
}

impl CalendarState {
    /// Initial state: today's month, nothing selected
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_month: Month::containing(today),
            selected_day: None,
        }
    }

    #[must_use]
    pub fn apply(self, event: NavEvent) -> Self {
        let next = match event {
            NavEvent::PrevMonth => Self {
                current_month: self.current_month.pred(),
                ..self
            },
            NavEvent::NextMonth => Self {
                current_month: self.current_month.succ(),
                ..self
            },
            NavEvent::ChangeMonth { month, select } => Self {
                current_month: month,
                selected_day: select.or(self.selected_day),
            },
            NavEvent::SelectDay(day) if self.current_month.contains(day) => Self {
                selected_day: Some(day),
                ..self
            },
            NavEvent::SelectDay(day) | NavEvent::Today(day) => Self {
                current_month: Month::containing(day),
                selected_day: Some(day),
            },
            NavEvent::Deselect => Self {
                selected_day: None,
                ..self
            },
        };
        debug!(?event, month = %next.current_month, selected = ?next.selected_day, "navigation");
        next
    }

    /// Whether the displayed month differs from `other`'s
    pub fn month_changed(&self, other: &Self) -> bool {
        self.current_month != other.current_month
    }
}
