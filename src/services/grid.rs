//! Month grid builder
//!
//! Walks day by day from the Sunday on or before the first of the month to
//! the Saturday on or after its last day. Row count (4, 5 or 6 weeks) falls
//! out of the loop bound.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::{iso_date, CalendarItem, ItemKind, Month};

/// A single cell in the month grid
#[derive(Debug, Clone, Serialize)]
pub struct DayCell<'a> {
    #[serde(skip)]
    pub date: NaiveDate,
    /// `YYYY-MM-DD` key used to match items
    #[serde(rename = "date")]
    pub iso: String,
    /// False for leading/trailing days of adjacent months
    pub in_month: bool,
    pub is_today: bool,
    pub appointments: Vec<&'a CalendarItem>,
    pub events: Vec<&'a CalendarItem>,
}

impl DayCell<'_> {
    pub fn item_count(&self) -> usize {
        self.appointments.len() + self.events.len()
    }
}

/// Whole-week grid for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid<'a> {
    pub month: Month,
    pub cells: Vec<DayCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Rows of 7 cells, Sunday first
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(7)
    }

    pub fn week_count(&self) -> usize {
        self.cells.len() / 7
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.cells.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cells.last().map(|c| c.date)
    }

    /// Whether `date` has a cell in this grid (lead/trail days included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        matches!((self.first_date(), self.last_date()), (Some(first), Some(last)) if first <= date && date <= last)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell<'a>> {
        let first = self.first_date()?;
        let idx = (date - first).num_days();
        if idx < 0 {
            return None;
        }
        self.cells.get(idx as usize)
    }

    /// (row, column) position of `date`
    pub fn position(&self, date: NaiveDate) -> Option<(usize, usize)> {
        let first = self.first_date()?;
        let idx = (date - first).num_days();
        if idx < 0 || idx as usize >= self.cells.len() {
            return None;
        }
        Some((idx as usize / 7, idx as usize % 7))
    }
}

/// Build the grid for `month`, attaching items by exact date-string match
pub fn build_month_grid<'a>(
    month: Month,
    today: NaiveDate,
    items: &'a [CalendarItem],
) -> MonthGrid<'a> {
    let start = month.grid_start();
    let end = month.grid_end();

    let mut cells = Vec::with_capacity(42);
    let mut day = start;
    while day <= end {
        let iso = iso_date(day);
        let mut appointments = Vec::new();
        let mut events = Vec::new();
        for item in items.iter().filter(|item| item.date == iso) {
            match item.kind {
                ItemKind::Appointment => appointments.push(item),
                ItemKind::Event => events.push(item),
            }
        }

        cells.push(DayCell {
            date: day,
            iso,
            in_month: month.contains(day),
            is_today: day == today,
            appointments,
            events,
        });
        day += Duration::days(1);
    }

    MonthGrid { month, cells }
}
