//! Plain-text and JSON output for the print subcommands

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::services::grid::MonthGrid;
use crate::services::ItemIndex;
use crate::tui::widgets::day_detail::{visible_fields, EMPTY_DAY, NO_DETAILS};
use crate::types::{iso_date, long_date, CalendarItem};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 7;

/// Cell text: day number (parenthesized outside the month) plus one `*` per item
fn cell_text(day: u32, in_month: bool, count: usize) -> String {
    let label = if in_month {
        day.to_string()
    } else {
        format!("({})", day)
    };
    let markers = if count > 2 {
        "**+".to_string()
    } else {
        "*".repeat(count)
    };
    format!("{:>4}{:<3}", label, markers)
}

/// Month grid as text: title, weekday header, one line per week, then the items
pub fn month_text(grid: &MonthGrid) -> String {
    let width = CELL_WIDTH * 7;
    let mut out = format!("{:^width$}\n", grid.month.title(), width = width);
    for name in WEEKDAYS {
        out.push_str(&format!("{:>4}   ", name));
    }
    out.push('\n');

    for week in grid.weeks() {
        let line: String = week
            .iter()
            .map(|cell| cell_text(cell.date.day(), cell.in_month, cell.item_count()))
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let items: Vec<&CalendarItem> = grid
        .cells
        .iter()
        .filter(|cell| cell.in_month)
        .flat_map(|cell| cell.appointments.iter().chain(cell.events.iter()).copied())
        .collect();
    if !items.is_empty() {
        out.push('\n');
        for item in items {
            out.push_str(&format!(
                "{}  {:<11}  {}\n",
                item.date,
                item.kind.label(),
                item.title
            ));
        }
    }
    out
}

/// Selected-day report, serialized by `day --json`
#[derive(Debug, Serialize)]
pub struct DayReport<'a> {
    pub date: String,
    pub title: String,
    pub appointments: Vec<&'a CalendarItem>,
    pub events: Vec<&'a CalendarItem>,
}

impl<'a> DayReport<'a> {
    pub fn new(index: &'a ItemIndex, date: NaiveDate) -> Self {
        let iso = iso_date(date);
        let (appointments, events) = index.partition_for_day(&iso);
        Self {
            date: iso,
            title: format!("Details for {}", long_date(date)),
            appointments,
            events,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.events.is_empty()
    }
}

/// Day report as text, every item expanded
pub fn day_text(report: &DayReport) -> String {
    let mut out = format!("{}\n", report.title);
    if report.is_empty() {
        out.push_str(EMPTY_DAY);
        out.push('\n');
        return out;
    }

    for item in report.appointments.iter().chain(report.events.iter()) {
        out.push_str(&format!("● {} ({})\n", item.title, item.kind));
        let fields = visible_fields(item, false);
        if fields.is_empty() {
            out.push_str(&format!("    {}\n", NO_DETAILS));
        }
        for field in fields {
            out.push_str(&format!("    {:<12}{}\n", field.label(), field.value(item)));
        }
    }
    out
}
