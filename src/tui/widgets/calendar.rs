//! Month calendar grid widget

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::spinner::Spinner;
use crate::services::grid::{DayCell, MonthGrid};
use crate::tui::theme::Theme;

/// Weekday header, Sunday first
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Item marker
const MARKER: &str = "●";

/// Header rows: month title + weekday names
const HEADER_HEIGHT: u16 = 2;

/// How many markers fit in `width` columns for `count` items, and how many are left over
pub fn marker_layout(count: usize, width: usize) -> (usize, usize) {
    if count <= width {
        return (count, 0);
    }
    // "+n" needs its digits plus the sign
    let overflow_width = |rest: usize| rest.to_string().len() + 1;
    let mut shown = width;
    while shown > 0 && shown + overflow_width(count - shown) > width {
        shown -= 1;
    }
    (shown, count - shown)
}

/// Month grid for ratatui
pub struct CalendarView<'a> {
    grid: &'a MonthGrid<'a>,
    cursor: NaiveDate,
    selected: Option<NaiveDate>,
    focused: bool,
    /// Spinner frame while a fetch is in flight
    loading: Option<usize>,
    theme: Theme,
}

impl<'a> CalendarView<'a> {
    pub fn new(grid: &'a MonthGrid<'a>, cursor: NaiveDate, theme: Theme) -> Self {
        Self {
            grid,
            cursor,
            selected: None,
            focused: true,
            loading: None,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<NaiveDate>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn loading(mut self, frame: Option<usize>) -> Self {
        self.loading = frame;
        self
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled("◀ ", Style::default().fg(self.theme.muted())),
            Span::styled(
                self.grid.month.title(),
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(self.theme.muted())),
        ]);
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .render(Rect { height: 1, ..area }, buf);

        if let Some(frame) = self.loading {
            Spinner::new(frame, self.theme).render(Rect { height: 1, ..area }, buf);
        }
    }

    fn cell_style(&self, cell: &DayCell) -> Style {
        let mut style = if cell.is_today {
            Style::default()
                .fg(self.theme.today())
                .add_modifier(Modifier::BOLD)
        } else if cell.in_month {
            Style::default().fg(self.theme.text())
        } else {
            Style::default().fg(self.theme.muted())
        };
        if cell.date == self.cursor {
            style = if self.focused {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style.add_modifier(Modifier::UNDERLINED)
            };
        }
        style
    }

    fn render_cell(&self, cell: &DayCell, area: Rect, buf: &mut Buffer) {
        let style = self.cell_style(cell);
        let label = if self.selected == Some(cell.date) {
            format!("[{}]", cell.date.day())
        } else {
            format!(" {} ", cell.date.day())
        };

        // Fill the cursor cell so the highlight spans the whole box
        if cell.date == self.cursor {
            for y in area.y..area.y + area.height {
                buf.set_string(area.x, y, " ".repeat(area.width as usize), style);
            }
        }
        buf.set_stringn(area.x, area.y, &label, area.width as usize, style);

        let label_width = label.chars().count() as u16;
        let (marker_x, marker_y, marker_width) = if area.height >= 2 {
            (area.x + 1, area.y + 1, area.width.saturating_sub(1))
        } else {
            (
                area.x + label_width,
                area.y,
                area.width.saturating_sub(label_width),
            )
        };

        let kinds = cell
            .appointments
            .iter()
            .chain(cell.events.iter())
            .map(|item| item.kind);
        let (shown, rest) = marker_layout(cell.item_count(), marker_width as usize);
        let mut x = marker_x;
        for kind in kinds.take(shown) {
            buf.set_string(
                x,
                marker_y,
                MARKER,
                Style::default().fg(self.theme.kind_color(kind)),
            );
            x += 1;
        }
        let remaining = (marker_x + marker_width).saturating_sub(x);
        if rest > 0 && remaining > 0 {
            buf.set_stringn(
                x,
                marker_y,
                format!("+{}", rest),
                remaining as usize,
                Style::default().fg(self.theme.muted()),
            );
        }
    }
}

impl Widget for CalendarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 7 || area.height < HEADER_HEIGHT + 1 {
            return;
        }

        self.render_header(area, buf);

        let cell_width = area.width / 7;
        let weekday_y = area.y + 1;
        for (col, name) in WEEKDAYS.iter().enumerate() {
            buf.set_stringn(
                area.x + col as u16 * cell_width,
                weekday_y,
                format!(" {}", name),
                cell_width as usize,
                Style::default()
                    .fg(self.theme.muted())
                    .add_modifier(Modifier::BOLD),
            );
        }

        let weeks = self.grid.week_count().max(1) as u16;
        let grid_height = area.height - HEADER_HEIGHT;
        let cell_height = (grid_height / weeks).max(1);

        for (row, week) in self.grid.weeks().enumerate() {
            let y = area.y + HEADER_HEIGHT + row as u16 * cell_height;
            if y >= area.y + area.height {
                break;
            }
            let height = cell_height.min(area.y + area.height - y);
            for (col, cell) in week.iter().enumerate() {
                let cell_area = Rect::new(
                    area.x + col as u16 * cell_width,
                    y,
                    cell_width.saturating_sub(1).max(1),
                    height,
                );
                self.render_cell(cell, cell_area, buf);
            }
        }
    }
}
