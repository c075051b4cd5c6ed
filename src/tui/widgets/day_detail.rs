//! Selected-day panel: item list, expansion and inline field editing

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::form_field::CARET;
use crate::services::detail::DetailPanel;
use crate::tui::theme::Theme;
use crate::types::{long_date, CalendarItem, ItemField};

pub const EMPTY_DAY: &str = "No events or appointments.";
pub const NO_DETAILS: &str = "No additional details available.";
const NO_SELECTION: &str = "Select a day to see its appointments and events.";

/// Fields listed under an expanded item. The focused panel lists every field so
/// unset ones can be filled in; otherwise only the ones with values.
pub fn visible_fields(item: &CalendarItem, editable: bool) -> Vec<ItemField> {
    ItemField::all()
        .iter()
        .copied()
        .filter(|field| match field {
            ItemField::Title => editable,
            _ => editable || !field.value(item).is_empty(),
        })
        .collect()
}

/// Detail panel widget for the selected day
pub struct DayDetailView<'a> {
    date: Option<NaiveDate>,
    items: &'a [&'a CalendarItem],
    panel: &'a DetailPanel,
    item_cursor: usize,
    field_cursor: usize,
    focused: bool,
    theme: Theme,
}

impl<'a> DayDetailView<'a> {
    pub fn new(
        date: Option<NaiveDate>,
        items: &'a [&'a CalendarItem],
        panel: &'a DetailPanel,
        theme: Theme,
    ) -> Self {
        Self {
            date,
            items,
            panel,
            item_cursor: 0,
            field_cursor: 0,
            focused: false,
            theme,
        }
    }

    pub fn cursor(mut self, item: usize, field: usize) -> Self {
        self.item_cursor = item;
        self.field_cursor = field;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn item_line(&self, idx: usize, item: &CalendarItem) -> Line<'a> {
        let on_cursor = self.focused && idx == self.item_cursor;
        let expanded = self.panel.is_expanded(item.key());

        let title_style = if on_cursor {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD)
        };

        let mut spans = vec![
            Span::raw(if on_cursor { "▸ " } else { "  " }),
            Span::styled("● ", Style::default().fg(self.theme.kind_color(item.kind))),
        ];
        if let Some(time) = &item.time {
            spans.push(Span::styled(
                format!("{} ", time),
                Style::default().fg(self.theme.date()),
            ));
        }
        spans.push(Span::styled(item.title.clone(), title_style));
        spans.push(Span::styled(
            format!(" ({})", item.kind),
            Style::default().fg(self.theme.muted()),
        ));
        spans.push(Span::styled(
            if expanded { " −" } else { " +" },
            Style::default().fg(self.theme.accent()),
        ));
        Line::from(spans)
    }

    fn detail_lines(&self, idx: usize, item: &CalendarItem) -> Vec<Line<'a>> {
        let editable = self.focused && idx == self.item_cursor;
        let fields = visible_fields(item, editable);
        if fields.is_empty() {
            return vec![Line::from(Span::styled(
                format!("    {}", NO_DETAILS),
                Style::default()
                    .fg(self.theme.muted())
                    .add_modifier(Modifier::ITALIC),
            ))];
        }

        let edit = self.panel.edit().filter(|e| e.key == item.key());
        fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let on_field = editable && i == self.field_cursor;
                let label_style = if on_field {
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(self.theme.muted())
                };
                let label = Span::styled(format!("    {:<12}", field.label()), label_style);

                match edit.filter(|e| e.field == *field) {
                    Some(e) => Line::from(vec![
                        label,
                        Span::styled(
                            e.buffer.clone(),
                            Style::default()
                                .fg(self.theme.accent())
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                        Span::styled(CARET, Style::default().fg(self.theme.accent())),
                    ]),
                    None => {
                        let value = field.value(item);
                        let value = if value.is_empty() {
                            Span::styled("—", Style::default().fg(self.theme.muted()))
                        } else {
                            Span::styled(value, Style::default().fg(self.theme.text()))
                        };
                        Line::from(vec![label, value])
                    }
                }
            })
            .collect()
    }
}

impl Widget for DayDetailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.date {
            Some(date) => format!(" Details for {} ", long_date(date)),
            None => " Details ".to_string(),
        };
        let border = if self.focused {
            self.theme.accent()
        } else {
            self.theme.muted()
        };
        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let muted = Style::default().fg(self.theme.muted());
        if self.date.is_none() {
            Paragraph::new(Line::from(Span::styled(NO_SELECTION, muted))).render(inner, buf);
            return;
        }
        if self.items.is_empty() {
            Paragraph::new(Line::from(Span::styled(EMPTY_DAY, muted))).render(inner, buf);
            return;
        }

        let mut lines = Vec::new();
        let mut cursor_line = 0;
        for (idx, item) in self.items.iter().enumerate() {
            if idx == self.item_cursor {
                cursor_line = lines.len();
            }
            lines.push(self.item_line(idx, item));
            if self.panel.is_expanded(item.key()) {
                let details = self.detail_lines(idx, item);
                if idx == self.item_cursor {
                    cursor_line = lines.len() + self.field_cursor.min(details.len().saturating_sub(1));
                }
                lines.extend(details);
            }
        }

        // Keep the cursor row on screen
        let offset = cursor_line.saturating_sub(inner.height.saturating_sub(1) as usize);
        Paragraph::new(lines)
            .scroll((offset as u16, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, Priority};

    fn party() -> CalendarItem {
        let mut item = CalendarItem::new(ItemKind::Event, 3, "2024-03-12", "Birthday Party");
        item.description = Some("Celebrating Sarah's 30th birthday".into());
        item.notes = Some("Bring gift and RSVP by end of week".into());
        item.priority = Some(Priority::High);
        item
    }

    fn meeting() -> CalendarItem {
        CalendarItem::new(ItemKind::Appointment, 2, "2024-03-12", "Team Meeting")
    }

    fn march_12() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 3, 12)
    }

    fn render(view: DayDetailView) -> String {
        let area = Rect::new(0, 0, 70, 16);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_visible_fields() {
        let item = party();
        assert_eq!(
            visible_fields(&item, false),
            vec![ItemField::Priority, ItemField::Description, ItemField::Notes]
        );
        assert!(visible_fields(&meeting(), false).is_empty());
        assert_eq!(visible_fields(&meeting(), true).len(), ItemField::all().len());
    }

    #[test]
    fn test_no_selection() {
        let panel = DetailPanel::new();
        let content = render(DayDetailView::new(None, &[], &panel, Theme::Dark));
        assert!(content.contains("Select a day"));
    }

    #[test]
    fn test_empty_day() {
        let panel = DetailPanel::new();
        let content = render(DayDetailView::new(march_12(), &[], &panel, Theme::Dark));
        assert!(content.contains("Details for March 12, 2024"));
        assert!(content.contains(EMPTY_DAY));
    }

    #[test]
    fn test_collapsed_items_listed() {
        let (a, b) = (meeting(), party());
        let items = [&a, &b];
        let panel = DetailPanel::new();
        let content = render(DayDetailView::new(march_12(), &items, &panel, Theme::Dark));
        assert!(content.contains("Team Meeting (appointment) +"));
        assert!(content.contains("Birthday Party (event) +"));
        assert!(!content.contains("Celebrating"));
    }

    #[test]
    fn test_expanded_item_shows_details() {
        let (a, b) = (meeting(), party());
        let items = [&a, &b];
        let mut panel = DetailPanel::new();
        panel.toggle(b.key());
        let content = render(DayDetailView::new(march_12(), &items, &panel, Theme::Dark));
        assert!(content.contains("Birthday Party (event) −"));
        assert!(content.contains("Celebrating Sarah's 30th birthday"));
        assert!(content.contains("high"));
    }

    #[test]
    fn test_expanded_item_without_details() {
        let a = meeting();
        let items = [&a];
        let mut panel = DetailPanel::new();
        panel.toggle(a.key());
        let content = render(DayDetailView::new(march_12(), &items, &panel, Theme::Dark));
        assert!(content.contains(NO_DETAILS));
    }

    #[test]
    fn test_edit_buffer_rendered() {
        let b = party();
        let items = [&b];
        let mut panel = DetailPanel::new();
        panel.toggle(b.key());
        panel.begin_edit(&b, ItemField::Notes).unwrap();
        panel.push_char('!');
        let view = DayDetailView::new(march_12(), &items, &panel, Theme::Dark)
            .focused(true)
            .cursor(0, 4);
        let content = render(view);
        assert!(content.contains("end of week!"));
        assert!(content.contains(CARET));
    }
}
