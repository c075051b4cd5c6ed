//! Create-appointment modal

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::form_field::{edit_text, render_field, render_hint, FormAction};
use crate::services::forms::AppointmentDraft;
use crate::tui::theme::Theme;
use crate::types::long_date;

const POPUP_WIDTH: u16 = 56;
const POPUP_HEIGHT: u16 = 12;

/// Focusable fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentField {
    #[default]
    Title,
    Time,
    Description,
}

impl AppointmentField {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Time,
            Self::Time => Self::Description,
            Self::Description => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Time => Self::Title,
            Self::Description => Self::Time,
        }
    }
}

/// Draft plus input focus for the appointment modal
#[derive(Debug, Clone, Default)]
pub struct AppointmentFormState {
    pub draft: AppointmentDraft,
    pub focus: AppointmentField,
    /// Last validation or submission error
    pub error: Option<String>,
}

impl AppointmentFormState {
    pub fn new() -> Self {
        Self::default()
    }

    fn focused_buffer(&mut self) -> &mut String {
        match self.focus {
            AppointmentField::Title => &mut self.draft.title,
            AppointmentField::Time => &mut self.draft.time,
            AppointmentField::Description => &mut self.draft.description,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => FormAction::Submit,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FormAction::Submit
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                FormAction::None
            }
            _ => {
                if edit_text(self.focused_buffer(), key) {
                    self.error = None;
                }
                FormAction::None
            }
        }
    }

    /// Clear the draft after a successful submission
    pub fn reset(&mut self) {
        self.draft.reset();
        self.focus = AppointmentField::default();
        self.error = None;
    }
}

/// Appointment modal widget
pub struct AppointmentFormPopup<'a> {
    state: &'a AppointmentFormState,
    date: NaiveDate,
    theme: Theme,
}

impl<'a> AppointmentFormPopup<'a> {
    pub fn new(state: &'a AppointmentFormState, date: NaiveDate, theme: Theme) -> Self {
        Self { state, date, theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }
}

impl Widget for AppointmentFormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Create Appointment ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.appointment()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Date
            Constraint::Length(1), // [1] Padding
            Constraint::Length(1), // [2] Title
            Constraint::Length(1), // [3] Time
            Constraint::Length(1), // [4] Description
            Constraint::Length(1), // [5] Padding
            Constraint::Length(1), // [6] Error
            Constraint::Min(0),    // Remaining
            Constraint::Length(1), // [8] Key hints
        ])
        .split(inner);

        Paragraph::new(Line::from(Span::styled(
            long_date(self.date),
            Style::default().fg(self.theme.date()),
        )))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let state = self.state;
        let fields = [
            (AppointmentField::Title, "Title *", &state.draft.title),
            (AppointmentField::Time, "Time * HH:MM", &state.draft.time),
            (
                AppointmentField::Description,
                "Description",
                &state.draft.description,
            ),
        ];
        for (i, (field, label, value)) in fields.iter().enumerate() {
            render_field(
                chunks[2 + i],
                buf,
                label,
                value,
                state.focus == *field,
                self.theme,
            );
        }

        if let Some(error) = &state.error {
            Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(self.theme.error()),
            )))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
        }

        render_hint(
            chunks[8],
            buf,
            &[("Tab", "Next"), ("Enter", "Create"), ("Esc", "Cancel")],
            self.theme,
        );
    }
}
