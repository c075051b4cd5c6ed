//! Quit confirmation shown when a form draft has unsaved input

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::form_field::render_hint;
use crate::tui::theme::Theme;

/// Width and height of the quit confirm popup
const POPUP_WIDTH: u16 = 40;
const POPUP_HEIGHT: u16 = 7;

/// Answer to the quit prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    Quit,
    Stay,
}

/// State for quit confirmation dialog
#[derive(Debug, Clone)]
pub struct QuitConfirmState {
    /// 0 = Yes, 1 = No (default)
    pub selection: u8,
}

impl Default for QuitConfirmState {
    fn default() -> Self {
        Self { selection: 1 }
    }
}

impl QuitConfirmState {
    /// Create a new state with default selection (No)
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while the user is still choosing
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<QuitChoice> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.selection = 1 - self.selection.min(1);
                None
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(QuitChoice::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(QuitChoice::Stay),
            KeyCode::Enter => Some(if self.selection == 0 {
                QuitChoice::Quit
            } else {
                QuitChoice::Stay
            }),
            _ => None,
        }
    }
}

/// Quit confirmation popup overlay
pub struct QuitConfirmPopup {
    selection: u8,
    theme: Theme,
}

impl QuitConfirmPopup {
    pub fn new(selection: u8, theme: Theme) -> Self {
        Self { selection, theme }
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

    fn button(&self, label: &'static str, selected: bool) -> [Span<'static>; 2] {
        let style = if selected {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.muted())
        };
        [
            Span::styled(if selected { "▸ " } else { "  " }, style),
            Span::styled(label, style),
        ]
    }
}

impl Widget for QuitConfirmPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Quit? ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.date()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(1), // [1] Question
            Constraint::Length(1), // [2] Padding
            Constraint::Length(1), // [3] Buttons
            Constraint::Length(1), // [4] Key hints
        ])
        .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Discard unsaved drafts and quit?",
            Style::default().fg(self.theme.text()),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let mut spans = Vec::with_capacity(5);
        spans.extend(self.button("Yes", self.selection == 0));
        spans.push(Span::raw("       "));
        spans.extend(self.button("No", self.selection == 1));
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        render_hint(
            chunks[4],
            buf,
            &[("←→", "Select"), ("Enter", "Confirm")],
            self.theme,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_confirm_default_selection_is_no() {
        let state = QuitConfirmState::new();
        assert_eq!(state.selection, 1); // 1 = No
    }

    #[test]
    fn test_enter_on_default_stays() {
        let mut state = QuitConfirmState::new();
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Some(QuitChoice::Stay));
    }

    #[test]
    fn test_select_yes_then_enter_quits() {
        let mut state = QuitConfirmState::new();
        assert_eq!(state.handle_key(key(KeyCode::Left)), None);
        assert_eq!(state.selection, 0);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Some(QuitChoice::Quit));
    }

    #[test]
    fn test_shortcuts() {
        let mut state = QuitConfirmState::new();
        assert_eq!(state.handle_key(key(KeyCode::Char('y'))), Some(QuitChoice::Quit));
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Some(QuitChoice::Stay));
        assert_eq!(state.handle_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_quit_confirm_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = QuitConfirmPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, POPUP_HEIGHT);
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_quit_confirm_small_terminal() {
        let area = Rect::new(0, 0, 20, 4);
        let popup_area = QuitConfirmPopup::centered_area(area);

        assert_eq!(popup_area.width, 20);
        assert_eq!(popup_area.height, 4);
    }

    #[test]
    fn test_quit_confirm_renders_question() {
        let area = Rect::new(0, 0, 60, 20);
        let popup_area = QuitConfirmPopup::centered_area(area);
        let mut buf = Buffer::empty(area);
        QuitConfirmPopup::new(0, Theme::Dark).render(popup_area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Quit?"));
        assert!(content.contains("Discard unsaved drafts"));
        assert!(content.contains("Yes"));
        assert!(content.contains("No"));
    }
}
