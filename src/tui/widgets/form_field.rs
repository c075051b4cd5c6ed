//! Shared text-input handling and rendering for modal forms

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Width of the label column
const LABEL_WIDTH: usize = 13;

/// Caret drawn after the text of the focused field
pub const CARET: &str = "▏";

/// What a form wants the app to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Apply a text-editing key to `buffer`. Returns true if the key was consumed.
pub fn edit_text(buffer: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.push(c);
            true
        }
        KeyCode::Backspace => {
            buffer.pop();
            true
        }
        _ => false,
    }
}

/// Render `label: value` with focus styling and a caret on the focused field
pub fn render_field(
    area: Rect,
    buf: &mut Buffer,
    label: &str,
    value: &str,
    focused: bool,
    theme: Theme,
) {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted())
    };
    let marker = if focused { "▸ " } else { "  " };

    let max_value = (area.width as usize).saturating_sub(LABEL_WIDTH + 3);
    let shown = tail(value, max_value);

    let mut spans = vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
        Span::styled(shown, Style::default().fg(theme.text())),
    ];
    if focused {
        spans.push(Span::styled(CARET, Style::default().fg(theme.accent())));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .render(area, buf);
}

/// Last `max` characters of `s`, so the end being typed stays visible
fn tail(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        s.chars().skip(count - max).collect()
    }
}

/// Render a centered single-line hint
pub fn render_hint(area: Rect, buf: &mut Buffer, pairs: &[(&str, &str)], theme: Theme) {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, desc) in pairs {
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(theme.muted())
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}  ", desc),
            Style::default().fg(theme.muted()),
        ));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}
