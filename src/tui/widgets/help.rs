//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 50;
const POPUP_HEIGHT: u16 = 30;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Calendar",
        &[
            ("←↓↑→ / hjkl", "Move cursor"),
            ("[ ] / PgUp PgDn", "Previous/next month"),
            ("Enter", "Select day"),
            ("Esc", "Clear selection"),
            ("t", "Jump to today"),
        ],
    ),
    (
        "Details",
        &[
            ("Tab", "Focus calendar/details"),
            ("↑↓ / Space", "Choose/expand item"),
            ("←→ / e", "Choose/edit field"),
            ("Enter / Esc", "Save/cancel edit"),
        ],
    ),
    (
        "General",
        &[
            ("a", "New appointment"),
            ("g", "New goal"),
            ("x", "Dismiss message"),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle help"),
        ],
    ),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
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

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" daygrid v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let header_style = Style::default()
            .fg(self.theme.date())
            .add_modifier(Modifier::BOLD);
        let sep = "─".repeat(inner.width as usize);

        let mut lines = vec![Line::default()];
        for (header, bindings) in SECTIONS {
            lines.push(Line::from(Span::styled(*header, header_style)));
            lines.push(Line::from(Span::styled(
                sep.clone(),
                Style::default().fg(self.theme.muted()),
            )));
            for (key, desc) in bindings.iter() {
                lines.push(keybinding_line(key, desc, self.theme));
            }
            lines.push(Line::default());
        }
        Paragraph::new(lines).render(inner, buf);

        // Close hint on the last row
        if inner.height > 0 {
            let hint_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            Paragraph::new(Line::from(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(hint_area, buf);
        }
    }
}

fn keybinding_line<'a>(key: &'a str, desc: &'a str, theme: Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("  {:<18}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc, Style::default().fg(theme.text())),
    ])
}
