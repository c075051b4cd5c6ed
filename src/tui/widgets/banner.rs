//! One-line status and error banner

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

/// A message shown above the key hints until dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

pub struct BannerView<'a> {
    banner: &'a Banner,
    theme: Theme,
}

impl<'a> BannerView<'a> {
    pub fn new(banner: &'a Banner, theme: Theme) -> Self {
        Self { banner, theme }
    }
}

impl Widget for BannerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (prefix, color) = match self.banner.kind {
            BannerKind::Info => ("✓ ", self.theme.success()),
            BannerKind::Error => ("✗ ", self.theme.error()),
        };
        let mut spans = vec![
            Span::styled(
                prefix,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.banner.message.as_str(), Style::default().fg(color)),
        ];
        if self.banner.is_error() {
            spans.push(Span::styled(
                "  (x to dismiss)",
                Style::default().fg(self.theme.muted()),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
