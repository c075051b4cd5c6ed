//! Create-goal modal with a task list

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::form_field::{edit_text, render_field, render_hint, FormAction};
use crate::services::forms::GoalDraft;
use crate::tui::theme::Theme;

const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 22;

/// Task rows shown before scrolling
const VISIBLE_TASKS: usize = 5;

/// Focusable parts of the goal form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalField {
    #[default]
    Title,
    Description,
    Priority,
    TaskDescription,
    TaskNotes,
    TaskDuration,
    Tasks,
}

impl GoalField {
    const ORDER: [GoalField; 7] = [
        GoalField::Title,
        GoalField::Description,
        GoalField::Priority,
        GoalField::TaskDescription,
        GoalField::TaskNotes,
        GoalField::TaskDuration,
        GoalField::Tasks,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn is_task_input(self) -> bool {
        matches!(
            self,
            Self::TaskDescription | Self::TaskNotes | Self::TaskDuration
        )
    }
}

/// Draft plus input focus for the goal modal
#[derive(Debug, Clone, Default)]
pub struct GoalFormState {
    pub draft: GoalDraft,
    pub focus: GoalField,
    /// Highlighted row in the task list
    pub task_cursor: usize,
    pub error: Option<String>,
}

impl GoalFormState {
    pub fn new() -> Self {
        Self::default()
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            GoalField::Title => Some(&mut self.draft.title),
            GoalField::Description => Some(&mut self.draft.description),
            GoalField::TaskDescription => Some(&mut self.draft.task_input.description),
            GoalField::TaskNotes => Some(&mut self.draft.task_input.notes),
            GoalField::TaskDuration => Some(&mut self.draft.task_input.duration),
            GoalField::Priority | GoalField::Tasks => None,
        }
    }

    fn clamp_task_cursor(&mut self) {
        self.task_cursor = self
            .task_cursor
            .min(self.draft.tasks.len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return FormAction::Submit;
        }
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return FormAction::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return FormAction::None;
            }
            _ => {}
        }

        match self.focus {
            GoalField::Priority => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.draft.priority = self.draft.priority.prev(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                    self.draft.priority = self.draft.priority.next()
                }
                KeyCode::Enter => return FormAction::Submit,
                _ => {}
            },
            GoalField::Tasks => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.task_cursor = self.task_cursor.saturating_sub(1)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.task_cursor += 1;
                    self.clamp_task_cursor();
                }
                KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
                    if let Some(id) = self.draft.tasks.get(self.task_cursor).map(|t| t.id) {
                        self.draft.remove_task(id);
                        self.clamp_task_cursor();
                    }
                }
                KeyCode::Enter => return FormAction::Submit,
                _ => {}
            },
            field if field.is_task_input() && key.code == KeyCode::Enter => {
                match self.draft.add_task_from_input() {
                    Ok(_) => {
                        self.error = None;
                        self.focus = GoalField::TaskDescription;
                    }
                    Err(e) => self.error = Some(e.to_string()),
                }
            }
            _ => {
                if key.code == KeyCode::Enter {
                    return FormAction::Submit;
                }
                if let Some(buffer) = self.focused_buffer() {
                    if edit_text(buffer, key) {
                        self.error = None;
                    }
                }
            }
        }
        FormAction::None
    }

    pub fn reset(&mut self) {
        self.draft.reset();
        self.focus = GoalField::default();
        self.task_cursor = 0;
        self.error = None;
    }
}

/// Goal modal widget
pub struct GoalFormPopup<'a> {
    state: &'a GoalFormState,
    theme: Theme,
}

impl<'a> GoalFormPopup<'a> {
    pub fn new(state: &'a GoalFormState, theme: Theme) -> Self {
        Self { state, theme }
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

    fn render_priority(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.state.focus == GoalField::Priority;
        let label_style = if focused {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.muted())
        };

        let mut spans = vec![
            Span::styled(if focused { "▸ " } else { "  " }, label_style),
            Span::styled(format!("{:<13}", "Priority *"), label_style),
        ];
        for priority in crate::types::Priority::all() {
            let label = format!(" {} ", priority.label());
            if *priority == self.state.draft.priority {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::REVERSED | Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(label, Style::default().fg(self.theme.text())));
            }
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_tasks(&self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let focused = state.focus == GoalField::Tasks;

        if state.draft.tasks.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No tasks yet",
                Style::default().fg(self.theme.muted()),
            )))
            .render(area, buf);
            return;
        }

        let start = state
            .task_cursor
            .saturating_sub(VISIBLE_TASKS.saturating_sub(1));
        for (row, (idx, task)) in state
            .draft
            .tasks
            .iter()
            .enumerate()
            .skip(start)
            .take((area.height as usize).min(VISIBLE_TASKS))
            .enumerate()
        {
            let selected = focused && idx == state.task_cursor;
            let style = if selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(self.theme.text())
            };
            let notes = if task.notes.trim().is_empty() {
                String::new()
            } else {
                format!(" ({})", task.notes.trim())
            };
            let text = format!(
                "  {}. {} · {} min{}",
                task.id, task.description, task.duration_minutes, notes
            );
            buf.set_stringn(
                area.x,
                area.y + row as u16,
                &text,
                area.width as usize,
                style,
            );
        }
    }
}

impl Widget for GoalFormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(" Create Goal ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.event()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Title
            Constraint::Length(1), // [1] Description
            Constraint::Length(1), // [2] Priority
            Constraint::Length(1), // [3] Padding
            Constraint::Length(1), // [4] New task header
            Constraint::Length(1), // [5] Task description
            Constraint::Length(1), // [6] Task notes
            Constraint::Length(1), // [7] Task duration
            Constraint::Length(1), // [8] Padding
            Constraint::Length(1), // [9] Task list header
            Constraint::Length(VISIBLE_TASKS as u16), // [10] Tasks
            Constraint::Length(1), // [11] Error
            Constraint::Min(0),    // Remaining
            Constraint::Length(1), // [13] Key hints
        ])
        .split(inner);

        let state = self.state;
        let draft = &state.draft;

        render_field(
            chunks[0],
            buf,
            "Title *",
            &draft.title,
            state.focus == GoalField::Title,
            self.theme,
        );
        render_field(
            chunks[1],
            buf,
            "Description *",
            &draft.description,
            state.focus == GoalField::Description,
            self.theme,
        );
        self.render_priority(chunks[2], buf);

        let header_style = Style::default()
            .fg(self.theme.date())
            .add_modifier(Modifier::BOLD);
        buf.set_string(chunks[4].x, chunks[4].y, "New task (Enter adds)", header_style);
        render_field(
            chunks[5],
            buf,
            "Task",
            &draft.task_input.description,
            state.focus == GoalField::TaskDescription,
            self.theme,
        );
        render_field(
            chunks[6],
            buf,
            "Notes",
            &draft.task_input.notes,
            state.focus == GoalField::TaskNotes,
            self.theme,
        );
        render_field(
            chunks[7],
            buf,
            "Minutes",
            &draft.task_input.duration,
            state.focus == GoalField::TaskDuration,
            self.theme,
        );

        let list_style = if state.focus == GoalField::Tasks {
            header_style.fg(self.theme.accent())
        } else {
            header_style
        };
        buf.set_string(
            chunks[9].x,
            chunks[9].y,
            format!("Tasks ({})", draft.tasks.len()),
            list_style,
        );
        self.render_tasks(chunks[10], buf);

        if let Some(error) = &state.error {
            Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(self.theme.error()),
            )))
            .alignment(Alignment::Center)
            .render(chunks[11], buf);
        }

        render_hint(
            chunks[13],
            buf,
            &[
                ("Tab", "Next"),
                ("←→", "Priority"),
                ("x", "Remove task"),
                ("Ctrl+S", "Create"),
                ("Esc", "Cancel"),
            ],
            self.theme,
        );
    }
}
